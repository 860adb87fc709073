use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::{Actor, Movie};
use crate::database::{create_pool, run_migrations};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply the embedded schema migrations")]
    Migrate,

    #[command(about = "Insert a small demo roster and catalogue")]
    Seed,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = create_pool(&config::config().database)?;

    match cmd {
        DbCommands::Migrate => {
            run_migrations(&pool).await?;

            match output_format {
                OutputFormat::Json => println!("{}", json!({"success": true, "migrated": true})),
                OutputFormat::Text => println!("Migrations applied"),
            }
            Ok(())
        }
        DbCommands::Seed => {
            let actors = [
                ("Meryl Streep", Some(76), Some("Female")),
                ("Denzel Washington", Some(70), Some("Male")),
                ("Florence Pugh", Some(29), Some("Female")),
            ];
            let movies = [
                ("The Devil Wears Prada", Some("2006-06-30")),
                ("Dune: Part Two", Some("2024-03-01")),
            ];

            let mut seeded_actors = Vec::new();
            for (name, age, gender) in actors {
                seeded_actors.push(Actor::insert(&pool, name, age, gender).await?);
            }

            let mut seeded_movies = Vec::new();
            for (title, release_date) in movies {
                seeded_movies.push(Movie::insert(&pool, title, release_date).await?);
            }

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({
                        "success": true,
                        "actors": seeded_actors,
                        "movies": seeded_movies
                    })
                ),
                OutputFormat::Text => {
                    for actor in &seeded_actors {
                        println!("Seeded actor {} (id {})", actor.name, actor.id);
                    }
                    for movie in &seeded_movies {
                        println!("Seeded movie {} (id {})", movie.title, movie.id);
                    }
                }
            }
            Ok(())
        }
    }
}
