use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check that a running server answers its public route")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:8080", help = "Server base URL")]
        base_url: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health { base_url } => {
            let url = format!("{}/", base_url.trim_end_matches('/'));
            let response = reqwest::get(&url).await?;
            let status = response.status();
            let body = response.text().await?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({
                        "success": status.is_success(),
                        "status": status.as_u16(),
                        "body": body
                    })
                ),
                OutputFormat::Text => println!("{} {}", status.as_u16(), body),
            }

            if !status.is_success() {
                anyhow::bail!("server at {} answered {}", base_url, status);
            }
            Ok(())
        }
    }
}
