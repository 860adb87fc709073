use std::sync::Arc;

use anyhow::Context;
use axum::extract::Request;
use axum::handler::Handler;
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::routing::{get, patch};
use axum::Router;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenVerifier;
use crate::error::ApiError;
use crate::middleware::{authenticate, authorize};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;

#[cfg(test)]
mod testing;

/// Shared request context: the connection pool and the token verifier.
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    verifier: Arc<TokenVerifier>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH0_DOMAIN, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();

    let verifier = TokenVerifier::from_config(&config.auth)
        .context("auth configuration incomplete; set AUTH0_DOMAIN and API_AUDIENCE")?;
    let pool = database::create_pool(&config.database)
        .context("database configuration invalid; set DATABASE_URL")?;

    let state = AppState {
        pool,
        verifier: Arc::new(verifier),
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Casting API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::greeting))
        .route("/coolkids", get(handlers::public::coolkids))
        // Protected API
        .merge(actor_routes(state.clone()))
        .merge(movie_routes(state.clone()))
        // Unknown paths get the JSON envelope, not the framework's bare 404
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Actor routes. Authentication runs once per request via `route_layer`;
/// each method then carries its own permission gate, so GET and DELETE on
/// the same path demand different scopes.
fn actor_routes(state: AppState) -> Router<AppState> {
    use handlers::actors;

    Router::new()
        .route(
            "/actors",
            get(actors::list.layer(from_fn(|req: Request, next: Next| {
                authorize("get:actors", req, next)
            })))
            .post(actors::create.layer(from_fn(|req: Request, next: Next| {
                authorize("post:actors", req, next)
            }))),
        )
        .route(
            "/actors/:actor_id",
            patch(actors::update.layer(from_fn(|req: Request, next: Next| {
                authorize("patch:actors", req, next)
            })))
            .delete(actors::delete.layer(from_fn(|req: Request, next: Next| {
                authorize("delete:actors", req, next)
            }))),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}

fn movie_routes(state: AppState) -> Router<AppState> {
    use handlers::movies;

    Router::new()
        .route(
            "/movies",
            get(movies::list.layer(from_fn(|req: Request, next: Next| {
                authorize("get:movies", req, next)
            })))
            .post(movies::create.layer(from_fn(|req: Request, next: Next| {
                authorize("post:movies", req, next)
            }))),
        )
        .route(
            "/movies/:movie_id",
            patch(movies::update.layer(from_fn(|req: Request, next: Next| {
                authorize("patch:movies", req, next)
            })))
            .delete(movies::delete.layer(from_fn(|req: Request, next: Next| {
                authorize("delete:movies", req, next)
            }))),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}

async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}
