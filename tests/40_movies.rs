mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

// Same gating as the actors suite: a live provider and database are
// required, so every test skips when role tokens are absent.

#[tokio::test]
async fn movie_round_trip_and_gone_after_delete() -> Result<()> {
    let tokens = match common::role_tokens() {
        Some(tokens) => tokens,
        None => {
            eprintln!("skipping: role tokens not configured");
            return Ok(());
        }
    };
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.producer)
        .json(&json!({"title": "Test Movie", "release_date": "2025-11-21"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "create failed: {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true, "unexpected envelope: {}", body);
    assert_eq!(body["movie"]["title"], "Test Movie", "unexpected envelope: {}", body);
    assert_eq!(body["movie"]["release_date"], "2025-11-21", "unexpected envelope: {}", body);
    let id = body["movie"]["id"].as_i64().context("created movie has no id")?;

    let res = client
        .get(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.assistant)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let movies = body["movies"].as_array().context("missing movies array")?;
    assert!(
        movies.iter().any(|movie| movie["id"] == id),
        "created movie {} not in catalogue: {}",
        id,
        body
    );

    let res = client
        .delete(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.producer)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["delete"], id, "unexpected envelope: {}", body);

    // The catalogue must no longer list the deleted movie
    let res = client
        .get(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.assistant)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    let movies = body["movies"].as_array().context("missing movies array")?;
    assert!(
        movies.iter().all(|movie| movie["id"] != id),
        "deleted movie {} still in catalogue: {}",
        id,
        body
    );

    let res = client
        .delete(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.producer)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND, "second delete should be 404");

    Ok(())
}

#[tokio::test]
async fn create_requires_title() -> Result<()> {
    let tokens = match common::role_tokens() {
        Some(tokens) => tokens,
        None => {
            eprintln!("skipping: role tokens not configured");
            return Ok(());
        }
    };
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.producer)
        .json(&json!({}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "expected 400, got {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false, "unexpected envelope: {}", body);
    assert_eq!(body["error"], 400, "unexpected envelope: {}", body);

    Ok(())
}

#[tokio::test]
async fn director_cannot_delete_movie() -> Result<()> {
    let tokens = match common::role_tokens() {
        Some(tokens) => tokens,
        None => {
            eprintln!("skipping: role tokens not configured");
            return Ok(());
        }
    };
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.producer)
        .json(&json!({"title": "Off Limits"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let id = body["movie"]["id"].as_i64().context("created movie has no id")?;

    let res = client
        .delete(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.director)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN, "expected 403, got {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false, "unexpected envelope: {}", body);
    assert_eq!(body["error"], 403, "unexpected envelope: {}", body);
    assert_eq!(body["message"], "permission delete:movies not found", "unexpected envelope: {}", body);

    // Cleanup
    let res = client
        .delete(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.producer)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn patch_requires_some_body() -> Result<()> {
    let tokens = match common::role_tokens() {
        Some(tokens) => tokens,
        None => {
            eprintln!("skipping: role tokens not configured");
            return Ok(());
        }
    };
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/movies", server.base_url))
        .bearer_auth(&tokens.producer)
        .json(&json!({"title": "Working Title", "release_date": "2026-01-01"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let id = body["movie"]["id"].as_i64().context("created movie has no id")?;

    // A bodyless patch is rejected for movies
    let res = client
        .patch(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.director)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "expected 400, got {}", res.status());

    let res = client
        .patch(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.director)
        .json(&json!({"title": "Renamed Movie"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "patch failed: {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["movie"]["title"], "Renamed Movie", "unexpected envelope: {}", body);
    assert_eq!(body["movie"]["release_date"], "2026-01-01", "unexpected envelope: {}", body);

    // Cleanup
    let res = client
        .delete(format!("{}/movies/{}", server.base_url, id))
        .bearer_auth(&tokens.producer)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
