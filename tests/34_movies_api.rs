mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_server, token, ASSISTANT, DIRECTOR, EXECUTIVE_PRODUCER};

async fn create_movie(server: &common::TestServer, title: &str, release: &str) -> Result<Value> {
    let (status, body) = server
        .send(
            Method::POST,
            "/movies",
            Some(&token(EXECUTIVE_PRODUCER)),
            Some(json!({ "title": title, "release": release })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    Ok(body["movie"].clone())
}

#[tokio::test]
async fn post_movie_returns_the_new_row() -> Result<()> {
    let server = spawn_server().await?;
    let (status, body) = server
        .send(
            Method::POST,
            "/movies",
            Some(&token(&["post:movies"])),
            Some(json!({ "title": "Dune", "release": "2021-10-22" })),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["movie"]["id"].is_i64());
    assert_eq!(body["movie"]["title"], json!("Dune"));
    assert_eq!(body["movie"]["release"], json!("2021-10-22"));
    Ok(())
}

#[tokio::test]
async fn movies_are_listed_in_id_order() -> Result<()> {
    let server = spawn_server().await?;
    let first = create_movie(&server, "Test_movie", "2020-01-01").await?;
    let second = create_movie(&server, "Test_movie_2", "2020-03-01").await?;

    let (status, body) = server.send(Method::GET, "/movies", Some(&token(ASSISTANT)), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"], json!([first, second]));
    Ok(())
}

#[tokio::test]
async fn post_movie_needs_title_and_release() -> Result<()> {
    let server = spawn_server().await?;
    for body in [json!({ "title": "Dune" }), json!({ "release": "2021-10-22" }), json!({})] {
        let (status, response) = server
            .send(Method::POST, "/movies", Some(&token(EXECUTIVE_PRODUCER)), Some(body))
            .await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["error"], json!(422));
    }
    Ok(())
}

#[tokio::test]
async fn over_long_title_is_422() -> Result<()> {
    let server = spawn_server().await?;
    let (status, _) = server
        .send(
            Method::POST,
            "/movies",
            Some(&token(EXECUTIVE_PRODUCER)),
            Some(json!({ "title": "x".repeat(121), "release": "2021-10-22" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = server
        .send(Method::GET, "/movies", Some(&token(ASSISTANT)), None)
        .await?;
    assert_eq!(body["movies"], json!([]));
    Ok(())
}

#[tokio::test]
async fn post_movie_without_body_is_400() -> Result<()> {
    let server = spawn_server().await?;
    let (status, _) = server
        .send(Method::POST, "/movies", Some(&token(EXECUTIVE_PRODUCER)), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn director_cannot_create_movies() -> Result<()> {
    let server = spawn_server().await?;
    let (status, body) = server
        .send(
            Method::POST,
            "/movies",
            Some(&token(DIRECTOR)),
            Some(json!({ "title": "Dune", "release": "2021-10-22" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Permission not found in JWT"));
    Ok(())
}

#[tokio::test]
async fn patch_movie_overwrites_supplied_fields() -> Result<()> {
    let server = spawn_server().await?;
    let movie = create_movie(&server, "Test_movie_2", "2020-03-01").await?;
    let path = format!("/movies/{}", movie["id"]);

    let (status, body) = server
        .send(
            Method::PATCH,
            &path,
            Some(&token(DIRECTOR)),
            Some(json!({ "title": "test_title_update" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "movie_id": movie["id"] }));

    let (_, body) = server.send(Method::GET, "/movies", Some(&token(ASSISTANT)), None).await?;
    assert_eq!(
        body["movies"][0],
        json!({ "id": movie["id"], "title": "test_title_update", "release": "2020-03-01" })
    );
    Ok(())
}

#[tokio::test]
async fn patch_missing_movie_is_404() -> Result<()> {
    let server = spawn_server().await?;
    let (status, _) = server
        .send(
            Method::PATCH,
            "/movies/55555505",
            Some(&token(EXECUTIVE_PRODUCER)),
            Some(json!({ "title": "test_title_update" })),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn patch_movie_with_empty_body_is_400() -> Result<()> {
    let server = spawn_server().await?;
    let movie = create_movie(&server, "Test_movie", "2020-01-01").await?;
    let (status, _) = server
        .send(Method::PATCH, &format!("/movies/{}", movie["id"]), Some(&token(DIRECTOR)), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_movie_then_404() -> Result<()> {
    let server = spawn_server().await?;
    let movie = create_movie(&server, "Test_movie", "2020-01-01").await?;
    let path = format!("/movies/{}", movie["id"]);

    let (status, body) = server
        .send(Method::DELETE, &path, Some(&token(EXECUTIVE_PRODUCER)), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "movie_id": movie["id"] }));

    let (status, _) = server
        .send(Method::DELETE, &path, Some(&token(EXECUTIVE_PRODUCER)), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .send(Method::DELETE, "/movies/88888888", Some(&token(EXECUTIVE_PRODUCER)), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() -> Result<()> {
    let server = spawn_server().await?;
    let first = create_movie(&server, "Test_movie", "2020-01-01").await?;
    server
        .send(
            Method::DELETE,
            &format!("/movies/{}", first["id"]),
            Some(&token(EXECUTIVE_PRODUCER)),
            None,
        )
        .await?;
    let second = create_movie(&server, "Dune", "2021-10-22").await?;
    assert!(second["id"].as_i64() > first["id"].as_i64());
    Ok(())
}
