//! Tests for the HTTP surface: request framing, structured statuses, and
//! the register/move/leave flow end to end over the router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use grid_duel::{SessionConfig, SessionHandle, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    router(SessionHandle::new(SessionConfig::default()))
}

async fn call(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post(app: &Router, path: &str, body: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

async fn get(app: &Router, path: &str) -> Value {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    call(app, request).await
}

async fn register(app: &Router, name: &str, token: &str) -> Value {
    post(app, "/api/register", json!({ "name": name, "token": token })).await
}

async fn make_move(app: &Router, name: &str, token: &str, coordinate: &str) -> Value {
    post(
        app,
        "/api/move",
        json!({ "name": name, "token": token, "coordinate": coordinate }),
    )
    .await
}

#[tokio::test]
async fn test_register_assigns_pending_then_starts_match() {
    let app = app();

    let first = register(&app, "alice", "tok-a").await;
    assert_eq!(first["status"], "ok");
    assert_eq!(first["symbol"], "Pending");
    assert_eq!(first["token"], "tok-a");

    let second = register(&app, "bob", "tok-b").await;
    assert_eq!(second["status"], "ok");
    assert!(second["symbol"] == "X" || second["symbol"] == "O");

    let players = get(&app, "/api/players").await;
    assert_eq!(players.as_object().unwrap().len(), 2);

    let turn = get(&app, "/api/turn").await;
    assert!(turn == "alice" || turn == "bob");
}

#[tokio::test]
async fn test_register_rejections_over_the_wire() {
    let app = app();
    register(&app, "alice", "tok-a").await;

    let impostor = register(&app, "alice", "stolen").await;
    assert_eq!(impostor["status"], "name_in_use");

    register(&app, "bob", "tok-b").await;
    let third = register(&app, "carol", "tok-c").await;
    assert_eq!(third["status"], "already_in_progress");

    // Reconnect keeps working mid-match.
    let reconnect = register(&app, "alice", "tok-a").await;
    assert_eq!(reconnect["status"], "ok");
}

#[tokio::test]
async fn test_move_flow_and_structured_errors() {
    let app = app();
    register(&app, "alice", "tok-a").await;
    register(&app, "bob", "tok-b").await;

    let mover = get(&app, "/api/turn").await.as_str().unwrap().to_string();
    let waiter = if mover == "alice" { "bob" } else { "alice" };
    let token = |name: &str| if name == "alice" { "tok-a" } else { "tok-b" };

    let out_of_turn = make_move(&app, waiter, token(waiter), "A1").await;
    assert_eq!(out_of_turn["status"], "error");
    assert_eq!(out_of_turn["message"], "not your turn");

    let bad_token = make_move(&app, &mover, "stolen", "A1").await;
    assert_eq!(bad_token["message"], "invalid token");

    let malformed = make_move(&app, &mover, token(&mover), "Z9").await;
    assert_eq!(malformed["message"], "invalid move");

    let accepted = make_move(&app, &mover, token(&mover), "A1").await;
    assert_eq!(accepted["status"], "ok");
    assert_eq!(accepted["board"][0][0], "X");

    // Turn passed; the same cell is now refused for the other player.
    let occupied = make_move(&app, waiter, token(waiter), "A1").await;
    assert_eq!(occupied["status"], "error");
    assert_eq!(occupied["message"], "cell already occupied");
}

#[tokio::test]
async fn test_win_reports_winner_and_stats() {
    let app = app();
    register(&app, "alice", "tok-a").await;
    register(&app, "bob", "tok-b").await;

    let x = get(&app, "/api/turn").await.as_str().unwrap().to_string();
    let o = if x == "alice" { "bob" } else { "alice" }.to_string();
    let token = |name: &str| if name == "alice" { "tok-a" } else { "tok-b" };

    make_move(&app, &x, token(&x), "A1").await;
    make_move(&app, &o, token(&o), "A2").await;
    make_move(&app, &x, token(&x), "B1").await;
    make_move(&app, &o, token(&o), "B2").await;
    let winning = make_move(&app, &x, token(&x), "C1").await;
    assert_eq!(winning["status"], "win");
    assert_eq!(winning["winner"], "X");

    let stats = get(&app, "/api/stats").await;
    assert_eq!(stats["x"], 1);
    assert_eq!(stats["o"], 0);

    // Rematch: restart succeeds and hands the opening move to the new X.
    let restarted = post(&app, "/api/restart", json!(null)).await;
    assert_eq!(restarted, true);
    let turn = get(&app, "/api/turn").await;
    assert_eq!(turn, o.as_str());
}

#[tokio::test]
async fn test_leave_ends_session_for_everyone() {
    let app = app();
    register(&app, "alice", "tok-a").await;
    register(&app, "bob", "tok-b").await;

    let left = post(&app, "/api/leave", json!({ "name": "alice", "token": "tok-a" })).await;
    assert_eq!(left, true);

    let ended = get(&app, "/api/ended").await;
    assert_eq!(ended["ended"], true);
    assert_eq!(ended["reason"], "alice left the game");

    let rejoin = register(&app, "carol", "tok-c").await;
    assert_eq!(rejoin["status"], "ended");
    assert_eq!(rejoin["reason"], "alice left the game");

    let late_move = make_move(&app, "bob", "tok-b", "A1").await;
    assert_eq!(late_move["status"], "error");
    assert_eq!(
        late_move["message"],
        "session ended: alice left the game"
    );
}

#[tokio::test]
async fn test_board_starts_empty() {
    let app = app();
    let board = get(&app, "/api/board").await;
    for row in board.as_array().unwrap() {
        for cell in row.as_array().unwrap() {
            assert_eq!(cell, "Empty");
        }
    }
    let turn = get(&app, "/api/turn").await;
    assert!(turn.is_null());
}
