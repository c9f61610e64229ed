use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

const MISSING_PROJECT: i64 = 404;
const GARBLED_PROJECT: i64 = 13;

#[derive(Clone, Default)]
struct LikeServerState {
    liked: Arc<Mutex<HashSet<(i64, i64)>>>,
    requests: Arc<Mutex<Vec<(i64, Option<String>)>>>,
}

async fn like_handler(
    State(state): State<LikeServerState>,
    Path(project_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let user_id = query.get("user_id").cloned();
    state
        .requests
        .lock()
        .unwrap()
        .push((project_id, user_id.clone()));

    let Some(user_id) = user_id.and_then(|raw| raw.parse::<i64>().ok()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new(ErrorCode::Unauthorized, "Please login first.")),
        )
            .into_response();
    };
    match project_id {
        MISSING_PROJECT => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, "project not found")),
        )
            .into_response(),
        GARBLED_PROJECT => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => {
            let mut liked = state.liked.lock().unwrap();
            let status = if liked.remove(&(user_id, project_id)) {
                LikeStatus::Unliked
            } else {
                liked.insert((user_id, project_id));
                LikeStatus::Liked
            };
            Json(LikeResponse::new(status)).into_response()
        }
    }
}

async fn spawn_like_server() -> (String, LikeServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = LikeServerState::default();
    let app = Router::new()
        .route("/projects/:project_id/like", post(like_handler))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[test]
fn endpoint_carries_project_and_user() {
    let client = HttpLikeClient::new("http://127.0.0.1:5000")
        .expect("client")
        .with_user(UserId(3));
    let url = client.endpoint(ProjectId(42)).expect("endpoint");
    assert_eq!(url.as_str(), "http://127.0.0.1:5000/projects/42/like?user_id=3");

    let anonymous = HttpLikeClient::new("http://127.0.0.1:5000").expect("client");
    assert_eq!(
        anonymous.endpoint(ProjectId(42)).expect("endpoint").as_str(),
        "http://127.0.0.1:5000/projects/42/like"
    );
}

#[test]
fn malformed_server_url_is_rejected() {
    assert!(matches!(
        HttpLikeClient::new("not a url"),
        Err(LikeError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn toggling_twice_likes_then_unlikes() {
    let (server_url, state) = spawn_like_server().await;
    let client = HttpLikeClient::new(&server_url)
        .expect("client")
        .with_user(UserId(1));

    assert_eq!(
        client.toggle_like(ProjectId(9)).await.expect("first toggle"),
        LikeStatus::Liked
    );
    assert_eq!(
        client.toggle_like(ProjectId(9)).await.expect("second toggle"),
        LikeStatus::Unliked
    );

    let requests = state.requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![(9, Some("1".to_string())), (9, Some("1".to_string()))]
    );
}

#[tokio::test]
async fn anonymous_like_surfaces_server_message() {
    let (server_url, _state) = spawn_like_server().await;
    let client = HttpLikeClient::new(&server_url).expect("client");

    match client.toggle_like(ProjectId(9)).await {
        Err(LikeError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Please login first.");
        }
        other => panic!("expected 401, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_project_is_a_status_error() {
    let (server_url, _state) = spawn_like_server().await;
    let client = HttpLikeClient::new(&server_url)
        .expect("client")
        .with_user(UserId(1));

    let err = client
        .toggle_like(ProjectId(MISSING_PROJECT))
        .await
        .expect_err("missing project");
    assert!(matches!(err, LikeError::Status { status: 404, .. }));
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let (server_url, _state) = spawn_like_server().await;
    let client = HttpLikeClient::new(&server_url)
        .expect("client")
        .with_user(UserId(1));

    let err = client
        .toggle_like(ProjectId(GARBLED_PROJECT))
        .await
        .expect_err("garbled body");
    assert!(matches!(err, LikeError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = HttpLikeClient::new(&format!("http://{addr}"))
        .expect("client")
        .with_user(UserId(1));
    let err = client
        .toggle_like(ProjectId(1))
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, LikeError::Transport(_)));
}
