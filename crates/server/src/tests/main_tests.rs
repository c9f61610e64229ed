use super::*;
use axum::{body, body::Body, http::Request};
use storage::NewProject;
use tower::ServiceExt;

async fn test_app() -> (Router, Storage, i64, i64) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let user = storage
        .create_user("alice", "alice@example.com")
        .await
        .expect("user");
    let project = storage
        .create_project(NewProject {
            title: "Portfolio Website",
            description: "Showcase",
            image_url: None,
            github_url: None,
            owner: user,
        })
        .await
        .expect("project");

    let api = ApiContext {
        storage: storage.clone(),
    };
    let app = build_router(Arc::new(AppState { api }));
    (app, storage, user.0, project.0)
}

async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn like_request(project_id: i64, user_id: Option<i64>) -> Request<Body> {
    let uri = match user_id {
        Some(user_id) => format!("/projects/{project_id}/like?user_id={user_id}"),
        None => format!("/projects/{project_id}/like"),
    };
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage, _user_id, _project_id) = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn like_route_toggles_between_liked_and_unliked() {
    let (app, storage, user_id, project_id) = test_app().await;

    let first = app
        .clone()
        .oneshot(like_request(project_id, Some(user_id)))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let first: LikeResponse = json_body(first).await;
    assert_eq!(first.status, "liked");
    assert_eq!(
        storage.like_count(ProjectId(project_id)).await.expect("count"),
        1
    );

    let second = app
        .oneshot(like_request(project_id, Some(user_id)))
        .await
        .expect("response");
    let second: LikeResponse = json_body(second).await;
    assert_eq!(second.status, "unliked");
    assert_eq!(
        storage.like_count(ProjectId(project_id)).await.expect("count"),
        0
    );
}

#[tokio::test]
async fn like_without_user_is_unauthorized() {
    let (app, _storage, _user_id, project_id) = test_app().await;
    let response = app
        .oneshot(like_request(project_id, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn like_by_unknown_user_is_unauthorized() {
    let (app, storage, _user_id, project_id) = test_app().await;
    let response = app
        .oneshot(like_request(project_id, Some(9_999)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(
        storage.like_count(ProjectId(project_id)).await.expect("count"),
        0
    );
}

#[tokio::test]
async fn like_of_unknown_project_is_not_found() {
    let (app, _storage, user_id, _project_id) = test_app().await;
    let response = app
        .oneshot(like_request(9_999, Some(user_id)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_listing_includes_like_counts() {
    let (app, _storage, user_id, project_id) = test_app().await;
    app.clone()
        .oneshot(like_request(project_id, Some(user_id)))
        .await
        .expect("like");

    let response = app
        .oneshot(Request::get("/projects").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let projects: Vec<ProjectSummary> = json_body(response).await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].like_count, 1);
}

#[tokio::test]
async fn contact_route_validates_email() {
    let (app, storage, _user_id, _project_id) = test_app().await;

    let bad = Request::post("/contact")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Eve",
                "email": "user example@test.com",
                "message": "hi"
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(bad).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let good = Request::post("/contact")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Eve",
                "email": "eve@example.com",
                "message": "hi"
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.oneshot(good).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: ContactResponse = json_body(response).await;
    assert_eq!(body.status, "sent");
    assert_eq!(storage.list_contacts().await.expect("contacts").len(), 1);
}

#[tokio::test]
async fn skills_route_lists_skills_in_insertion_order() {
    let (app, storage, _user_id, _project_id) = test_app().await;
    storage
        .add_skill("Rust", Some("Programming Languages"), 5)
        .await
        .expect("skill");
    storage
        .add_skill("Docker", Some("DevOps"), 4)
        .await
        .expect("skill");

    let response = app
        .oneshot(Request::get("/skills").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let skills: Vec<SkillSummary> = json_body(response).await;
    let names: Vec<&str> = skills.iter().map(|skill| skill.name.as_str()).collect();
    assert_eq!(names, vec!["Rust", "Docker"]);
    assert_eq!(skills[0].bar_width(), "100%");
    assert_eq!(skills[1].category.as_deref(), Some("DevOps"));
}
