use shared::{
    domain::{LikeStatus, ProjectId, ProjectSummary, SkillSummary, UserId},
    error::{ApiError, ErrorCode},
    protocol::{ContactRequest, ContactResponse, LikeResponse},
    validation::{is_valid_email, INVALID_EMAIL_MESSAGE},
};
use storage::Storage;
use tracing::info;

const MAX_CONTACT_NAME_CHARS: usize = 100;
const MAX_CONTACT_MESSAGE_CHARS: usize = 5_000;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_projects(ctx: &ApiContext) -> Result<Vec<ProjectSummary>, ApiError> {
    ctx.storage.list_projects().await.map_err(internal)
}

pub async fn list_skills(ctx: &ApiContext) -> Result<Vec<SkillSummary>, ApiError> {
    ctx.storage.list_skills().await.map_err(internal)
}

/// Flips the like of `user_id` on `project_id`.
pub async fn toggle_like(
    ctx: &ApiContext,
    user_id: Option<UserId>,
    project_id: ProjectId,
) -> Result<LikeResponse, ApiError> {
    let Some(user_id) = user_id else {
        return Err(ApiError::new(ErrorCode::Unauthorized, "Please login first."));
    };
    if !ctx.storage.user_exists(user_id).await.map_err(internal)? {
        return Err(ApiError::new(ErrorCode::Unauthorized, "unknown user"));
    }
    if !ctx
        .storage
        .project_exists(project_id)
        .await
        .map_err(internal)?
    {
        return Err(ApiError::new(ErrorCode::NotFound, "project not found"));
    }

    let status: LikeStatus = ctx
        .storage
        .toggle_like(user_id, project_id)
        .await
        .map_err(internal)?;
    info!(
        user_id = user_id.0,
        project_id = project_id.0,
        status = status.as_str(),
        "like toggled"
    );
    Ok(LikeResponse::new(status))
}

pub async fn submit_contact(
    ctx: &ApiContext,
    request: &ContactRequest,
) -> Result<ContactResponse, ApiError> {
    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();

    if name.is_empty() || name.chars().count() > MAX_CONTACT_NAME_CHARS {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("name must be between 1 and {MAX_CONTACT_NAME_CHARS} characters"),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::new(ErrorCode::Validation, INVALID_EMAIL_MESSAGE));
    }
    if message.is_empty() || message.chars().count() > MAX_CONTACT_MESSAGE_CHARS {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("message must be between 1 and {MAX_CONTACT_MESSAGE_CHARS} characters"),
        ));
    }

    let contact_id = ctx
        .storage
        .insert_contact(name, email, message)
        .await
        .map_err(internal)?;
    info!(contact_id = contact_id.0, "contact message stored");
    Ok(ContactResponse {
        status: "sent".into(),
    })
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::NewProject;

    async fn setup() -> (ApiContext, UserId, ProjectId) {
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
        (ApiContext { storage }, user, project)
    }

    #[tokio::test]
    async fn anonymous_like_is_unauthorized() {
        let (ctx, _user, project) = setup().await;
        let err = toggle_like(&ctx, None, project)
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn like_by_unknown_user_is_unauthorized() {
        let (ctx, _user, project) = setup().await;
        let err = toggle_like(&ctx, Some(UserId(404)), project)
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn like_of_missing_project_is_not_found() {
        let (ctx, user, _project) = setup().await;
        let err = toggle_like(&ctx, Some(user), ProjectId(404))
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn like_toggles_status() {
        let (ctx, user, project) = setup().await;
        let first = toggle_like(&ctx, Some(user), project).await.expect("like");
        assert_eq!(first.status, "liked");
        let second = toggle_like(&ctx, Some(user), project).await.expect("unlike");
        assert_eq!(second.status, "unliked");
    }

    #[tokio::test]
    async fn contact_rejects_invalid_email() {
        let (ctx, _user, _project) = setup().await;
        let err = submit_contact(
            &ctx,
            &ContactRequest {
                name: "Dana".into(),
                email: "dana@example".into(),
                message: "Hi".into(),
            },
        )
        .await
        .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, INVALID_EMAIL_MESSAGE);
        assert!(ctx.storage.list_contacts().await.expect("contacts").is_empty());
    }

    #[tokio::test]
    async fn contact_is_stored_trimmed() {
        let (ctx, _user, _project) = setup().await;
        let response = submit_contact(
            &ctx,
            &ContactRequest {
                name: "  Dana ".into(),
                email: "dana@example.com ".into(),
                message: "Hello there".into(),
            },
        )
        .await
        .expect("sent");
        assert_eq!(response.status, "sent");
        let contacts = ctx.storage.list_contacts().await.expect("contacts");
        assert_eq!(contacts[0].name, "Dana");
        assert_eq!(contacts[0].email, "dana@example.com");
    }
}
