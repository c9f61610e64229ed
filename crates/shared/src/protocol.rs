use serde::{Deserialize, Serialize};

use crate::domain::{LikeStatus, ProjectId};

/// Body returned by `POST /projects/{project_id}/like`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeResponse {
    pub status: String,
}

impl LikeResponse {
    pub fn new(status: LikeStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
        }
    }

    pub fn like_status(&self) -> LikeStatus {
        LikeStatus::from_wire(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub status: String,
}

pub fn like_route(project_id: ProjectId) -> String {
    format!("/projects/{}/like", project_id.0)
}
