use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{ContactId, LikeStatus, ProjectId, ProjectSummary, SkillId, SkillSummary, UserId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct NewProject<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub github_url: Option<&'a str>,
    pub owner: UserId,
}

#[derive(Debug, Clone)]
pub struct StoredContact {
    pub contact_id: ContactId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_user(&self, username: &str, email: &str) -> Result<UserId> {
        let rec = sqlx::query(
            "INSERT INTO users (username, email) VALUES (?, ?)
             ON CONFLICT(username) DO UPDATE SET email=excluded.email
             RETURNING id",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(UserId(rec.get::<i64, _>(0)))
    }

    pub async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn create_project(&self, project: NewProject<'_>) -> Result<ProjectId> {
        let rec = sqlx::query(
            "INSERT INTO projects (title, description, image_url, github_url, user_id)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(project.title)
        .bind(project.description)
        .bind(project.image_url)
        .bind(project.github_url)
        .bind(project.owner.0)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to insert project '{}'", project.title))?;
        Ok(ProjectId(rec.get::<i64, _>(0)))
    }

    pub async fn project_exists(&self, project_id: ProjectId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM projects WHERE id = ?")
            .bind(project_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Newest first, each with its current like count.
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let rows = sqlx::query(
            "SELECT p.id, p.title, p.description, p.image_url, p.github_url,
                    (SELECT COUNT(*) FROM likes l WHERE l.project_id = p.id) AS like_count
             FROM projects p
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProjectSummary {
                project_id: ProjectId(row.get::<i64, _>(0)),
                title: row.get::<String, _>(1),
                description: row.get::<String, _>(2),
                image_url: row.get::<Option<String>, _>(3),
                github_url: row.get::<Option<String>, _>(4),
                like_count: row.get::<i64, _>(5),
            })
            .collect())
    }

    /// Removes the like of `user_id` on `project_id` if one exists, otherwise
    /// records one. Runs in a single transaction.
    pub async fn toggle_like(&self, user_id: UserId, project_id: ProjectId) -> Result<LikeStatus> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM likes WHERE user_id = ? AND project_id = ?")
            .bind(user_id.0)
            .bind(project_id.0)
            .fetch_optional(&mut *tx)
            .await?;

        let status = if let Some(row) = existing {
            sqlx::query("DELETE FROM likes WHERE id = ?")
                .bind(row.get::<i64, _>(0))
                .execute(&mut *tx)
                .await?;
            LikeStatus::Unliked
        } else {
            sqlx::query("INSERT INTO likes (user_id, project_id) VALUES (?, ?)")
                .bind(user_id.0)
                .bind(project_id.0)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!(
                        "failed to record like of project {} by user {}",
                        project_id.0, user_id.0
                    )
                })?;
            LikeStatus::Liked
        };

        tx.commit().await?;
        Ok(status)
    }

    pub async fn like_count(&self, project_id: ProjectId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE project_id = ?")
            .bind(project_id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn add_skill(
        &self,
        name: &str,
        category: Option<&str>,
        proficiency: u8,
    ) -> Result<SkillId> {
        let rec = sqlx::query(
            "INSERT INTO skills (name, category, proficiency) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(category)
        .bind(i64::from(proficiency.clamp(1, 5)))
        .fetch_one(&self.pool)
        .await?;
        Ok(SkillId(rec.get::<i64, _>(0)))
    }

    pub async fn list_skills(&self) -> Result<Vec<SkillSummary>> {
        let rows = sqlx::query("SELECT id, name, category, proficiency FROM skills ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SkillSummary {
                skill_id: SkillId(row.get::<i64, _>(0)),
                name: row.get::<String, _>(1),
                category: row.get::<Option<String>, _>(2),
                proficiency: row.get::<i64, _>(3).clamp(1, 5) as u8,
            })
            .collect())
    }

    pub async fn insert_contact(&self, name: &str, email: &str, message: &str) -> Result<ContactId> {
        let rec = sqlx::query(
            "INSERT INTO contacts (name, email, message) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(ContactId(rec.get::<i64, _>(0)))
    }

    pub async fn list_contacts(&self) -> Result<Vec<StoredContact>> {
        let rows = sqlx::query(
            "SELECT id, name, email, message, created_at FROM contacts ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| -> Result<StoredContact> {
                Ok(StoredContact {
                    contact_id: ContactId(row.try_get::<i64, _>(0)?),
                    name: row.try_get::<String, _>(1)?,
                    email: row.try_get::<String, _>(2)?,
                    message: row.try_get::<String, _>(3)?,
                    created_at: row.try_get::<DateTime<Utc>, _>(4)?,
                })
            })
            .collect()
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
