use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::projects::repo_types::{NewProject, Project};

/// Owner-scoped project persistence. Every query filters by `user_id`.
#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn create(&self, project: NewProject) -> anyhow::Result<Project>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>>;
    /// Returns whether a row was removed.
    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgProjectRepo {
    db: PgPool,
}

impl PgProjectRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepo for PgProjectRepo {
    async fn create(&self, project: NewProject) -> anyhow::Result<Project> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, created_at, updated_at
            "#,
        )
        .bind(project.user_id)
        .bind(&project.title)
        .bind(&project.description)
        .fetch_one(&self.db)
        .await
        .context("insert project")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list projects by user")?;
        Ok(rows)
    }

    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.db)
        .await
        .context("delete project")?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryProjectRepo;
