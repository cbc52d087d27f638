// Read-only view of the projects module: the workflow only needs a project's name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::{AppError, ProjectId, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    /// Name used when the project row has no usable name
    pub fn fallback_name(id: ProjectId) -> String {
        format!("Project #{}", id)
    }
}

#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>>;

    /// The project's name, or its fallback name when it is missing
    async fn project_name(&self, id: ProjectId) -> Result<String> {
        Ok(self
            .get_project(id)
            .await?
            .map(|p| p.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| Project::fallback_name(id)))
    }
}

pub struct MySqlProjectDirectory {
    pool: MySqlPool,
}

impl MySqlProjectDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectDirectory for MySqlProjectDirectory {
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT id, name FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch project: {}", e)))
    }
}
