// Project repository implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::db::repository::Repository;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::Project;

#[derive(Clone)]
pub struct ProjectRepository {
    pool: DbPool,
}

impl ProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Project> for ProjectRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_name, start_date, end_date, department_id
            FROM projects
            ORDER BY project_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(projects)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT project_id, project_name, start_date, end_date, department_id
            FROM projects
            WHERE project_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(project)
    }

    #[instrument(skip(self, project), fields(project_id = project.project_id))]
    async fn insert(&self, project: &Project) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO projects (project_id, project_name, start_date, end_date, department_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(project.project_id)
        .bind(&project.project_name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.department_id)
        .execute(self.pool.pool())
        .await?;

        tracing::debug!("Project created");
        Ok(())
    }

    #[instrument(skip(self, project), fields(project_id = project.project_id))]
    async fn update(&self, project: &Project) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET project_name = $2,
                start_date = $3,
                end_date = $4,
                department_id = $5
            WHERE project_id = $1
            "#,
        )
        .bind(project.project_id)
        .bind(&project.project_name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.department_id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "project {}",
                project.project_id
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE project_id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("project {}", id)));
        }

        Ok(())
    }
}
