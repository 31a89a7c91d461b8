// Department repository implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::db::repository::Repository;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::Department;

/// Repository for the `departments` table
///
/// Locations and member ids are stored as Postgres arrays.
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: DbPool,
}

impl DepartmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Department> for DepartmentRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<Department>, DatabaseError> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT department_id, department_name, locations, department_head_id,
                   department_employee_ids
            FROM departments
            ORDER BY department_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(departments)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Department>, DatabaseError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            SELECT department_id, department_name, locations, department_head_id,
                   department_employee_ids
            FROM departments
            WHERE department_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(department)
    }

    #[instrument(skip(self, department), fields(department_id = department.department_id))]
    async fn insert(&self, department: &Department) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO departments (
                department_id, department_name, locations, department_head_id,
                department_employee_ids
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(department.department_id)
        .bind(&department.department_name)
        .bind(&department.locations)
        .bind(department.department_head_id)
        .bind(&department.department_employee_ids)
        .execute(self.pool.pool())
        .await?;

        tracing::debug!("Department created");
        Ok(())
    }

    #[instrument(skip(self, department), fields(department_id = department.department_id))]
    async fn update(&self, department: &Department) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE departments
            SET department_name = $2,
                locations = $3,
                department_head_id = $4,
                department_employee_ids = $5
            WHERE department_id = $1
            "#,
        )
        .bind(department.department_id)
        .bind(&department.department_name)
        .bind(&department.locations)
        .bind(department.department_head_id)
        .bind(&department.department_employee_ids)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "department {}",
                department.department_id
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM departments WHERE department_id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("department {}", id)));
        }

        Ok(())
    }
}
