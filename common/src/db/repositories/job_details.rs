// Employee yearly job details repository implementation

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;

use crate::db::repository::{JobDetailsFilter, JobDetailsStore, Repository};
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{EmployeeYearlyJobDetails, JobDetailsKey};

const SELECT_COLUMNS: &str = "SELECT employee_id, year, hike_percentage, employee_remarks, \
     manager_remarks, department_id, project_id FROM employee_yearly_job_details";

/// Repository keyed on (employee_id, year)
#[derive(Clone)]
pub struct JobDetailsRepository {
    pool: DbPool,
}

impl JobDetailsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<EmployeeYearlyJobDetails> for JobDetailsRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee_yearly_job_details")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmployeeYearlyJobDetails>, DatabaseError> {
        let details = sqlx::query_as::<_, EmployeeYearlyJobDetails>(&format!(
            "{} ORDER BY employee_id, year LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(details)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        key: JobDetailsKey,
    ) -> Result<Option<EmployeeYearlyJobDetails>, DatabaseError> {
        let details = sqlx::query_as::<_, EmployeeYearlyJobDetails>(&format!(
            "{} WHERE employee_id = $1 AND year = $2",
            SELECT_COLUMNS
        ))
        .bind(key.employee_id)
        .bind(key.year)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(details)
    }

    #[instrument(skip(self, details), fields(employee_id = details.employee_id, year = details.year))]
    async fn insert(&self, details: &EmployeeYearlyJobDetails) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO employee_yearly_job_details (
                employee_id, year, hike_percentage, employee_remarks, manager_remarks,
                department_id, project_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(details.employee_id)
        .bind(details.year)
        .bind(details.hike_percentage)
        .bind(&details.employee_remarks)
        .bind(&details.manager_remarks)
        .bind(details.department_id)
        .bind(details.project_id)
        .execute(self.pool.pool())
        .await?;

        Ok(())
    }

    #[instrument(skip(self, details), fields(employee_id = details.employee_id, year = details.year))]
    async fn update(&self, details: &EmployeeYearlyJobDetails) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE employee_yearly_job_details
            SET hike_percentage = $3,
                employee_remarks = $4,
                manager_remarks = $5,
                department_id = $6,
                project_id = $7
            WHERE employee_id = $1 AND year = $2
            "#,
        )
        .bind(details.employee_id)
        .bind(details.year)
        .bind(details.hike_percentage)
        .bind(&details.employee_remarks)
        .bind(&details.manager_remarks)
        .bind(details.department_id)
        .bind(details.project_id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "employee yearly job details {}/{}",
                details.employee_id, details.year
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: JobDetailsKey) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM employee_yearly_job_details WHERE employee_id = $1 AND year = $2",
        )
        .bind(key.employee_id)
        .bind(key.year)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "employee yearly job details {}",
                key
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl JobDetailsStore for JobDetailsRepository {
    #[instrument(skip(self))]
    async fn search(
        &self,
        filter: JobDetailsFilter,
    ) -> Result<Vec<EmployeeYearlyJobDetails>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
        match filter {
            JobDetailsFilter::Employee(employee_id) => {
                query.push(" WHERE employee_id = ").push_bind(employee_id);
            }
            JobDetailsFilter::Year(year) => {
                query.push(" WHERE year = ").push_bind(year);
            }
            JobDetailsFilter::Both { employee_id, year } => {
                query
                    .push(" WHERE employee_id = ")
                    .push_bind(employee_id)
                    .push(" AND year = ")
                    .push_bind(year);
            }
        }
        query.push(" ORDER BY employee_id, year");

        let details = query
            .build_query_as::<EmployeeYearlyJobDetails>()
            .fetch_all(self.pool.pool())
            .await?;

        Ok(details)
    }
}
