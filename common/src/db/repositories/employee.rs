// Employee repository implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::db::repository::Repository;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::Employee;

const SELECT_COLUMNS: &str = r#"
    SELECT employee_id, first_name, last_name, date_of_birth, gender, salary,
           hire_date, job_stage, designation, manager_employee_id
    FROM employees
"#;

/// Repository for the `employees` table
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: DbPool,
}

impl EmployeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Employee> for EmployeeRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<Employee>, DatabaseError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "{} ORDER BY employee_id LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(employees)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        let employee =
            sqlx::query_as::<_, Employee>(&format!("{} WHERE employee_id = $1", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(self.pool.pool())
                .await?;

        Ok(employee)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = $1)")
                .bind(id)
                .fetch_one(self.pool.pool())
                .await?;
        Ok(exists)
    }

    #[instrument(skip(self, employee), fields(employee_id = employee.employee_id))]
    async fn insert(&self, employee: &Employee) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO employees (
                employee_id, first_name, last_name, date_of_birth, gender, salary,
                hire_date, job_stage, designation, manager_employee_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(employee.employee_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_birth)
        .bind(&employee.gender)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .bind(&employee.job_stage)
        .bind(&employee.designation)
        .bind(employee.manager_employee_id)
        .execute(self.pool.pool())
        .await?;

        tracing::debug!("Employee created");
        Ok(())
    }

    #[instrument(skip(self, employee), fields(employee_id = employee.employee_id))]
    async fn update(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = $2,
                last_name = $3,
                date_of_birth = $4,
                gender = $5,
                salary = $6,
                hire_date = $7,
                job_stage = $8,
                designation = $9,
                manager_employee_id = $10
            WHERE employee_id = $1
            "#,
        )
        .bind(employee.employee_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_birth)
        .bind(&employee.gender)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .bind(&employee.job_stage)
        .bind(&employee.designation)
        .bind(employee.manager_employee_id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "employee {}",
                employee.employee_id
            )));
        }

        tracing::debug!("Employee updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("employee {}", id)));
        }

        tracing::debug!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
