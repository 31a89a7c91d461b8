// Employee batch operations
//
// Every item is attempted; items that fail their existence check are recorded
// in the summary by id. Other store failures abort the batch.

use tracing::{debug, instrument, warn};

use common::bulk::OperationSummary;
use common::db::Repository;
use common::errors::{ApiError, DatabaseError};
use common::models::{Employee, EmployeeUpdate};

pub const ADD_CONFLICT: &str = "The employeeId is either empty or present in the database.";
pub const MISSING: &str = "doesn't exist";

#[instrument(skip_all, fields(requested = employees.len()))]
pub async fn add(
    store: &dyn Repository<Employee>,
    employees: Vec<Employee>,
) -> Result<OperationSummary, ApiError> {
    let mut summary = OperationSummary::new(employees.len());

    for employee in &employees {
        let id = employee.employee_id;
        if store.exists(id).await? {
            warn!(employee_id = id, "Employee already present, not added again");
            summary.failed(id, ADD_CONFLICT);
            continue;
        }
        match store.insert(employee).await {
            Ok(()) => {
                debug!(employee_id = id, "Created employee");
                summary.succeeded();
            }
            Err(DatabaseError::DuplicateKey(_)) => summary.failed(id, ADD_CONFLICT),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

/// Apply each partial update onto the stored row.
#[instrument(skip_all, fields(requested = updates.len()))]
pub async fn update(
    store: &dyn Repository<Employee>,
    updates: Vec<EmployeeUpdate>,
) -> Result<OperationSummary, ApiError> {
    let mut summary = OperationSummary::new(updates.len());

    for changes in updates {
        let id = changes.employee_id;
        let Some(mut employee) = store.find(id).await? else {
            warn!(employee_id = id, "Updating employee failed since it doesn't exist");
            summary.failed(id, MISSING);
            continue;
        };

        changes.apply_to(&mut employee);
        match store.update(&employee).await {
            Ok(()) => {
                debug!(employee_id = id, "Updated employee");
                summary.succeeded();
            }
            Err(DatabaseError::NotFound(_)) => summary.failed(id, MISSING),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

#[instrument(skip_all, fields(requested = ids.len()))]
pub async fn delete(
    store: &dyn Repository<Employee>,
    ids: Vec<i64>,
) -> Result<OperationSummary, ApiError> {
    let mut summary = OperationSummary::new(ids.len());

    for id in ids {
        match store.delete(id).await {
            Ok(()) => {
                debug!(employee_id = id, "Deleted employee");
                summary.succeeded();
            }
            Err(DatabaseError::NotFound(_)) => {
                warn!(employee_id = id, "Deleting employee failed since it doesn't exist");
                summary.failed(id, MISSING);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::db::MemoryRepository;

    fn employee(id: i64, first_name: &str) -> Employee {
        Employee {
            employee_id: id,
            first_name: first_name.to_string(),
            last_name: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            gender: "Female".to_string(),
            salary: 52000.0,
            hire_date: NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
            job_stage: "L2".to_string(),
            designation: "Engineer".to_string(),
            manager_employee_id: 0,
        }
    }

    #[tokio::test]
    async fn test_add_reports_existing_ids() {
        let store = MemoryRepository::with_records(vec![employee(1, "Asha")]);

        let summary = add(&store, vec![employee(1, "Dup"), employee(2, "Ravi")])
            .await
            .unwrap();

        assert_eq!(summary.total_requested, 2);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.operation_details.get(&1).map(String::as_str), Some(ADD_CONFLICT));
        assert_eq!(store.snapshot().await[0].first_name, "Asha");
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let store = MemoryRepository::with_records(vec![employee(1, "Asha")]);

        let summary = update(
            &store,
            vec![
                EmployeeUpdate {
                    employee_id: 1,
                    salary: Some(61000.0),
                    ..Default::default()
                },
                EmployeeUpdate {
                    employee_id: 9,
                    ..Default::default()
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!((summary.success_count, summary.error_count), (1, 1));
        assert_eq!(summary.operation_details.get(&9).map(String::as_str), Some(MISSING));

        let stored = store.snapshot().await;
        assert_eq!(stored[0].salary, 61000.0);
        assert_eq!(stored[0].first_name, "Asha");
    }

    #[tokio::test]
    async fn test_delete_counts_missing() {
        let store = MemoryRepository::with_records(vec![employee(1, "Asha"), employee(2, "Ravi")]);

        let summary = delete(&store, vec![1, 1, 3]).await.unwrap();

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 2);
        assert_eq!(summary.operation_details.len(), 2);
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_outage_aborts() {
        let store = MemoryRepository::<Employee>::new();
        store.set_available(false);
        assert!(delete(&store, vec![1]).await.is_err());
    }
}
