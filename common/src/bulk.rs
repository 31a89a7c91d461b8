// Bulk add/update/delete/search over any repository
//
// Each item is processed independently; an item that fails its existence check
// is reported in the per-item outcomes and never aborts the batch. Store
// failures other than the existence checks are propagated.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::db::repository::{Record, Repository};
use crate::errors::{ApiError, DatabaseError};
use crate::response::ApiResponse;

/// Payload of bulk and search responses
///
/// Serialized as `{<LIST_FIELD>: [...], "apiResponse": [...]}` with absent
/// parts omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResponse<R> {
    pub records: Option<Vec<R>>,
    pub outcomes: Option<Vec<ApiResponse<()>>>,
}

impl<R> BulkResponse<R> {
    pub fn records(records: Vec<R>) -> Self {
        Self {
            records: Some(records),
            outcomes: None,
        }
    }

    pub fn outcomes(outcomes: Vec<ApiResponse<()>>) -> Self {
        Self {
            records: None,
            outcomes: Some(outcomes),
        }
    }
}

impl<R: Record + Serialize> Serialize for BulkResponse<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.records.is_some() as usize + self.outcomes.is_some() as usize;
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(records) = &self.records {
            map.serialize_entry(R::LIST_FIELD, records)?;
        }
        if let Some(outcomes) = &self.outcomes {
            map.serialize_entry("apiResponse", outcomes)?;
        }
        map.end()
    }
}

/// Tally of one bulk call
#[derive(Debug, Default)]
struct Tally {
    succeeded: usize,
    outcomes: Vec<ApiResponse<()>>,
}

impl Tally {
    fn success(&mut self, message: String) {
        self.succeeded += 1;
        self.outcomes.push(ApiResponse::success_message(message));
    }

    fn failure(&mut self, message: String) {
        self.outcomes.push(ApiResponse::error(message));
    }

    fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded
    }
}

/// Insert every record whose key is not stored yet.
#[instrument(skip(store, records), fields(entity = R::LABEL, requested = records.len()))]
pub async fn add_all<R, S>(
    store: &S,
    records: Vec<R>,
) -> Result<ApiResponse<BulkResponse<R>>, ApiError>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let mut tally = Tally::default();

    for record in &records {
        let id = record.id();
        if store.exists(id).await? {
            warn!(id = %id, "{} Id {} is already present thus not added again", R::LABEL, id);
            tally.failure(format!("{} Id {} already exists ", R::LABEL, id));
            continue;
        }

        match store.insert(record).await {
            Ok(()) => {
                info!(id = %id, "Added {} Id {}", R::LABEL, id);
                tally.success(format!("Successfully added {} Id {} data records", R::LABEL, id));
            }
            // Lost a race with a concurrent insert of the same key; any other
            // unique column violation is a constraint error
            Err(DatabaseError::DuplicateKey(detail)) => {
                if !store.exists(id).await? {
                    return Err(DatabaseError::DuplicateKey(detail).into());
                }
                tally.failure(format!("{} Id {} already exists ", R::LABEL, id));
            }
            Err(err) => return Err(err.into()),
        }
    }

    let message = format!(
        "Successfully added {} . Add failed : {}",
        tally.succeeded,
        tally.failed()
    );
    Ok(ApiResponse::success(message, BulkResponse::outcomes(tally.outcomes)))
}

/// Replace every record whose key is already stored.
#[instrument(skip(store, records), fields(entity = R::LABEL, requested = records.len()))]
pub async fn update_all<R, S>(
    store: &S,
    records: Vec<R>,
) -> Result<ApiResponse<BulkResponse<R>>, ApiError>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let mut tally = Tally::default();

    for record in &records {
        let id = record.id();
        match store.update(record).await {
            Ok(()) => {
                info!(id = %id, "Updated {} Id {}", R::LABEL, id);
                tally.success(format!(
                    "Successfully updated {} Id {} data records",
                    R::LABEL,
                    id
                ));
            }
            Err(DatabaseError::NotFound(_)) => {
                warn!(id = %id, "Updating {} Id {} failed since it doesn't exist", R::LABEL, id);
                tally.failure(format!("{} Id {} doesn't exist", R::LABEL, id));
            }
            Err(err) => return Err(err.into()),
        }
    }

    let message = format!(
        "Update Success : {} . Update Failed : {}",
        tally.succeeded,
        tally.failed()
    );
    Ok(ApiResponse::success(message, BulkResponse::outcomes(tally.outcomes)))
}

/// Delete every stored key in `ids`.
#[instrument(skip(store, ids), fields(entity = R::LABEL, requested = ids.len()))]
pub async fn delete_all<R, S>(
    store: &S,
    ids: Vec<R::Id>,
) -> Result<ApiResponse<BulkResponse<R>>, ApiError>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let mut tally = Tally::default();

    for id in ids {
        match store.delete(id).await {
            Ok(()) => {
                info!(id = %id, "Deleted {} Id {}", R::LABEL, id);
                tally.success(format!(
                    "Successfully deleted {} Id {} data records",
                    R::LABEL,
                    id
                ));
            }
            Err(DatabaseError::NotFound(_)) => {
                warn!(id = %id, "Deleting {} Id {} failed since it doesn't exist", R::LABEL, id);
                tally.failure(format!("{} Id {} doesn't exist", R::LABEL, id));
            }
            Err(err) => return Err(err.into()),
        }
    }

    let message = format!(
        "Delete Success : {}. Delete Failed : {}",
        tally.succeeded,
        tally.failed()
    );
    Ok(ApiResponse::success(message, BulkResponse::outcomes(tally.outcomes)))
}

/// Look up one record by key; 404 when absent.
pub async fn search<R, S>(store: &S, id: R::Id) -> Result<ApiResponse<BulkResponse<R>>, ApiError>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let record = store
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{}Id {} not found", R::LABEL, id)))?;

    Ok(ApiResponse::success(
        format!("Successfully found {} Id {} data records", R::TITLE, id),
        BulkResponse::records(vec![record]),
    ))
}

/// Result of an employee batch call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub total_requested: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// Failure reason per id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub operation_details: BTreeMap<i64, String>,
}

impl OperationSummary {
    pub fn new(total_requested: usize) -> Self {
        Self {
            total_requested,
            ..Default::default()
        }
    }

    pub fn succeeded(&mut self) {
        self.success_count += 1;
    }

    pub fn failed(&mut self, id: i64, reason: impl Into<String>) {
        self.error_count += 1;
        self.operation_details.insert(id, reason.into());
    }
}
