// In-memory repository used by router tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::repository::{JobDetailsFilter, JobDetailsStore, Record, Repository, UserStore};
use crate::errors::DatabaseError;
use crate::models::{EmployeeYearlyJobDetails, UserProfile};

pub struct MemoryRepository<R: Record> {
    records: RwLock<BTreeMap<R::Id, R>>,
    available: AtomicBool,
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: RwLock::new(map),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the database going away; every call then fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<R> {
        self.records.read().await.values().cloned().collect()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::ConnectionFailed("database unavailable".to_string()))
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check()
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        self.check()?;
        Ok(self.records.read().await.len() as i64)
    }

    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<R>, DatabaseError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find(&self, id: R::Id) -> Result<Option<R>, DatabaseError> {
        self.check()?;
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, record: &R) -> Result<(), DatabaseError> {
        self.check()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(DatabaseError::DuplicateKey(format!(
                "{} {} already exists",
                R::LABEL,
                record.id()
            )));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &R) -> Result<(), DatabaseError> {
        self.check()?;
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("{} {}", R::LABEL, record.id()))),
        }
    }

    async fn delete(&self, id: R::Id) -> Result<(), DatabaseError> {
        self.check()?;
        match self.records.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("{} {}", R::LABEL, id))),
        }
    }
}

#[async_trait]
impl UserStore for MemoryRepository<UserProfile> {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserProfile>, DatabaseError> {
        self.check()?;
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }
}

#[async_trait]
impl JobDetailsStore for MemoryRepository<EmployeeYearlyJobDetails> {
    async fn search(
        &self,
        filter: JobDetailsFilter,
    ) -> Result<Vec<EmployeeYearlyJobDetails>, DatabaseError> {
        self.check()?;
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }
}
