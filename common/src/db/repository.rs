// Repository abstraction shared by all services
// Postgres implementations live in `repositories`, the in-memory one in `memory`

use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;

use crate::errors::DatabaseError;
use crate::models::{EmployeeYearlyJobDetails, UserProfile};

/// A stored record with a caller-supplied key.
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Lower-case name used in per-item messages (`department Id 4 already exists `)
    const LABEL: &'static str;
    /// Capitalized name used in summaries (`Fetching page 1 with 3 Department data records`)
    const TITLE: &'static str;
    /// JSON field holding lists of this record in requests and responses
    const LIST_FIELD: &'static str;

    fn id(&self) -> Self::Id;
}

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Cheap round trip used by the database connection probe
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;

    /// Records ordered by key
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<R>, DatabaseError>;

    async fn find(&self, id: R::Id) -> Result<Option<R>, DatabaseError>;

    async fn exists(&self, id: R::Id) -> Result<bool, DatabaseError> {
        Ok(self.find(id).await?.is_some())
    }

    async fn insert(&self, record: &R) -> Result<(), DatabaseError>;

    /// Replace the stored record; `NotFound` when the key is absent
    async fn update(&self, record: &R) -> Result<(), DatabaseError>;

    /// `NotFound` when the key is absent
    async fn delete(&self, id: R::Id) -> Result<(), DatabaseError>;
}

/// User lookups needed by authentication
#[async_trait]
pub trait UserStore: Repository<UserProfile> {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserProfile>, DatabaseError>;
}

/// Which part of the composite key a job details search filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobDetailsFilter {
    Employee(i64),
    Year(i32),
    Both { employee_id: i64, year: i32 },
}

impl JobDetailsFilter {
    pub fn matches(&self, details: &EmployeeYearlyJobDetails) -> bool {
        match *self {
            JobDetailsFilter::Employee(employee_id) => details.employee_id == employee_id,
            JobDetailsFilter::Year(year) => details.year == year,
            JobDetailsFilter::Both { employee_id, year } => {
                details.employee_id == employee_id && details.year == year
            }
        }
    }
}

#[async_trait]
pub trait JobDetailsStore: Repository<EmployeeYearlyJobDetails> {
    async fn search(
        &self,
        filter: JobDetailsFilter,
    ) -> Result<Vec<EmployeeYearlyJobDetails>, DatabaseError>;
}
