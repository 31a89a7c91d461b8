// Database layer module

pub mod pool;
pub mod repositories;
pub mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use pool::DbPool;
pub use repository::{JobDetailsFilter, JobDetailsStore, Record, Repository, UserStore};

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryRepository;
