use crate::{
    data::{
        pagination::PageRequest,
        student::{NewStudent, Student, StudentUpdate},
    },
    error::RollcallResult,
};
use async_trait::async_trait;

#[cfg(test)]
pub mod memory;
pub mod pagination;
pub mod postgres;
pub mod student;

/// Everything the routes need from the record store.
///
/// Writes report how many rows they touched so callers can log it, but a write
/// that touches nothing is not an error.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn get_page(&self, request: &PageRequest) -> RollcallResult<Vec<Student>>;
    async fn get_by_id(&self, id: &str) -> RollcallResult<Option<Student>>;
    /// Returns the id the student was stored under.
    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<String>;
    async fn update(&self, id: &str, update: StudentUpdate) -> RollcallResult<u64>;
    async fn remove(&self, id: &str) -> RollcallResult<u64>;
    async fn close(&self);
}
