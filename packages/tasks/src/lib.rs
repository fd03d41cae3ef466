// ABOUTME: Task management for Promemoria
// ABOUTME: Provides the task model and CRUD operations over SQLite

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_tests;

pub use storage::*;
pub use types::*;
