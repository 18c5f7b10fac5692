//! ledger_desk Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod jobs;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{AccountStatus, AmountError, DomainError, Patch};
pub use error::AppError;
