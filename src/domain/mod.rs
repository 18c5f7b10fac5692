//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod date;
pub mod error;
pub mod patch;
pub mod status;

pub use amount::{format_amount, parse_amount, AmountError};
pub use date::{parse_date, parse_optional_date};
pub use error::DomainError;
pub use patch::Patch;
pub use status::{initial_settled_date, resolve_settled_date, AccountStatus};
