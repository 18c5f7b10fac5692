//! Command Handlers module
//!
//! Handlers that orchestrate writes: validation happens in the commands,
//! persistence goes through the store repositories.

mod account_handler;
mod commands;
mod company_handler;


pub use account_handler::{AddAccountHandler, DeleteAccountHandler, UpdateAccountStatusHandler};
pub use commands::*;
pub use company_handler::{CreateCompanyHandler, DeleteCompanyHandler};
