//! Data access layer
//!
//! Repositories over the shared `PgPool` and the transactional unit of work.

pub mod accounts;
pub mod companies;
pub mod models;
pub mod unit_of_work;
pub mod users;

pub use accounts::AccountRepository;
pub use companies::{CompanyPage, CompanyRepository};
pub use models::{
    AccountKind, AccountPayable, AccountReceivable, AccountRow, Company, CompanyDetails,
    CompanySummary, CostCenter, CostCenterDetails, NewAccount, Post, User, UserWithPosts,
};
pub use unit_of_work::{in_transaction, TxFuture};
pub use users::UserRepository;
