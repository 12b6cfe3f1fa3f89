//! Transfer, loan and close operations.
//!
//! Provides [`TransactionService`] which validates operations against the
//! [`crate::account::AccountStore`] and [`crate::ledger`] figures, and [`Settlement`] which
//! records accepted transfers and loans once their delay elapsed.

pub mod settlement;
pub mod transaction_service;

pub use settlement::Settlement;
pub use transaction_service::Operation;
pub use transaction_service::RejectReason;
pub use transaction_service::TransactionError;
pub use transaction_service::TransactionService;
