//! Account ledger and session engine behind a single-user banking dashboard.
//!
//! - [`account`]: account model and the [`account::AccountStore`] owning them.
//! - [`ledger`]: balance, summary and display ordering derived from an account history.
//! - [`session`]: the single session and its idle countdown.
//! - [`engine`]: transfer, loan and close operations with delayed settlement.
//! - [`dashboard`]: intent dispatcher wiring the above to a [`render::RenderSink`].

pub mod account;
pub mod clock;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod format;
pub mod ledger;
pub mod logging;
pub mod render;
pub mod scheduler;
pub mod seed;
pub mod session;
