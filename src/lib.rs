//! Poll per-company application status endpoints and keep an append-only
//! text log of each snapshot.

pub mod cli;
pub mod core;
pub mod formatter;
pub mod tracker;
pub mod types;

pub use cli::{handle_tracker_command, TrackerCli};
pub use formatter::format_application;
pub use tracker::{BatchReport, CompanyOutcome, Tracker};
pub use types::ApplicationRecord;
