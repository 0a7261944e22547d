pub mod config;
pub mod data;
pub mod util;
pub mod web;

pub use config::{Config, CorruptTablePolicy};
pub use data::{
    AdminView, AppendOutcome, Record, StoreError, SubmissionForm, SubmissionStore, Table,
    TableFile, ValidationError,
};
pub use web::{build_router, run_server, ServerConfig, WebAppState};
