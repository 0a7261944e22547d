//! Data persistence layer
//!
//! Submissions live in a single CSV table. [`SubmissionStore`] appends to it,
//! [`AdminView`] reads, deletes from and exports it.

mod models;
mod store;
mod table;

pub use models::{
    Record, SubmissionForm, ValidationError, YesNo, CERTIFICATION_OPTIONS, COLUMNS,
    SERVICE_OPTIONS, TIMESTAMP_FORMAT,
};
pub use store::{AdminView, AppendOutcome, StoreError, SubmissionStore, TableFile};
pub use table::{PositionOutOfRange, Table, TableParseError};
