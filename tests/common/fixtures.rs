//! Temp-dir backed submission tables

use std::path::PathBuf;

use subportal::{AdminView, CorruptTablePolicy, SubmissionForm, SubmissionStore, TableFile};
use tempfile::TempDir;

/// A submission table living in its own temporary directory.
pub struct TestTable {
    pub dir: TempDir,
    pub path: PathBuf,
    pub store: SubmissionStore,
    pub admin: AdminView,
}

impl TestTable {
    pub fn new(policy: CorruptTablePolicy) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("ela_subcontractor_signups.csv");
        let file = TableFile::new(path.clone());
        Self {
            store: file.submissions(policy),
            admin: file.admin_view(),
            path,
            dir,
        }
    }

    /// Row count as currently persisted, zero when the file is absent.
    pub fn row_count(&self) -> usize {
        self.admin
            .load()
            .expect("Failed to load table")
            .map(|t| t.len())
            .unwrap_or(0)
    }
}

/// A form with only the required fields filled in.
pub fn required_only(business_name: &str, phone: &str, email: &str) -> SubmissionForm {
    SubmissionForm {
        business_name: business_name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}
