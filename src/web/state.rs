//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::config::Config;
use crate::data::{AdminView, SubmissionStore, TableFile};

/// Cheap-to-clone handle to configuration and the submission table.
#[derive(Clone)]
pub struct WebAppState {
    config: Arc<Config>,
    submissions: SubmissionStore,
    admin: AdminView,
}

impl WebAppState {
    /// Build state around the table file named by `config`.
    pub fn new(config: Config) -> Self {
        let file = TableFile::new(config.table_path());
        Self::with_table(config, file)
    }

    /// Build state around an already opened table file.
    pub fn with_table(config: Config, file: TableFile) -> Self {
        let submissions = file.submissions(config.storage.on_corrupt);
        let admin = file.admin_view();
        Self {
            config: Arc::new(config),
            submissions,
            admin,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn submissions(&self) -> &SubmissionStore {
        &self.submissions
    }

    pub fn admin(&self) -> &AdminView {
        &self.admin
    }
}
