use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::util::paths::{config_path, data_dir};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Web server settings
    pub server: ServerSettings,
    /// Backing table settings
    pub storage: StorageConfig,
    /// Text and assets shown on the portal page
    pub portal: PortalConfig,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

/// How the store reacts to a backing file it cannot parse.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CorruptTablePolicy {
    /// Rename the unreadable file aside, then start a new table.
    Quarantine,
    /// Overwrite the unreadable file with a new table.
    Discard,
    /// Reject the write and leave the file alone.
    Refuse,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Table file name; relative paths resolve against the data directory.
    pub table_file: PathBuf,
    pub on_corrupt: CorruptTablePolicy,
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    /// Relative paths resolve against the data directory.
    pub logo_path: PathBuf,
    pub download_filename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_permissive: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStorageConfig {
    pub table_file: Option<PathBuf>,
    pub on_corrupt: Option<CorruptTablePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPortalConfig {
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_path: Option<PathBuf>,
    pub download_filename: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server: Option<TomlServerConfig>,
    pub storage: Option<TomlStorageConfig>,
    pub portal: Option<TomlPortalConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8501,
                cors_permissive: false,
            },
            storage: StorageConfig {
                table_file: PathBuf::from("ela_subcontractor_signups.csv"),
                on_corrupt: CorruptTablePolicy::Quarantine,
            },
            portal: PortalConfig {
                company_name: "ELA Management LLC".to_string(),
                contact_email: "elamgmtllc@gmail.com".to_string(),
                contact_phone: "832 273 0498".to_string(),
                logo_path: PathBuf::from("ela_logo.png"),
                download_filename: "ela_subcontractor_signups.csv".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the default location, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load configuration from `config_file`, writing the bundled example
    /// there first if nothing exists yet.
    pub fn load_from(config_file: &Path) -> Self {
        let mut config = Config::default();

        if !config_file.exists() {
            Self::create_default_config(config_file);
        }

        match fs::read_to_string(config_file) {
            Ok(contents) => match toml::from_str::<TomlConfig>(&contents) {
                Ok(toml_config) => config.merge(toml_config),
                Err(e) => {
                    tracing::warn!(
                        path = %config_file.display(),
                        error = %e,
                        "Ignoring unparsable config file, using defaults"
                    );
                }
            },
            Err(e) => {
                tracing::debug!(
                    path = %config_file.display(),
                    error = %e,
                    "No readable config file, using defaults"
                );
            }
        }

        config
    }

    /// Overlay every value present in the parsed file.
    pub fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(cors_permissive) = server.cors_permissive {
                self.server.cors_permissive = cors_permissive;
            }
        }

        if let Some(storage) = toml_config.storage {
            if let Some(table_file) = storage.table_file {
                self.storage.table_file = table_file;
            }
            if let Some(on_corrupt) = storage.on_corrupt {
                self.storage.on_corrupt = on_corrupt;
            }
        }

        if let Some(portal) = toml_config.portal {
            if let Some(company_name) = portal.company_name {
                self.portal.company_name = company_name;
            }
            if let Some(contact_email) = portal.contact_email {
                self.portal.contact_email = contact_email;
            }
            if let Some(contact_phone) = portal.contact_phone {
                self.portal.contact_phone = contact_phone;
            }
            if let Some(logo_path) = portal.logo_path {
                self.portal.logo_path = logo_path;
            }
            if let Some(download_filename) = portal.download_filename {
                self.portal.download_filename = download_filename;
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Absolute path of the backing CSV table.
    pub fn table_path(&self) -> PathBuf {
        resolve_in_data_dir(&self.storage.table_file)
    }

    /// Absolute path of the optional logo image.
    pub fn logo_path(&self) -> PathBuf {
        resolve_in_data_dir(&self.portal.logo_path)
    }

    pub fn with_table_file(mut self, table_file: PathBuf) -> Self {
        self.storage.table_file = table_file;
        self
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptTablePolicy) -> Self {
        self.storage.on_corrupt = policy;
        self
    }
}

fn resolve_in_data_dir(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_example_config_parses() {
        let parsed: TomlConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        let mut config = Config::default();
        config.merge(parsed);

        let defaults = Config::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.storage.on_corrupt, CorruptTablePolicy::Quarantine);
        assert_eq!(config.portal.download_filename, "ela_subcontractor_signups.csv");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [storage]
            on_corrupt = "refuse"
            "#,
        )
        .unwrap();
        let mut config = Config::default();
        config.merge(parsed);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.on_corrupt, CorruptTablePolicy::Refuse);
        assert_eq!(config.portal.company_name, "ELA Management LLC");
    }

    #[test]
    fn test_load_from_writes_example_on_first_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path);

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_load_from_ignores_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.server.port, Config::default().server.port);
    }

    #[test]
    fn test_absolute_table_file_is_kept() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("signups.csv");
        let config = Config::default().with_table_file(table.clone());
        assert_eq!(config.table_path(), table);
    }
}
