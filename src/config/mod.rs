mod settings;

pub use settings::{
    Config, CorruptTablePolicy, PortalConfig, ServerSettings, StorageConfig, TomlConfig,
    EXAMPLE_CONFIG,
};
