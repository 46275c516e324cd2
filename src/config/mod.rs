//! Installer configuration loading and validation.
//!
//! Pitch works without any configuration file: every setting has a
//! default. A project may override them in `.pitch/config.yml`.
//!
//! # Modules
//!
//! - [`schema`] - Configuration struct definitions
//! - [`loader`] - File discovery, parsing, and validation

pub mod loader;
pub mod schema;

pub use loader::{load_config, project_config_path, LoadedConfig, CONFIG_DIR, CONFIG_FILE};
pub use schema::{
    Features, InstallerConfig, PackageManagerSettings, PostInstallSettings, PythonSettings,
    TemplateFile, VerificationSettings,
};
