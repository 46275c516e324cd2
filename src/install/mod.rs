//! The installation pipeline.
//!
//! - [`package_manager`] - Finds or bootstraps the package manager
//! - [`venv`] - Creates the isolated environment
//! - [`dependencies`] - Installs requirements, batch or one by one
//! - [`config_files`] - Copies config templates into place
//! - [`pipeline`] - Stage definitions and failure policy
//! - [`installer`] - Binds stages to the components above

pub mod config_files;
pub mod dependencies;
pub mod installer;
pub mod package_manager;
pub mod pipeline;
pub mod venv;

pub use config_files::{ConfigMaterializer, ExistingTarget, Materialized};
pub use dependencies::{DependencyInstaller, DependencyList, InstallMode};
pub use installer::{InstallOptions, Installer};
pub use package_manager::{plan_bootstrap, BootstrapPlan, PackageManagerProvisioner, Provisioned};
pub use pipeline::{
    FailurePolicy, InstallationOutcome, Pipeline, Stage, StageKind, StageResult,
};
pub use venv::{EnvironmentBuilder, EnvironmentLayout};

pub(crate) use package_manager::exit_code_text;
