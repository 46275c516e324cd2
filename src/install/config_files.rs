//! Template configuration materialization.
//!
//! Copies a template (e.g. `config/config.example.toml`) to its active
//! location byte for byte. An existing active file is kept unless the
//! caller asks to overwrite it, so re-running the installer does not
//! discard a user's edits.

use std::fs::{self, File, FileTimes};
use std::path::Path;

use crate::error::{PitchError, Result};
use crate::ui::{Prompt, UserInterface};

/// What to do when the target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingTarget {
    /// Leave it untouched.
    Keep,
    /// Replace it with the template.
    Overwrite,
    /// Ask the user (default: keep).
    Ask,
}

/// Result of a successful materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// Target did not exist and was created.
    Created,
    /// Target existed and was replaced.
    Overwritten,
    /// Target existed and was kept.
    Kept,
}

/// Copies templates to their active locations.
pub struct ConfigMaterializer {
    existing: ExistingTarget,
}

impl ConfigMaterializer {
    pub fn new(existing: ExistingTarget) -> Self {
        Self { existing }
    }

    /// Copy `template` to `target`.
    ///
    /// Fails with `MissingFile` (and creates nothing) when the template is
    /// absent. Parent directories of `target` are created as needed.
    /// Permissions and access/modification times are carried over.
    pub fn materialize(
        &self,
        template: &Path,
        target: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<Materialized> {
        if !template.is_file() {
            return Err(PitchError::MissingFile {
                path: template.to_path_buf(),
            });
        }

        let existed = target.exists();
        if existed && !self.should_overwrite(target, ui)? {
            tracing::debug!("Keeping existing {}", target.display());
            return Ok(Materialized::Kept);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(template, target)?;
        copy_times(template, target)?;
        tracing::debug!("Copied {} to {}", template.display(), target.display());

        Ok(if existed {
            Materialized::Overwritten
        } else {
            Materialized::Created
        })
    }

    fn should_overwrite(&self, target: &Path, ui: &mut dyn UserInterface) -> Result<bool> {
        match self.existing {
            ExistingTarget::Keep => Ok(false),
            ExistingTarget::Overwrite => Ok(true),
            ExistingTarget::Ask => {
                let prompt = Prompt::confirm(
                    &prompt_key(target),
                    &format!("{} already exists. Overwrite it with the template?", target.display()),
                    false,
                );
                ui.confirm(&prompt)
            }
        }
    }
}

/// Give `target` the access and modification times of `source`.
fn copy_times(source: &Path, target: &Path) -> Result<()> {
    let meta = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    File::options().write(true).open(target)?.set_times(times)?;
    Ok(())
}

/// Prompt key for overwriting `target`, e.g. `overwrite_config_toml`.
pub fn prompt_key(target: &Path) -> String {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("overwrite_{}", slug)
}
