//! Per-version configuration overrides.
//!
//! Tag-pinned deployments need `repo_url` and `edit_uri_template` pointing
//! at the tag rather than the commit. The site generator supports chaining
//! configuration files through an `INHERIT` key, so a small temporary
//! document next to the base configuration carries just the overrides.

use std::io::Write;
use std::path::Path;

use serde_yaml::Mapping;

use crate::SiteError;

/// Key the site generator uses to chain configuration files.
const INHERIT_KEY: &str = "INHERIT";

/// A temporary override configuration inheriting from a base file.
///
/// The file lives next to the base configuration (relative `INHERIT` paths
/// resolve against the inheriting file) and is removed on drop, so keep
/// the handle alive for the duration of the deployment using it.
#[derive(Debug)]
pub struct InheritedConfig {
    file: tempfile::NamedTempFile,
}

impl InheritedConfig {
    /// Path of the override configuration file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Write an override configuration inheriting from `base`.
pub fn inherited_config(base: &Path, overrides: &Mapping) -> Result<InheritedConfig, SiteError> {
    let dir = base.parent().unwrap_or_else(|| Path::new("."));
    let base_name = base
        .file_name()
        .ok_or_else(|| SiteError::ConfigNotFound(base.to_path_buf()))?;

    let mut document = Mapping::new();
    document.insert(
        INHERIT_KEY.into(),
        base_name.to_string_lossy().into_owned().into(),
    );
    for (key, value) in overrides {
        document.insert(key.clone(), value.clone());
    }

    let mut file = tempfile::Builder::new()
        .prefix("tagdocs-")
        .suffix(".yml")
        .tempfile_in(dir)?;
    let text = format!("---\n{}", serde_yaml::to_string(&document)?);
    file.write_all(text.as_bytes())?;
    file.flush()?;

    Ok(InheritedConfig { file })
}
