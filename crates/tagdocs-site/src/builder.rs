//! End-to-end site build: configuration, README split, navigation.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tagdocs_split::{NavEntry, SplitOptions, split_readme};

use crate::SiteError;
use crate::config::{base_config, ensure_required, overlay, set_nav, validate_repo_name};

/// Name of the generated configuration file at the repository root.
pub const CONFIG_FILENAME: &str = "mkdocs.yml";

/// Inputs for one site build.
#[derive(Clone, Debug)]
pub struct SiteOptions<'a> {
    /// Repository root directory.
    pub repo_dir: &'a Path,
    /// Repository name in `org/repo` form.
    pub repo: &'a str,
    /// Path of the README, relative to the repository root.
    pub readme: &'a Path,
    /// Optional user configuration, relative to the repository root.
    pub user_config: Option<&'a Path>,
    /// Commit or ref the generated source links point at.
    pub commit: &'a str,
}

/// Output of a site build.
#[derive(Clone, Debug)]
pub struct BuiltSite {
    /// Path of the written configuration file.
    pub config_path: PathBuf,
    /// Docs output directory.
    pub docs_dir: PathBuf,
    /// Navigation entries, one per generated page.
    pub nav: Vec<NavEntry>,
    /// Non-fatal problems reported by the split.
    pub warnings: Vec<String>,
}

/// Build the site: validate inputs, assemble the configuration, split the
/// README into pages, and write `mkdocs.yml` at the repository root.
///
/// Fatal problems (missing files, paths escaping the repository, an
/// absolute `docs_dir`) abort before anything is written.
pub fn build_site(options: &SiteOptions<'_>) -> Result<BuiltSite, SiteError> {
    validate_repo_name(options.repo)?;

    let repo_dir = options
        .repo_dir
        .canonicalize()
        .map_err(|_| SiteError::RepositoryNotFound(options.repo_dir.to_path_buf()))?;

    let user_config = options
        .user_config
        .map(|path| {
            let joined = repo_dir.join(path);
            if !joined.is_file() {
                return Err(SiteError::ConfigNotFound(joined));
            }
            let resolved = joined.canonicalize()?;
            if !resolved.starts_with(&repo_dir) {
                return Err(SiteError::ConfigOutsideRepository(resolved));
            }
            Ok(resolved)
        })
        .transpose()?;

    let joined = repo_dir.join(options.readme);
    if !joined.is_file() {
        return Err(SiteError::ReadmeNotFound(joined));
    }
    let readme = joined.canonicalize()?;
    if !readme.starts_with(&repo_dir) {
        return Err(SiteError::ReadmeOutsideRepository(readme));
    }

    let readme_rel = relative_url(&readme, &repo_dir);

    let mut config = base_config(options.repo, options.commit, &readme_rel);

    if let Some(path) = &user_config {
        let text = fs::read_to_string(path)?;
        let user: Mapping = serde_yaml::from_str(&text)?;
        overlay(&mut config, user);
    }

    let docs_dir_setting = config
        .get("docs_dir")
        .and_then(Value::as_str)
        .unwrap_or("docs/")
        .to_owned();
    if Path::new(&docs_dir_setting).is_absolute() {
        return Err(SiteError::AbsoluteDocsDir(docs_dir_setting));
    }

    ensure_required(&mut config);

    let docs_dir = repo_dir.join(&docs_dir_setting);
    let report = split_readme(&SplitOptions {
        readme: &readme,
        docs_dir: &docs_dir,
        repo: options.repo,
        commit: options.commit,
    })?;

    set_nav(&mut config, &report.nav);

    let config_path = repo_dir.join(CONFIG_FILENAME);
    write_yaml(&config_path, &config)?;

    Ok(BuiltSite {
        config_path,
        docs_dir,
        nav: report.nav,
        warnings: report.warnings,
    })
}

/// Repository-relative path of a file, with forward slashes.
fn relative_url(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write a YAML document with an explicit document start marker.
pub(crate) fn write_yaml(path: &Path, mapping: &Mapping) -> Result<(), SiteError> {
    let text = format!("---\n{}", serde_yaml::to_string(mapping)?);
    fs::write(path, text)?;
    Ok(())
}
