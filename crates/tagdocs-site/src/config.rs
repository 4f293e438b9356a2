//! MkDocs configuration document construction.

use std::collections::HashSet;

use serde_yaml::{Mapping, Value};
use tagdocs_split::NavEntry;

use crate::SiteError;

/// Plugins the pipeline depends on.
const REQUIRED_PLUGINS: &[&str] = &["mike"];
/// Markdown extensions the pipeline depends on.
const REQUIRED_EXTENSIONS: &[&str] = &["admonition", "tables"];

/// Validate a repository name of the form `org/repo`.
pub fn validate_repo_name(name: &str) -> Result<(), SiteError> {
    let mut parts = name.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(org), Some(repo), None) if !org.trim().is_empty() && !repo.trim().is_empty() => {
            Ok(())
        }
        _ => Err(SiteError::RepoName(name.to_owned())),
    }
}

/// Default configuration for a repository.
///
/// Pages link back to the revision that generated them via
/// `edit_uri_template`.
pub(crate) fn base_config(repo: &str, commit: &str, readme_rel: &str) -> Mapping {
    let site_name = repo.rsplit('/').next().unwrap_or(repo);

    let mut config = Mapping::new();
    config.insert("site_name".into(), site_name.into());
    config.insert("docs_dir".into(), "docs/".into());
    config.insert("repo_url".into(), format!("https://github.com/{repo}").into());
    config.insert("theme".into(), "readthedocs".into());
    config.insert(
        "edit_uri_template".into(),
        format!("blob/{commit}/{readme_rel}").into(),
    );
    config.insert("nav".into(), Value::Sequence(Vec::new()));
    config
}

/// Overlay user configuration on the defaults, key by key.
pub(crate) fn overlay(config: &mut Mapping, user: Mapping) {
    for (key, value) in user {
        config.insert(key, value);
    }
}

/// Append the required plugins and extensions that are not already listed.
pub(crate) fn ensure_required(config: &mut Mapping) {
    extend_list(config, "plugins", REQUIRED_PLUGINS);
    extend_list(config, "markdown_extensions", REQUIRED_EXTENSIONS);
}

fn extend_list(config: &mut Mapping, key: &str, required: &[&str]) {
    if !config.contains_key(key) {
        config.insert(key.into(), Value::Sequence(Vec::new()));
    }
    let Some(Value::Sequence(list)) = config.get_mut(key) else {
        return;
    };

    // Entries may be mappings with options; only string entries count as
    // already present.
    let missing: Vec<&str> = {
        let present: HashSet<&str> = list.iter().filter_map(Value::as_str).collect();
        required
            .iter()
            .copied()
            .filter(|item| !present.contains(item))
            .collect()
    };

    for item in missing {
        list.push(item.into());
    }
}

/// Set the navigation: generated entries first, user entries after.
pub(crate) fn set_nav(config: &mut Mapping, entries: &[NavEntry]) {
    let mut nav: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let mut item = Mapping::new();
            item.insert(entry.title.clone().into(), entry.file.clone().into());
            Value::Mapping(item)
        })
        .collect();

    if let Some(Value::Sequence(existing)) = config.get("nav") {
        nav.extend(existing.iter().cloned());
    }

    config.insert("nav".into(), Value::Sequence(nav));
}
