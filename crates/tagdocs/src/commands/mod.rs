//! CLI subcommands.

mod backfill;
mod configure;
mod publish;

pub(crate) use backfill::BackfillArgs;
pub(crate) use configure::ConfigureArgs;
pub(crate) use publish::PublishArgs;

use std::env;
use std::path::Path;

/// Treat the literal `None` as an absent config path.
///
/// The CI action template passes its default input verbatim.
pub(crate) fn effective_config(config: Option<&Path>) -> Option<&Path> {
    config.filter(|path| path.as_os_str() != "None")
}

/// `true` when the variable is set to a non-empty value.
pub(crate) fn env_truthy(name: &str) -> bool {
    env::var(name).is_ok_and(|value| !value.is_empty())
}
