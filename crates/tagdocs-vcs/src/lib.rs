//! Synchronous `git` plumbing.
//!
//! Version control is an external collaborator: this crate shells out to
//! the `git` binary and treats every invocation as an atomic, synchronous
//! call. A failing command aborts the run with its command line and
//! captured output attached ([`CommandError`]); no partial results are
//! modeled.
//!
//! [`Git`] implements the [`tagdocs_version::History`] oracle, backing the
//! alias assigner's ancestry queries with `git merge-base --is-ancestor`.

mod ci;
mod command;
mod git;

pub use ci::setup_ci_identity;
pub use command::CommandError;
pub use git::Git;

use std::path::Path;

/// Run an arbitrary external tool, capturing output for diagnostics.
///
/// Shared by the publisher and container plumbing, which drive tools other
/// than git with the same atomic success-or-abort contract.
pub fn run_tool(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String, CommandError> {
    command::run_captured(program, args, cwd)
}
