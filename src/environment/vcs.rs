use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::Repository;
use serde::Serialize;

use super::go_command_output;
use crate::helpers::find_repository_root;
use crate::prelude::*;

/// The commit a benchmarked package was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitFacts {
    pub commit: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<Committer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committer {
    pub date: DateTime<Utc>,
}

/// Resolves the version-control facts of a Go package.
///
/// Implementations never fail: anything that cannot be resolved is `None`.
pub trait VcsProbe {
    fn git_facts(&self, pkg: &str) -> Option<GitFacts>;
}

/// Looks the package up with `go list` and reads HEAD of its enclosing git repository.
pub struct GitVcsProbe;

impl VcsProbe for GitVcsProbe {
    fn git_facts(&self, pkg: &str) -> Option<GitFacts> {
        if pkg.is_empty() {
            return None;
        }
        let package_dir = resolve_package_dir(pkg)?;
        let repository_root = find_repository_root(&package_dir)?;

        read_head_commit(&repository_root)
            .map_err(|e| debug!("Could not read the HEAD commit of {pkg}: {e:#}"))
            .ok()
    }
}

fn resolve_package_dir(pkg: &str) -> Option<PathBuf> {
    let dir = go_command_output(&["list", "-f", "{{.Dir}}", pkg])?;
    Some(PathBuf::from(dir))
}

pub fn read_head_commit(repository_root: &Path) -> Result<GitFacts> {
    let repository = Repository::open(repository_root).context(format!(
        "Failed to open repository at path: {}",
        repository_root.display()
    ))?;
    let commit = repository
        .head()
        .context("Failed to get HEAD")?
        .peel_to_commit()
        .context("Failed to get HEAD commit")?;

    let Some(subject) = commit.summary().filter(|subject| !subject.is_empty()) else {
        bail!("HEAD commit {} has no subject", commit.id());
    };
    let committer = DateTime::from_timestamp(commit.committer().when().seconds(), 0)
        .map(|date| Committer { date });

    Ok(GitFacts {
        commit: commit.id().to_string(),
        subject: subject.to_string(),
        committer,
    })
}
