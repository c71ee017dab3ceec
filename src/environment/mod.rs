//! Best-effort facts about the host and the benchmarked sources.

use std::process::Command;

use crate::prelude::*;

mod host;
mod vcs;

pub use host::{HostFacts, SystemHostProbe};
pub use vcs::{GitFacts, GitVcsProbe, VcsProbe};

#[cfg(test)]
pub use vcs::Committer;

/// Run the `go` tool and return its trimmed stdout, or `None` if it fails or prints nothing.
fn go_command_output(args: &[&str]) -> Option<String> {
    let output = match Command::new("go").args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("Failed to run `go {}`: {e}", args.join(" "));
            return None;
        }
    };
    if !output.status.success() {
        debug!(
            "`go {}` exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let stdout = String::from_utf8(output.stdout).ok()?;
    let stdout = stdout.trim();
    (!stdout.is_empty()).then(|| stdout.to_string())
}
