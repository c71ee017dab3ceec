use sysinfo::System;

use super::go_command_output;
use crate::prelude::*;

/// Facts about the machine the benchmarks ran on. Each one is best effort.
pub trait HostProbe {
    fn hostname(&self) -> Option<String>;
    fn os_version(&self) -> Option<String>;
    fn go_version(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub hostname: Option<String>,
    pub os_version: Option<String>,
    pub go_version: Option<String>,
}

impl HostFacts {
    pub fn collect(probe: &dyn HostProbe) -> Self {
        let facts = Self {
            hostname: probe.hostname(),
            os_version: probe.os_version(),
            go_version: probe.go_version(),
        };
        debug!("Host facts: {facts:?}");
        facts
    }
}

pub struct SystemHostProbe;

impl HostProbe for SystemHostProbe {
    fn hostname(&self) -> Option<String> {
        System::host_name()
    }

    /// The kernel release, only reported on Linux.
    fn os_version(&self) -> Option<String> {
        if cfg!(target_os = "linux") {
            System::kernel_version().map(|version| version.trim().to_string())
        } else {
            None
        }
    }

    fn go_version(&self) -> Option<String> {
        go_command_output(&["env", "GOVERSION"])
    }
}
