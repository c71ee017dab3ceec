//! Assembly of the bulk action and document indexed for each benchmark result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::bench::{BenchmarkRecord, ExtraMetrics, RunContext};
use crate::elasticsearch::{Compatibility, DOC_TYPE};
use crate::environment::{GitFacts, HostFacts};

/// User supplied `key=value` pairs added to every document.
pub type Tags = BTreeMap<String, String>;

/// Facts shared by every document of a run.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub executed_at: DateTime<Utc>,
    pub host: HostFacts,
    pub tags: Tags,
}

impl RunMetadata {
    pub fn new(executed_at: DateTime<Utc>, host: HostFacts, tags: Tags) -> Self {
        Self {
            executed_at,
            host,
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub executed_at: DateTime<Utc>,
    pub name: String,
    pub iterations: u64,
    pub pkg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    pub goos: String,
    pub goarch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_per_op: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mb_per_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloced_bytes_per_op: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocs_per_op: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_metrics: Option<ExtraMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitFacts>,
    /// Merged into the top level by [`Document::to_json`].
    #[serde(skip)]
    pub tags: Tags,
}

impl Document {
    pub fn new(
        record: &BenchmarkRecord,
        extra_metrics: Option<ExtraMetrics>,
        context: &RunContext,
        metadata: &RunMetadata,
        git: Option<GitFacts>,
    ) -> Self {
        Self {
            executed_at: metadata.executed_at,
            name: record.name().to_string(),
            iterations: record.iterations(),
            pkg: context.pkg.clone(),
            hostname: metadata.host.hostname.clone(),
            go_version: metadata.host.go_version.clone(),
            os_version: metadata.host.os_version.clone(),
            goos: context.goos.clone(),
            goarch: context.goarch.clone(),
            ns_per_op: record.ns_per_op(),
            mb_per_s: record.mb_per_s(),
            alloced_bytes_per_op: record.alloced_bytes_per_op(),
            allocs_per_op: record.allocs_per_op(),
            extra_metrics: extra_metrics.filter(|metrics| !metrics.is_empty()),
            git,
            tags: metadata.tags.clone(),
        }
    }

    /// The JSON object sent to Elasticsearch. Tags are applied last and replace any
    /// field with the same name.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, tag) in &self.tags {
                fields.insert(key.clone(), Value::String(tag.clone()));
            }
        }
        Ok(value)
    }
}

/// Bulk API header preceding each document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexAction {
    index: IndexTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct IndexTarget {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    doc_type: Option<&'static str>,
}

impl IndexAction {
    pub fn new(index: &str, compatibility: Compatibility) -> Self {
        Self {
            index: IndexTarget {
                index: index.to_string(),
                doc_type: compatibility
                    .include_type_discriminator
                    .then_some(DOC_TYPE),
            },
        }
    }
}
