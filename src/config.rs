use std::time::Duration;

use semver::Version;
use url::Url;

use crate::app::Cli;
use crate::document::Tags;
use crate::prelude::*;

/// Where and how to send documents when indexing directly into Elasticsearch.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticsearchConfig {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout: Duration,
    pub skip_tls_verify: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` writes the bulk stream to stdout instead of sending it.
    pub elasticsearch: Option<ElasticsearchConfig>,
    pub index: String,
    /// Version the stdout stream is shaped for when no cluster is queried.
    pub target_version: Option<Version>,
    pub tags: Tags,
    pub verbose: bool,
}

impl TryFrom<Cli> for Config {
    type Error = Error;
    fn try_from(cli: Cli) -> Result<Self> {
        let tags = parse_tags(cli.tag.as_deref().unwrap_or_default())?;
        let elasticsearch = cli
            .es
            .filter(|raw_url| !raw_url.is_empty())
            .map(|raw_url| -> Result<ElasticsearchConfig> {
                let url = Url::parse(&raw_url)
                    .map_err(|e| anyhow!("invalid Elasticsearch URL {raw_url:?}: {e}"))?;
                Ok(ElasticsearchConfig {
                    url,
                    username: cli.es_username.filter(|username| !username.is_empty()),
                    password: cli.es_password.filter(|password| !password.is_empty()),
                    request_timeout: Duration::from_secs(cli.request_timeout),
                    skip_tls_verify: cli.tls_skip_verify,
                })
            })
            .transpose()?;

        Ok(Self {
            elasticsearch,
            index: cli.index,
            target_version: cli.target_version,
            tags,
            verbose: cli.verbose,
        })
    }
}

/// Parse a comma-separated list of `key=value` pairs. Blank entries are skipped and
/// surrounding whitespace is trimmed from keys and values.
pub fn parse_tags(raw_tags: &str) -> Result<Tags> {
    let mut tags = Tags::new();
    for field in raw_tags.split(',').map(str::trim) {
        if field.is_empty() {
            continue;
        }
        let (key, value) = field
            .split_once('=')
            .with_context(|| format!("invalid key-value pair {field:?} in --tag: missing '='"))?;
        tags.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(tags)
}
