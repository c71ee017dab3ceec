use std::io::{BufRead, Write};

use chrono::Utc;
use clap::{
    Parser,
    builder::{Styles, styling},
};
use semver::Version;

use crate::{
    config::Config,
    document::RunMetadata,
    driver::StreamDriver,
    elasticsearch::{Compatibility, ElasticsearchClient},
    environment::{GitVcsProbe, HostFacts, SystemHostProbe, VcsProbe},
    local_logger::init_local_logger,
    prelude::*,
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

/// Default timeout of requests to Elasticsearch.
///
/// Large because it also bounds reading the response of the bulk request.
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 600;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Read `go test -bench` output on stdin and index the results into Elasticsearch",
    styles = create_styles()
)]
pub struct Cli {
    /// Elasticsearch URL into which the benchmark data should be indexed, e.g. http://localhost:9200.
    /// When omitted, bulk requests are written to stdout.
    #[arg(long, env = "GOBENCH_ES_URL")]
    pub es: Option<String>,

    /// Elasticsearch index into which the benchmarks should be stored
    #[arg(long, default_value = "gobench")]
    pub index: String,

    /// Elasticsearch username used for authentication
    #[arg(long)]
    pub es_username: Option<String>,

    /// Elasticsearch password used for authentication
    #[arg(long, env = "GOBENCH_ES_PASSWORD", hide_env_values = true)]
    pub es_password: Option<String>,

    /// HTTP timeout of requests to Elasticsearch, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    pub request_timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long, visible_alias = "tls-verify")]
    pub tls_skip_verify: bool,

    /// Elasticsearch version the stdout output is shaped for, when --es is not set.
    /// Defaults to the latest major version.
    #[arg(long)]
    pub target_version: Option<Version>,

    /// Comma-separated list of key=value pairs to add to each document
    #[arg(long)]
    pub tag: Option<String>,

    /// Be verbose
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_local_logger(cli.verbose)?;
    let config = Config::try_from(cli)?;
    debug!("config: {config:#?}");

    let host = HostFacts::collect(&SystemHostProbe);
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    index(&config, host, &GitVcsProbe, stdin, &mut stdout).await?;
    stdout.flush()?;

    Ok(())
}

/// Index the benchmark results read from `input`.
///
/// Without an Elasticsearch URL the bulk stream is written to `output`. Otherwise the
/// cluster is queried and bootstrapped before any input is read, and `output` only
/// receives the stream in verbose mode. Returns the number of documents produced.
pub async fn index<R: BufRead, W: Write>(
    config: &Config,
    host: HostFacts,
    vcs: &dyn VcsProbe,
    input: R,
    output: &mut W,
) -> Result<usize> {
    let Some(es_config) = &config.elasticsearch else {
        let compatibility = config
            .target_version
            .as_ref()
            .map(Compatibility::from)
            .unwrap_or_default();
        let metadata = RunMetadata::new(Utc::now(), host, config.tags.clone());
        let mut driver = StreamDriver::new(&config.index, compatibility, metadata, vcs);
        return driver.run(input, output);
    };

    let client = ElasticsearchClient::new(es_config, config.verbose)?;
    let version = client
        .version()
        .await
        .context("Failed to determine the Elasticsearch version")?;
    let compatibility = Compatibility::from(&version);
    client
        .create_index(&config.index, compatibility)
        .await
        .context("error creating/updating mapping")?;

    let metadata = RunMetadata::new(Utc::now(), host, config.tags.clone());
    let mut driver = StreamDriver::new(&config.index, compatibility, metadata, vcs);
    let mut body = Vec::new();
    let documents = driver.run(input, &mut body)?;
    if config.verbose {
        output.write_all(&body)?;
    }

    if documents == 0 {
        info!("No benchmark results found in the input, nothing to index");
        return Ok(0);
    }
    client
        .bulk(body)
        .await
        .context("error executing bulk updates")?;
    info!(
        "Indexed {documents} benchmark results into {}",
        config.index
    );

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::config::ElasticsearchConfig;
    use crate::document::Tags;
    use crate::elasticsearch::test_server::{serve_sequence, unreachable_url};
    use crate::environment::GitFacts;

    const OUTPUT: &[u8] = b"goos: linux\ngoarch: arm64\npkg: github.com/x/y\nBenchmarkEncode-8\t1000\t1042 ns/op\nBenchmarkDecode-8\t2000\t610 ns/op\nPASS\n";

    const VERSION_7: &str = r#"{"version":{"number":"7.17.0"}}"#;
    const CREATED: &str = r#"{"acknowledged":true,"index":"gobench"}"#;
    const BULK_OK: &str = r#"{"took":2,"errors":false,"items":[{"index":{"status":201}},{"index":{"status":201}}]}"#;

    struct NoVcs;

    impl VcsProbe for NoVcs {
        fn git_facts(&self, _pkg: &str) -> Option<GitFacts> {
            None
        }
    }

    fn config(url: Option<Url>, verbose: bool) -> Config {
        Config {
            elasticsearch: url.map(|url| ElasticsearchConfig {
                url,
                username: None,
                password: None,
                request_timeout: Duration::from_secs(5),
                skip_tls_verify: false,
            }),
            index: "gobench".into(),
            target_version: None,
            tags: Tags::new(),
            verbose,
        }
    }

    #[tokio::test]
    async fn test_passthrough_writes_the_stream() {
        let mut output = Vec::new();

        let documents = index(&config(None, false), HostFacts::default(), &NoVcs, OUTPUT, &mut output)
            .await
            .unwrap();

        assert_eq!(documents, 2);
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 4);
        assert!(output.starts_with(r#"{"index":{"_index":"gobench"}}"#));
    }

    #[tokio::test]
    async fn test_direct_send() {
        let (url, server) = serve_sequence(vec![(200, VERSION_7), (200, CREATED), (200, BULK_OK)]);
        let mut output = Vec::new();

        let documents = index(&config(Some(url), false), HostFacts::default(), &NoVcs, OUTPUT, &mut output)
            .await
            .unwrap();

        assert_eq!(documents, 2);
        assert!(output.is_empty());
        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET / HTTP/1.1"));
        assert!(requests[1].starts_with("PUT /gobench HTTP/1.1"));
        assert!(requests[2].starts_with("POST /_bulk HTTP/1.1"));
        assert!(requests[2].contains(r#"{"index":{"_index":"gobench","_type":"_doc"}}"#));
        assert!(requests[2].contains(r#""name":"BenchmarkDecode-8""#));
    }

    #[tokio::test]
    async fn test_verbose_direct_send_echoes_the_stream() {
        let (url, server) = serve_sequence(vec![(200, VERSION_7), (200, CREATED), (200, BULK_OK)]);
        let mut output = Vec::new();

        index(&config(Some(url), true), HostFacts::default(), &NoVcs, OUTPUT, &mut output)
            .await
            .unwrap();

        let requests = server.join().unwrap();
        let echoed = String::from_utf8(output).unwrap();
        assert_eq!(echoed.lines().count(), 4);
        assert!(requests[2].ends_with(&echoed));
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_before_reading_input() {
        let mut input = OUTPUT;

        let err = index(
            &config(Some(unreachable_url()), false),
            HostFacts::default(),
            &NoVcs,
            &mut input,
            &mut Vec::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Failed to determine the Elasticsearch version");
        assert_eq!(input, OUTPUT);
    }

    #[tokio::test]
    async fn test_malformed_version_sends_nothing() {
        let (url, server) = serve_sequence(vec![(200, r#"{"version":{"number":"seven"}}"#)]);
        let mut input = OUTPUT;

        let err = index(&config(Some(url), false), HostFacts::default(), &NoVcs, &mut input, &mut Vec::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to determine the Elasticsearch version");
        assert_eq!(input, OUTPUT);
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_no_documents_skips_bulk() {
        let (url, server) = serve_sequence(vec![(200, VERSION_7), (200, CREATED)]);

        let documents = index(
            &config(Some(url), false),
            HostFacts::default(),
            &NoVcs,
            &b"PASS\nok  \tgithub.com/x/y\t0.01s\n"[..],
            &mut Vec::new(),
        )
        .await
        .unwrap();

        assert_eq!(documents, 0);
        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].starts_with("PUT /gobench HTTP/1.1"));
    }
}
