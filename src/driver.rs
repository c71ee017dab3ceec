use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::bench::{Line, RunContext};
use crate::document::{Document, IndexAction, RunMetadata};
use crate::elasticsearch::Compatibility;
use crate::environment::{GitFacts, VcsProbe};
use crate::prelude::*;

/// Turns benchmark output into a stream of bulk index actions and documents.
pub struct StreamDriver<'a> {
    index: String,
    compatibility: Compatibility,
    metadata: RunMetadata,
    vcs: &'a dyn VcsProbe,
    git_facts: HashMap<String, Option<GitFacts>>,
    context: RunContext,
}

impl<'a> StreamDriver<'a> {
    pub fn new(
        index: &str,
        compatibility: Compatibility,
        metadata: RunMetadata,
        vcs: &'a dyn VcsProbe,
    ) -> Self {
        Self {
            index: index.to_string(),
            compatibility,
            metadata,
            vcs,
            git_facts: HashMap::new(),
            context: RunContext::default(),
        }
    }

    /// Process `input` until EOF, writing one action line and one document line per
    /// benchmark result to `output`. Returns the number of documents written.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<usize> {
        let mut documents = 0;
        for line in input.split(b'\n') {
            let line = line.context("Failed to read the benchmark output")?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            // log output interleaved by the benchmarks is not necessarily UTF-8
            let line = Line::classify(&String::from_utf8_lossy(line));
            if self.context.update(&line) {
                continue;
            }
            let Line::Benchmark {
                record,
                extra_metrics,
            } = line
            else {
                trace!("Ignoring line");
                continue;
            };

            let git = self.git_facts_for_current_package();
            let document =
                Document::new(&record, extra_metrics, &self.context, &self.metadata, git);
            self.write_pair(output, &document)?;
            documents += 1;
        }

        debug!("Wrote {documents} documents");
        Ok(documents)
    }

    /// Resolved once per package, failures included.
    fn git_facts_for_current_package(&mut self) -> Option<GitFacts> {
        let vcs = self.vcs;
        self.git_facts
            .entry(self.context.pkg.clone())
            .or_insert_with_key(|pkg| {
                let facts = vcs.git_facts(pkg);
                if facts.is_none() {
                    debug!("No git information found for package {pkg:?}");
                }
                facts
            })
            .clone()
    }

    fn write_pair<W: Write>(&self, output: &mut W, document: &Document) -> Result<()> {
        let action = IndexAction::new(&self.index, self.compatibility);
        serde_json::to_writer(&mut *output, &action).context("Failed to encode index action")?;
        output.write_all(b"\n")?;
        let document = document.to_json().context("Failed to encode document")?;
        serde_json::to_writer(&mut *output, &document).context("Failed to encode document")?;
        output.write_all(b"\n")?;
        Ok(())
    }
}
