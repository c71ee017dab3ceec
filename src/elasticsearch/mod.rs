//! Talking to the Elasticsearch document store.

mod client;
mod compat;
mod error;
mod mapping;
#[cfg(test)]
pub mod test_server;

pub use client::ElasticsearchClient;
pub use compat::{Compatibility, DOC_TYPE};
