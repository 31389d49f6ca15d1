//! Dataset loading: concurrent fetches joined by an all-or-nothing barrier.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::model::EducationRecord;
use crate::topology::Topology;

/// Loads a JSON dataset from a local file path or fetches it over HTTP,
/// then deserializes it.
///
/// # Errors
///
/// Transport failures and malformed JSON both surface as a single fatal
/// load error; there is no retry.
pub async fn load_json<T, C>(client: &C, source: &str) -> Result<T>
where
    T: DeserializeOwned,
    C: HttpClient,
{
    let bytes = if source.starts_with("http") {
        client
            .get_bytes(source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };

    serde_json::from_slice(&bytes).with_context(|| format!("failed to parse JSON from {source}"))
}

/// Fetches the topology and education datasets concurrently.
///
/// Both requests run in parallel and the barrier is all-or-nothing: either
/// failure aborts the load before any rendering can start.
#[tracing::instrument(skip(client))]
pub async fn load_datasets<C: HttpClient>(
    client: &C,
    counties_source: &str,
    education_source: &str,
) -> Result<(Topology, Vec<EducationRecord>)> {
    let (topology, education) = tokio::try_join!(
        load_json::<Topology, C>(client, counties_source),
        load_json::<Vec<EducationRecord>, C>(client, education_source),
    )?;

    info!(
        counties = topology.objects.counties.geometries.len(),
        education_records = education.len(),
        "datasets loaded"
    );

    Ok((topology, education))
}
