use anyhow::Result;
use async_trait::async_trait;

/// Transport abstraction for dataset fetching. Keeping the seam at the byte
/// level lets tests substitute fixtures or failures without a network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
