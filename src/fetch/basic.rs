use anyhow::Result;
use async_trait::async_trait;

use super::client::HttpClient;

/// Plain [`HttpClient`] over a shared `reqwest::Client`.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.0.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
