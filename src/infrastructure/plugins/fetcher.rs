//! HTTP download of plugin archives

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::application::errors::FetchError;

/// Streams HTTP response bodies into a writer
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("cs2pm/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FetchError::Network { url: String::new(), source: e })?;

        Ok(Self { client })
    }

    /// GET `url` and copy the full body into `dest`, handing `dest` back.
    ///
    /// Anything but 200 is an error and nothing is written.
    pub async fn fetch<W>(&self, url: &str, mut dest: W) -> Result<W, FetchError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network { url: url.to_string(), source: e })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network { url: url.to_string(), source: e })?
        {
            dest.write_all(&chunk).await.map_err(FetchError::Write)?;
            written += chunk.len() as u64;
        }
        dest.flush().await.map_err(FetchError::Write)?;

        tracing::debug!("Downloaded {} bytes from {}", written, url);
        Ok(dest)
    }
}
