use reqwest::StatusCode;
use tracing::debug;

use crate::error::ScrapeError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Something that can hand back the HTML of a page.
///
/// Only a `200 OK` counts as success; every other status is a
/// [`ScrapeError::Fetch`] carrying the code.
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Plain GET over a shared reqwest client. No timeout, no retries.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let transport = |source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if status != StatusCode::OK {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}
