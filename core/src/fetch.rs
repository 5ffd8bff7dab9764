//! HTTP fetching for the scraping importer.

use std::time::Duration;

use crate::error::ImportError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; Calabash/0.1; recipe catalog importer)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ATTEMPTS: u32 = 3;

/// Build the client used for one scraping run.
pub fn build_client() -> Result<reqwest::Client, ImportError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ImportError::Source(format!("cannot build HTTP client: {}", e)))
}

/// Fetch a page as text, retrying transient failures with backoff.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, ImportError> {
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match client.get(url).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => {
                    return response.text().await.map_err(|e| {
                        ImportError::Source(format!("failed to read {}: {}", url, e))
                    });
                }
                Err(e) => last_error = e.to_string(),
            },
            Err(e) => last_error = e.to_string(),
        }

        if attempt < MAX_ATTEMPTS {
            tracing::debug!(%url, attempt, "fetch failed, retrying");
            tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
        }
    }

    Err(ImportError::Source(format!(
        "failed to fetch {}: {}",
        url, last_error
    )))
}
