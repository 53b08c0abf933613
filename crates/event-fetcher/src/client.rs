//! HTTP access to the events host.

use async_trait::async_trait;
use reqwest::Client;
use shared_types::Event;
use url::Url;

use crate::config::EventsConfig;
use crate::error::FetchEventsError;
use crate::parser::parse_events;
use crate::query::EventQuery;

/// Anything that can answer a bounding query with a list of events.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, FetchEventsError>;
}

/// Client for the events host JSON feed.
///
/// Every call is one fresh GET: no caching, no retries.
pub struct HttpEventSource {
    client: Client,
    endpoint: Url,
}

impl HttpEventSource {
    pub fn new(endpoint: Url, config: &EventsConfig) -> Result<Self, FetchEventsError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchEventsError::Client)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a query.
    pub fn url_for(&self, query: &EventQuery) -> Url {
        query.to_url(&self.endpoint)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, FetchEventsError> {
        let url = self.url_for(query);
        tracing::debug!("Requesting events: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchEventsError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Events host returned {} for {}", status, url);
            return Err(FetchEventsError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchEventsError::Transport {
                url: url.to_string(),
                source,
            })?;

        let events = parse_events(&body).map_err(|e| {
            tracing::warn!("Discarding events payload from {}: {}", url, e);
            e
        })?;

        tracing::info!("Fetched {} events", events.len());
        Ok(events)
    }
}
