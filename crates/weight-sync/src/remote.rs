//! HTTP-backed weight store talking to the Morning Light API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use tracker_core::{NewWeight, PageCursor, WeightPage, WeightRecord};

use crate::error::{Result, SyncError};
use crate::store::WeightStore;

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A [`WeightStore`] that calls `/api/weights` with a bearer token.
#[derive(Clone)]
pub struct RemoteWeightStore {
    http: Client,
    base_url: String,
    token: String,
}

impl RemoteWeightStore {
    /// Create a store for the API at `base_url` (e.g. `http://127.0.0.1:8790`).
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SyncError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn weights_url(&self) -> String {
        format!("{}/api/weights", self.base_url)
    }

    /// Turn a non-success response into [`SyncError::Api`].
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(SyncError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl WeightStore for RemoteWeightStore {
    async fn fetch_page(&self, cursor: Option<&PageCursor>, limit: usize) -> Result<Vec<WeightRecord>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("before_date", cursor.date.clone()));
            query.push(("before_id", cursor.id.clone()));
        }

        debug!(url = %self.weights_url(), ?cursor, "Fetching weight page");
        let response = self
            .http
            .get(self.weights_url())
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;

        let page: WeightPage = Self::check(response).await?.json().await?;
        Ok(page.records)
    }

    async fn upsert(&self, entry: &NewWeight) -> Result<WeightRecord> {
        let response = self
            .http
            .post(self.weights_url())
            .bearer_auth(&self.token)
            .json(entry)
            .send()
            .await?;

        let record = Self::check(response).await?.json().await?;
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/{}", self.weights_url(), id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(id.to_string()));
        }
        Self::check(response).await?;
        Ok(())
    }
}
