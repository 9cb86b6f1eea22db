//! Blocking Microsoft Graph client.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::{ApiError, MailApi};
use crate::model::attachment::AttachmentRecord;
use crate::model::mail::MessageRecord;

/// Default Graph endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Collection wrapper used by every Graph list response.
#[derive(Debug, Deserialize)]
struct GraphPage<T> {
    value: Vec<T>,
}

/// [`MailApi`] implementation talking to Microsoft Graph with a bearer token
/// obtained out of band.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GraphClient {
    /// Build a client for `base_url`.
    ///
    /// A `None` token is accepted; every call then fails with
    /// [`ApiError::NotConnected`].
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mailcollect/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// `{base}/users/{owner}/messages[/{segments}...]`
    fn messages_url(&self, owner: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", owner, "messages"])
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> Result<Response, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotConnected)?;
        debug!(url = %url, "Graph request");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            debug!(%status, "Graph request failed");
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }
}

/// Quote a value as an OData string literal.
fn odata_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl MailApi for GraphClient {
    fn find_message(
        &self,
        owner: &str,
        internet_message_id: &str,
    ) -> Result<MessageRecord, ApiError> {
        let mut url = self.messages_url(owner, &[])?;
        url.query_pairs_mut().append_pair(
            "$filter",
            &format!("internetMessageId eq {}", odata_literal(internet_message_id)),
        );
        let body = self.get(url)?.text()?;
        let page: GraphPage<MessageRecord> = serde_json::from_str(&body)?;
        page.value.into_iter().next().ok_or(ApiError::NotFound)
    }

    fn message_content(&self, owner: &str, record_key: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.messages_url(owner, &[record_key, "$value"])?;
        Ok(self.get(url)?.bytes()?.to_vec())
    }

    fn attachments(
        &self,
        owner: &str,
        record_key: &str,
    ) -> Result<Vec<AttachmentRecord>, ApiError> {
        let url = self.messages_url(owner, &[record_key, "attachments"])?;
        let body = self.get(url)?.text()?;
        let page: GraphPage<AttachmentRecord> = serde_json::from_str(&body)?;
        Ok(page.value)
    }
}
