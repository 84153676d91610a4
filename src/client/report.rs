//! Service catalog queries and report retrieval.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{header_str, service_error, ApiPortClient};
use crate::error::{ApiPortError, Result};
use crate::protocol::{
    AnalyzeResponse, Report, ResultFormat, TargetEntry, DEFAULT_RESULT_FORMAT_PATH,
    RESULT_FORMATS_PATH, TARGETS_PATH,
};

impl ApiPortClient {
    /// Report formats the service can produce
    pub async fn get_result_formats(&self) -> Result<Vec<ResultFormat>> {
        self.get_result_formats_with_cancellation(&CancellationToken::new())
            .await
    }

    /// [`Self::get_result_formats`] with external cancellation
    pub async fn get_result_formats_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultFormat>> {
        self.get_json(RESULT_FORMATS_PATH, cancel).await
    }

    /// Format the service uses when the caller expresses no preference
    pub async fn get_default_result_format(&self) -> Result<ResultFormat> {
        self.get_default_result_format_with_cancellation(&CancellationToken::new())
            .await
    }

    /// [`Self::get_default_result_format`] with external cancellation
    pub async fn get_default_result_format_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ResultFormat> {
        self.get_json(DEFAULT_RESULT_FORMAT_PATH, cancel).await
    }

    /// Target platform identifiers the service can analyze against.
    ///
    /// Structured entries are rendered as `name` or `name,Version=version`.
    pub async fn get_targets(&self) -> Result<Vec<String>> {
        self.get_targets_with_cancellation(&CancellationToken::new())
            .await
    }

    /// [`Self::get_targets`] with external cancellation
    pub async fn get_targets_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let entries: Vec<TargetEntry> = self.get_json(TARGETS_PATH, cancel).await?;
        Ok(entries.iter().map(TargetEntry::identifier).collect())
    }

    /// Fetch the finished report for `response` in `format`.
    ///
    /// The result location is requested exactly as the service returned it.
    /// A bearer token is attached only when the response carries a
    /// non-empty one.
    pub async fn fetch_report(
        &self,
        response: AnalyzeResponse,
        format: &ResultFormat,
    ) -> Result<Report> {
        self.fetch_report_with_cancellation(response, format, &CancellationToken::new())
            .await
    }

    /// [`Self::fetch_report`] with external cancellation
    pub async fn fetch_report_with_cancellation(
        &self,
        response: AnalyzeResponse,
        format: &ResultFormat,
        cancel: &CancellationToken,
    ) -> Result<Report> {
        validate_result_location(&response.result_url)?;

        let mut headers = HeaderMap::new();
        if !format.mime_type.is_empty() {
            let accept = HeaderValue::from_str(&format.mime_type).map_err(|e| {
                ApiPortError::InvalidArgument(format!(
                    "Invalid result format {:?}: {e}",
                    format.mime_type
                ))
            })?;
            headers.insert(ACCEPT, accept);
        }
        if let Some(token) = response.auth_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ApiPortError::InvalidArgument(format!("Invalid result auth token: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        tracing::info!(
            submission_id = %response.submission_id,
            format = %format,
            authorized = response.auth_token().is_some(),
            "Fetching report"
        );

        let request =
            self.connection
                .request(Method::GET, &response.result_url, headers, Bytes::new())?;
        let reply = self.exchange(request, cancel).await?;

        if !reply.status().is_success() {
            return Err(service_error(reply));
        }

        let mime_type = header_str(reply.headers(), CONTENT_TYPE)
            .filter(|v| !v.is_empty())
            .unwrap_or(format.mime_type.as_str())
            .to_string();
        let data = self.decode_raw(reply)?;

        tracing::debug!(bytes = data.len(), mime_type = %mime_type, "Report received");

        Ok(Report { data, mime_type })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let request = self.connection.get(path)?;
        let response = self.exchange(request, cancel).await?;

        if !response.status().is_success() {
            return Err(service_error(response));
        }
        self.decode(&response)
    }
}

/// Result locations must be absolute http(s) URLs.
fn validate_result_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(ApiPortError::InvalidArgument(
            "Analysis response has no result location".to_string(),
        ));
    }

    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ApiPortError::InvalidArgument(format!(
            "Result location is not an http(s) URL: {location}"
        ))),
        Err(e) => Err(ApiPortError::InvalidArgument(format!(
            "Result location is not absolute: {location} ({e})"
        ))),
    }
}
