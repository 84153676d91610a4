//! Analysis submission and server-directed polling.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_ENCODING, CONTENT_TYPE};
use http::StatusCode;
use tokio_util::sync::CancellationToken;

use super::{service_error, wait, ApiPortClient};
use crate::codec::JSON_CONTENT_TYPE;
use crate::error::Result;
use crate::protocol::{AnalyzeRequest, AnalyzeResponse, RetryDirective, ANALYZE_PATH};

impl ApiPortClient {
    /// Submit a request and wait until the service finishes analyzing it.
    ///
    /// While the service answers `202 Accepted`, the same payload is re-sent
    /// after the server's `Retry-After` delay. There is no retry cap; bound
    /// the call with [`Self::submit_analysis_with_cancellation`] if needed.
    pub async fn submit_analysis(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        self.submit_analysis_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// [`Self::submit_analysis`] with external cancellation.
    pub async fn submit_analysis_with_cancellation(
        &self,
        request: &AnalyzeRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResponse> {
        let payload = Bytes::from(self.codec.serialize_compress(request)?);
        let headers = self.submission_headers();

        tracing::info!(
            application = request.application_name(),
            targets = request.targets().len(),
            members = request.dependencies().len(),
            bytes = payload.len(),
            compression = %self.codec.compression(),
            "Submitting analysis request"
        );

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let http_request = self
                .connection
                .post(ANALYZE_PATH, headers.clone(), payload.clone())?;
            let response = self.exchange(http_request, cancel).await?;
            let status = response.status();

            if status == StatusCode::ACCEPTED {
                let directive =
                    RetryDirective::from_headers(response.headers(), self.default_retry);
                tracing::debug!(
                    attempt,
                    delay_ms = directive.delay().as_millis() as u64,
                    "Analysis pending"
                );
                wait(cancel, directive.delay()).await?;
                continue;
            }

            if !status.is_success() {
                return Err(service_error(response));
            }

            let result: AnalyzeResponse = self.decode(&response)?;
            tracing::info!(
                attempts = attempt,
                submission_id = %result.submission_id,
                "Analysis complete"
            );
            return Ok(result);
        }
    }

    fn submission_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        if let Some(encoding) = self.codec.content_encoding() {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding));
        }
        headers
    }
}
