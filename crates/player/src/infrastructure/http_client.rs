//! HTTP client for the generation backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use fatesheet_shared::{GenerationErrorResponse, GenerationRequest, GenerationResponse};

use crate::ports::outbound::{GenerationError, GenerationPort};

/// Posts generation requests as JSON and decodes the mode's response.
///
/// Request timeouts are applied by `GenerationService` per mode; the client
/// only bounds connection setup.
#[derive(Clone)]
pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
}

impl HttpGenerationClient {
    pub fn new(base_url: &Url) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl GenerationPort for HttpGenerationClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = self.url_for(request.endpoint());
        tracing::debug!(mode = request.mode.label(), %url, "Posting generation request");

        let response = self
            .client
            .post(&url)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        Ok(request.mode.parse_response(&body)?)
    }
}

/// Map a non-success response to `GenerationError::Status`, using the
/// backend's structured error body when it sent one.
fn status_error(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<GenerationErrorResponse>(body) {
        Ok(parsed) => GenerationError::Status {
            status,
            code: Some(parsed.code),
            message: parsed.message,
        },
        Err(_) => GenerationError::Status {
            status,
            code: None,
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_joined_without_double_slash() {
        let client = HttpGenerationClient::new(&Url::parse("http://localhost:8000/").unwrap());
        assert_eq!(
            client.url_for(fatesheet_shared::SKELETON_ENDPOINT),
            "http://localhost:8000/api/generate_skeleton"
        );
    }

    #[test]
    fn test_structured_error_body() {
        let err = status_error(
            422,
            r#"{"code":"VALIDATION_FAILED","message":"Model could not produce a valid sheet"}"#,
        );
        match err {
            GenerationError::Status {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 422);
                assert_eq!(code.as_deref(), Some("VALIDATION_FAILED"));
                assert_eq!(message, "Model could not produce a valid sheet");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_error_body() {
        let err = status_error(502, " Bad Gateway \n");
        assert!(matches!(
            err,
            GenerationError::Status { status: 502, code: None, ref message } if message == "Bad Gateway"
        ));
    }
}
