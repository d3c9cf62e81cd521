use async_trait::async_trait;
use shared::{domain::ContactPayload, error::SubmitError};
use tracing::info;

/// Where accepted contact payloads go.
///
/// Handlers run on a single-threaded page loop, so implementations are not
/// required to be `Send`.
#[async_trait(?Send)]
pub trait ContactSubmitter {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError>;
}

/// Records the submission and reports success. Nothing leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmitter;

#[async_trait(?Send)]
impl ContactSubmitter for LoggingSubmitter {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError> {
        info!(
            name = %payload.name,
            email = %payload.email,
            message_len = payload.message.len(),
            "contact form submitted"
        );
        Ok(())
    }
}

#[async_trait(?Send)]
impl<T: ContactSubmitter + ?Sized> ContactSubmitter for Box<T> {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError> {
        (**self).submit(payload).await
    }
}

#[cfg(feature = "http-submit")]
pub use http::HttpSubmitter;

#[cfg(feature = "http-submit")]
mod http {
    use async_trait::async_trait;
    use reqwest::Client;
    use shared::{domain::ContactPayload, error::SubmitError};
    use tracing::{debug, warn};

    use super::ContactSubmitter;

    /// POSTs the payload as JSON to a fixed endpoint.
    #[derive(Debug, Clone)]
    pub struct HttpSubmitter {
        http: Client,
        endpoint: String,
    }

    impl HttpSubmitter {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self::with_client(Client::new(), endpoint)
        }

        pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
            Self {
                http,
                endpoint: endpoint.into(),
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait(?Send)]
    impl ContactSubmitter for HttpSubmitter {
        async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError> {
            let response = self
                .http
                .post(&self.endpoint)
                .json(payload)
                .send()
                .await
                .map_err(|err| SubmitError::Transport(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                warn!(endpoint = %self.endpoint, %status, "contact endpoint rejected submission");
                return Err(SubmitError::Rejected {
                    status: status.as_u16(),
                });
            }
            debug!(endpoint = %self.endpoint, %status, "contact submission delivered");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
