use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    form::{FormController, FormSchema, SubmitRefused},
    models::SubmissionResponse,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server rejected submission ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Posts forms to the submission endpoints of one deployment.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn post<F: FormSchema>(&self, form: &F) -> Result<Uuid, ClientError> {
        let kind = F::KIND;
        let url = format!("{}{}", self.base_url, kind.endpoint());
        debug!(%url, %kind, "Posting submission");

        let response = self.http.post(&url).json(form).send().await?;
        let status = response.status();
        let body: SubmissionResponse = response.json().await?;

        match body {
            SubmissionResponse {
                success: true,
                id: Some(id),
                ..
            } if status.is_success() => Ok(id),
            SubmissionResponse { error, .. } => {
                let message = error.unwrap_or_else(|| "unexpected response".to_string());
                Err(ClientError::Rejected { status, message })
            }
        }
    }

    /// Runs one submit cycle on the controller: validate, post, settle.
    ///
    /// Validation failures and busy refusals leave the controller as they
    /// found it and never reach the network.
    pub async fn submit<F: FormSchema>(
        &self,
        controller: &mut FormController<F>,
    ) -> Result<Option<Uuid>, SubmitRefused> {
        let payload = controller.begin_submit()?;

        let outcome = self.post(&payload).await;
        if let Err(e) = &outcome {
            let kind = F::KIND;
            error!(%kind, error = %e, "Submission failed");
        }

        let id = outcome.as_ref().ok().copied();
        controller.finish(outcome.map(|_| ()));

        Ok(id)
    }
}
