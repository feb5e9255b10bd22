use super::{JobType, ENDPOINT};
use crate::models::responses::JobResponse;
use crate::services::client::{Client, ClientError};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateParams {
    /// Called by the API once the job finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_email: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_signup_date: bool,
}

#[derive(Serialize)]
struct UpdatePayload<'a> {
    job: JobType,
    url: &'a str,
    #[serde(flatten)]
    params: &'a UpdateParams,
}

/// Starts `update` jobs that pull user data from a URL.
#[derive(Debug, Clone)]
pub struct UpdateJob {
    client: Client,
    pub params: UpdateParams,
}

impl UpdateJob {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            params: UpdateParams::default(),
        }
    }

    pub fn with_params(mut self, params: UpdateParams) -> Self {
        self.params = params;
        self
    }

    pub async fn submit(&self, source_url: &str) -> Result<JobResponse, ClientError> {
        let payload = UpdatePayload {
            job: JobType::Update,
            url: source_url,
            params: &self.params,
        };

        info!("Submitting update job for {}", source_url);

        let response = self.client.post(ENDPOINT, &payload).await?;
        let job: JobResponse = response
            .deserialize_into()
            .map_err(ClientError::DecodeError)?;

        match &job.job_id {
            Some(id) => info!("Update job accepted: {}", id),
            None => info!("Update job accepted without an id"),
        }

        Ok(job)
    }
}
