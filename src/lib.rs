//! Client for the Sailthru REST API.
//!
//! Every call is signed with the account secret and sent as the four form
//! fields the API expects (`api_key`, `sig`, `format`, `json`).

pub mod config;
pub mod jobs;
pub mod models;
pub mod services;

pub use config::{ClientConfig, ConfigError, Credentials};
pub use models::responses::{ApiError, JobResponse, Response};
pub use services::client::{Client, ClientError};
pub use services::signer::{FormValues, Signer, SignerError};
