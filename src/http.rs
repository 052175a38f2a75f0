use reqwest::Client;
use std::time::Duration;

use crate::AdvisorError;

const USER_AGENT: &str = concat!("bite-advisor/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client setup for the vision and recipe APIs
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, AdvisorError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
