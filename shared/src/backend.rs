use signaldesk_core::entitlement::UserRecord;
use signaldesk_core::pnl::Position;

use crate::error::FetchError;

/// Client for the hosted dashboard backend: current user record and
/// position list. Persistence, auth and CRUD all live on the other
/// side of this contract.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: String, api_token: Option<String>) -> Self {
        Self {
            base_url,
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Fetch the current user's billing/entitlement record.
    pub async fn current_user(&self) -> Result<UserRecord, FetchError> {
        let response = self.get("/api/v1/users/me").send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint: "/api/v1/users/me".to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch positions, optionally filtered by status (e.g. "ACTIVE").
    pub async fn list_positions(&self, status: Option<&str>) -> Result<Vec<Position>, FetchError> {
        let mut request = self.get("/api/v1/positions");
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint: "/api/v1/positions".to_string(),
                status: response.status().as_u16(),
            });
        }
        let positions: Vec<Position> = response.json().await?;
        tracing::debug!("fetched {} positions", positions.len());
        Ok(positions)
    }
}
