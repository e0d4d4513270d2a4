// Agent (cradle unit) endpoints
//
// Listing, registration by UUID, server-side selection, deletion, and the
// live status snapshot polled by the dashboard.

use serde_json::json;
use tracing::debug;

use crate::client::CradleClient;
use crate::error::Error;
use crate::models::{Agent, AgentStatus, Outcome, RegisterCradleResponse};

impl CradleClient {
    /// List the agents registered to the logged-in user.
    ///
    /// `GET /api/agents`
    pub async fn list_agents(&self) -> Result<Vec<Agent>, Error> {
        let url = self.endpoint(&["api", "agents"])?;
        debug!("listing agents");
        self.get(url).await
    }

    /// Register a cradle unit by its UUID (typed in or scanned from the QR label).
    ///
    /// `POST /register_cradle` with `{"cradle_uuid": "..."}`
    pub async fn register_cradle(&self, uuid: &str) -> Result<RegisterCradleResponse, Error> {
        let url = self.endpoint(&["register_cradle"])?;
        debug!(uuid, "registering cradle");

        let resp: RegisterCradleResponse = self
            .post(url, Some(&json!({ "cradle_uuid": uuid })), true)
            .await?;

        if !resp.success {
            return Err(Error::Rejected {
                message: resp
                    .message
                    .unwrap_or_else(|| "cradle registration rejected".into()),
            });
        }
        Ok(resp)
    }

    /// Mark an agent as the session's active cradle on the server side.
    ///
    /// `POST /select_cradle` with `{"uuid": "..."}`
    pub async fn select_cradle(&self, uuid: &str) -> Result<Outcome, Error> {
        let url = self.endpoint(&["select_cradle"])?;
        debug!(uuid, "selecting cradle");
        self.post_ack(url, Some(&json!({ "uuid": uuid }))).await
    }

    /// Delete an agent and all of its recorded data.
    ///
    /// `POST /delete_cradle` with `{"uuid": "..."}`
    pub async fn delete_cradle(&self, uuid: &str) -> Result<Outcome, Error> {
        let url = self.endpoint(&["delete_cradle"])?;
        debug!(uuid, "deleting cradle");
        self.post_ack(url, Some(&json!({ "uuid": uuid }))).await
    }

    /// Latest sensor snapshot for an agent.
    ///
    /// `GET /api/agent_status/{uuid}`
    pub async fn agent_status(&self, uuid: &str) -> Result<AgentStatus, Error> {
        let url = self.endpoint(&["api", "agent_status", uuid])?;
        self.get(url).await
    }
}
