// Alert endpoints
//
// Alert logs (all agents), per-agent history and detail, resolution, and
// the per-agent alert settings record.

use tracing::debug;

use crate::client::CradleClient;
use crate::error::Error;
use crate::models::{AlertDetail, AlertLog, AlertSettings, AlertSettingsUpdate};

impl CradleClient {
    /// Alerts across every agent owned by the user.
    ///
    /// `GET /api/alert_logs`
    pub async fn alert_logs(&self) -> Result<Vec<AlertLog>, Error> {
        let url = self.endpoint(&["api", "alert_logs"])?;
        debug!("listing alert logs");
        self.get(url).await
    }

    /// Mark an alert resolved.
    ///
    /// `POST /api/alert_logs/{id}/resolve`. Resolution is terminal; the
    /// service is expected to treat repeated calls as no-ops.
    pub async fn resolve_alert(&self, id: i64) -> Result<(), Error> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "alert_logs", id.as_str(), "resolve"])?;
        debug!(alert_id = %id, "resolving alert");
        self.post_ack(url, None::<&()>).await?;
        Ok(())
    }

    /// Alert history for one agent.
    ///
    /// `GET /api/alert_history/{uuid}`
    pub async fn alert_history(&self, uuid: &str) -> Result<Vec<AlertLog>, Error> {
        let url = self.endpoint(&["api", "alert_history", uuid])?;
        debug!(uuid, "listing alert history");
        self.get(url).await
    }

    /// An alert with the sensor samples and video frames captured around it.
    ///
    /// `GET /api/alert_detail/{id}`
    pub async fn alert_detail(&self, id: i64) -> Result<AlertDetail, Error> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "alert_detail", id.as_str()])?;
        self.get(url).await
    }

    /// `GET /api/alert_settings/{uuid}`
    pub async fn alert_settings(&self, uuid: &str) -> Result<AlertSettings, Error> {
        let url = self.endpoint(&["api", "alert_settings", uuid])?;
        self.get(url).await
    }

    /// Overwrite the fields present in `update`. Last writer wins.
    ///
    /// `POST /api/alert_settings/{uuid}`
    pub async fn update_alert_settings(
        &self,
        uuid: &str,
        update: &AlertSettingsUpdate,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["api", "alert_settings", uuid])?;
        debug!(uuid, ?update, "updating alert settings");
        self.post_ack(url, Some(update)).await?;
        Ok(())
    }
}
