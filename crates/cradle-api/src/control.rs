// Device control endpoints

use serde_json::json;
use tracing::debug;

use crate::client::CradleClient;
use crate::error::Error;
use crate::models::MotorAction;

impl CradleClient {
    /// Start or stop the rocking motor.
    ///
    /// `POST /control_motor/{uuid}` with `{"action": "start"|"stop"}`
    pub async fn control_motor(&self, uuid: &str, action: MotorAction) -> Result<(), Error> {
        let url = self.endpoint(&["control_motor", uuid])?;
        debug!(uuid, %action, "controlling motor");
        self.post_ack(url, Some(&json!({ "action": action })))
            .await?;
        Ok(())
    }
}
