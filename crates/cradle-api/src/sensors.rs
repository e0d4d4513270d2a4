// Sensor history endpoint

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::client::CradleClient;
use crate::error::Error;
use crate::models::SensorSample;

impl CradleClient {
    /// Sensor samples recorded between `start` and `end`.
    ///
    /// `GET /api/sensor_data/{uuid}?start_date=...&end_date=...` with RFC 3339
    /// timestamps.
    pub async fn sensor_data(
        &self,
        uuid: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SensorSample>, Error> {
        let mut url = self.endpoint(&["api", "sensor_data", uuid])?;
        url.query_pairs_mut()
            .append_pair("start_date", &start.to_rfc3339_opts(SecondsFormat::Millis, true))
            .append_pair("end_date", &end.to_rfc3339_opts(SecondsFormat::Millis, true));
        debug!(uuid, %start, %end, "fetching sensor data");
        self.get(url).await
    }
}
