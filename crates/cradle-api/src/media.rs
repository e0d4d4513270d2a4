// Media URL builders
//
// The live stream and recorded frames are consumed directly by an image
// viewer, so these only construct URLs. No network call happens here.

use url::Url;

use crate::client::CradleClient;
use crate::error::Error;

impl CradleClient {
    /// Live MJPEG stream for an agent: `{base}/stream/{uuid}`.
    pub fn stream_url(&self, uuid: &str) -> Result<Url, Error> {
        self.endpoint(&["stream", uuid])
    }

    /// A single frame captured for an alert: `{base}/api/alert_frame/{id}`.
    pub fn alert_frame_url(&self, frame_id: i64) -> Result<Url, Error> {
        self.endpoint(&["api", "alert_frame", frame_id.to_string().as_str()])
    }

    /// Recorded clip lookup: `{base}/api/video/{uuid}?date=...&time=...`.
    pub fn video_url(&self, uuid: &str, date: &str, time: &str) -> Result<Url, Error> {
        let mut url = self.endpoint(&["api", "video", uuid])?;
        url.query_pairs_mut()
            .append_pair("date", date)
            .append_pair("time", time);
        Ok(url)
    }
}
