// ── Monitor ──
//
// Entry point for consumers. Every user action follows the same path:
// validate locally, make one round trip through `CradleClient`, then
// write the answer into the `CradleStore` under a sequencer ticket. An
// expired session observed on any call clears the stored session.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cradle_api::transport::{TlsMode, TransportConfig};
use cradle_api::{
    Agent, AgentStatus, AlertDetail, AlertLog, AlertSettings, AlertSettingsUpdate, CradleClient,
    MotorAction, SensorSample, User,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::poller::StatusPoller;
use crate::sequence::Resource;
use crate::store::CradleStore;
use crate::validate;

/// Window used by [`Monitor::last_day_sensor_data`].
const HISTORY_WINDOW_HOURS: i64 = 24;

// ── Monitor ──────────────────────────────────────────────────────

/// Cheaply cloneable handle over one client session and its store.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: CradleClient,
    store: Arc<CradleStore>,
}

impl Monitor {
    /// Build a monitor and its HTTP client. Does NOT contact the service.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = CradleClient::new(config.url.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a monitor around an existing client.
    pub fn with_client(config: MonitorConfig, client: CradleClient) -> Self {
        let store = Arc::new(CradleStore::new(config.selection_fallback));
        Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store,
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<CradleStore> {
        &self.inner.store
    }

    pub fn client(&self) -> &CradleClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Log in with the configured credentials, load the device set, and
    /// restore the preferred selection.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let credentials =
            self.inner
                .config
                .credentials
                .as_ref()
                .ok_or_else(|| CoreError::Config {
                    message: "no username/password configured".into(),
                })?;

        self.login(&credentials.username, &credentials.password)
            .await?;
        let agents = self.refresh_agents().await?;

        match self.inner.config.preferred_agent.as_deref() {
            Some(uuid) if self.store().set_selected(Some(uuid)) => {
                debug!(uuid, "restored preferred cradle");
            }
            Some(uuid) => {
                warn!(uuid, "preferred cradle is no longer registered");
            }
            None => {
                if let [only] = agents.as_slice() {
                    self.store().set_selected(Some(&only.uuid));
                    debug!(uuid = %only.uuid, "selected the only registered cradle");
                }
            }
        }

        info!(agents = agents.len(), "connected to cradle service");
        Ok(())
    }

    /// Log out (best effort) and close the store. Responses that land
    /// after this are dropped.
    pub async fn disconnect(&self) {
        if self.store().is_authenticated() {
            if let Err(e) = self.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        self.store().close();
        debug!("disconnected");
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Monitor) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let monitor = Monitor::new(config)?;
        if let Err(e) = monitor.connect().await {
            monitor.disconnect().await;
            return Err(e);
        }
        let result = f(monitor.clone()).await;
        monitor.disconnect().await;
        result
    }

    // ── Session ──────────────────────────────────────────────────

    /// Log in. On failure the stored session is left as it was.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<User>, CoreError> {
        validate::login(username, password)?;

        let resp = self.inner.client.login(username, password).await?;
        // Older servers answer `{success: true}` without the user record.
        let user = resp.user.unwrap_or_else(|| User {
            id: 0,
            username: username.to_owned(),
        });

        self.store().set_session(Some(user));
        info!(username, "logged in");
        self.store().session().ok_or_else(|| {
            CoreError::Internal("session not recorded (store closed)".into())
        })
    }

    /// Create an account. Does not log in.
    pub async fn register_user(
        &self,
        username: &str,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), CoreError> {
        validate::registration(username, password, confirmation)?;
        self.inner.client.register_user(username, password).await?;
        info!(username, "account created");
        Ok(())
    }

    /// `true` if nobody has claimed `username` yet.
    pub async fn username_available(&self, username: &str) -> Result<bool, CoreError> {
        if username.trim().is_empty() {
            return Err(CoreError::validation("username", "must not be empty"));
        }
        let exists = self.inner.client.check_username(username).await?;
        Ok(!exists)
    }

    /// End the session and drop all user state.
    pub async fn logout(&self) -> Result<(), CoreError> {
        match self.inner.client.logout().await {
            Ok(()) | Err(cradle_api::Error::SessionExpired) => {
                self.store().reset();
                info!("logged out");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Devices ──────────────────────────────────────────────────

    /// Re-fetch the device set. Returns the store's set afterwards, which
    /// may come from a newer overlapping refresh.
    pub async fn refresh_agents(&self) -> Result<Arc<Vec<Arc<Agent>>>, CoreError> {
        self.require_session()?;
        let ticket = self.store().begin(Resource::Agents);
        let agents = self.observe(self.inner.client.list_agents().await)?;

        if !self.store().apply_agents(ticket, agents) {
            debug!("agent list superseded by a newer refresh");
        }
        Ok(self.store().agents())
    }

    /// Register a cradle by UUID, reload the device set, and select it.
    pub async fn register_agent(&self, raw_uuid: &str) -> Result<Arc<Agent>, CoreError> {
        let uuid = validate::agent_uuid(raw_uuid)?;
        self.require_session()?;

        let resp = self.observe(self.inner.client.register_cradle(&uuid).await)?;
        let registered_uuid = resp.agent.map_or(uuid, |a| a.uuid);
        info!(uuid = %registered_uuid, "cradle registered");

        self.refresh_agents().await?;
        if !self.store().set_selected(Some(&registered_uuid)) {
            warn!(uuid = %registered_uuid, "registered cradle missing from refreshed list");
            return Err(CoreError::AgentNotFound {
                uuid: registered_uuid,
            });
        }
        self.store()
            .selected()
            .ok_or(CoreError::AgentNotFound {
                uuid: registered_uuid,
            })
    }

    /// Make `uuid` the selected cradle, on the service and locally.
    ///
    /// Only members of the current device set can be selected; anything
    /// else fails with [`CoreError::AgentNotFound`] before any network call.
    pub async fn select_agent(&self, uuid: &str) -> Result<Arc<Agent>, CoreError> {
        self.require_session()?;
        let agent = self
            .store()
            .agent(uuid)
            .ok_or_else(|| CoreError::AgentNotFound { uuid: uuid.into() })?;

        let ticket = self.store().begin(Resource::Selection);
        self.observe(self.inner.client.select_cradle(uuid).await)?;

        if !self.store().apply_selected(ticket, Some(uuid)) {
            if self.store().agent(uuid).is_none() {
                return Err(CoreError::AgentNotFound { uuid: uuid.into() });
            }
            debug!(uuid, "selection superseded by a newer request");
        }
        Ok(agent)
    }

    /// Delete a cradle and all of its recorded data.
    ///
    /// If it was selected, the configured fallback picks the next
    /// selection before the device set is refreshed.
    pub async fn delete_agent(&self, uuid: &str) -> Result<(), CoreError> {
        self.require_session()?;
        self.observe(self.inner.client.delete_cradle(uuid).await)?;
        info!(uuid, "cradle deleted");

        self.store().remove_agent(uuid);
        if let Err(e) = self.refresh_agents().await {
            warn!(error = %e, "device refresh after delete failed");
        }
        Ok(())
    }

    // ── Status ───────────────────────────────────────────────────

    /// Fetch the selected cradle's status once and store it.
    pub async fn refresh_status(&self) -> Result<AgentStatus, CoreError> {
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        let ticket = self.store().begin(Resource::Status);
        let status = self.observe(self.inner.client.agent_status(&uuid).await)?;

        self.store().apply_status(ticket, &uuid, status.clone());
        Ok(status)
    }

    /// A poller bound to this monitor's client and store.
    pub fn poller(&self) -> StatusPoller<CradleClient> {
        StatusPoller::new(
            Arc::new(self.inner.client.clone()),
            Arc::clone(self.store()),
            self.inner.config.poll_interval,
        )
    }

    // ── Alerts ───────────────────────────────────────────────────

    /// Re-fetch alerts across all cradles.
    pub async fn alerts(&self) -> Result<Arc<Vec<Arc<AlertLog>>>, CoreError> {
        self.require_session()?;
        let ticket = self.store().begin(Resource::Alerts);
        let alerts = self.observe(self.inner.client.alert_logs().await)?;

        self.store().apply_alerts(ticket, alerts);
        Ok(self.store().alerts())
    }

    /// Resolve an alert, then re-fetch the full list so the store reflects
    /// what the service now holds.
    pub async fn resolve_alert(&self, id: i64) -> Result<Arc<Vec<Arc<AlertLog>>>, CoreError> {
        self.require_session()?;
        self.observe(self.inner.client.resolve_alert(id).await)?;
        info!(alert_id = id, "alert resolved");
        self.alerts().await
    }

    /// Alert history of the selected cradle.
    pub async fn alert_history(&self) -> Result<Vec<AlertLog>, CoreError> {
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        self.observe(self.inner.client.alert_history(&uuid).await)
    }

    pub async fn alert_detail(&self, id: i64) -> Result<AlertDetail, CoreError> {
        self.require_session()?;
        self.observe(self.inner.client.alert_detail(id).await)
    }

    // ── Sensor history ───────────────────────────────────────────

    /// Samples recorded for the selected cradle in `[start, end]`.
    pub async fn sensor_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SensorSample>, CoreError> {
        if start > end {
            return Err(CoreError::validation("range", "start is after end"));
        }
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        self.observe(self.inner.client.sensor_data(&uuid, start, end).await)
    }

    /// Samples for the selected cradle over the last 24 hours.
    pub async fn last_day_sensor_data(&self) -> Result<Vec<SensorSample>, CoreError> {
        let end = Utc::now();
        let start = end - chrono::Duration::hours(HISTORY_WINDOW_HOURS);
        self.sensor_data(start, end).await
    }

    // ── Alert settings ───────────────────────────────────────────

    pub async fn alert_settings(&self) -> Result<AlertSettings, CoreError> {
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        let ticket = self.store().begin(Resource::Settings);
        let settings = self.observe(self.inner.client.alert_settings(&uuid).await)?;

        self.store().apply_settings(ticket, &uuid, settings.clone());
        Ok(settings)
    }

    /// Save the fields present in `update`. Last writer wins.
    ///
    /// Returns the settings as they stand after the save.
    pub async fn update_alert_settings(
        &self,
        update: &AlertSettingsUpdate,
    ) -> Result<AlertSettings, CoreError> {
        validate::settings_update(update)?;
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        let ticket = self.store().begin(Resource::Settings);

        self.observe(
            self.inner
                .client
                .update_alert_settings(&uuid, update)
                .await,
        )?;
        info!(uuid = %uuid, "alert settings saved");

        let saved = match self.store().settings() {
            Some(cached) => cached.merged(update),
            None => self.observe(self.inner.client.alert_settings(&uuid).await)?,
        };
        self.store().apply_settings(ticket, &uuid, saved.clone());
        Ok(saved)
    }

    // ── Control ──────────────────────────────────────────────────

    pub async fn control_motor(&self, action: MotorAction) -> Result<(), CoreError> {
        self.require_session()?;
        let uuid = self.selected_uuid()?;
        self.observe(self.inner.client.control_motor(&uuid, action).await)?;
        info!(uuid = %uuid, %action, "motor command sent");
        Ok(())
    }

    // ── Media URLs ───────────────────────────────────────────────

    /// Live stream URL for the selected cradle.
    pub fn stream_url(&self) -> Result<Url, CoreError> {
        let uuid = self.selected_uuid()?;
        Ok(self.inner.client.stream_url(&uuid)?)
    }

    pub fn frame_url(&self, frame_id: i64) -> Result<Url, CoreError> {
        Ok(self.inner.client.alert_frame_url(frame_id)?)
    }

    /// Recorded clip URL for the selected cradle.
    pub fn video_url(&self, date: &str, time: &str) -> Result<Url, CoreError> {
        let uuid = self.selected_uuid()?;
        Ok(self.inner.client.video_url(&uuid, date, time)?)
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn require_session(&self) -> Result<(), CoreError> {
        if self.store().is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    fn selected_uuid(&self) -> Result<String, CoreError> {
        self.store()
            .selected_uuid()
            .ok_or(CoreError::NoAgentSelected)
    }

    /// Convert a client result, clearing the session if it has expired.
    fn observe<T>(&self, result: Result<T, cradle_api::Error>) -> Result<T, CoreError> {
        result.map_err(|e| {
            if e.is_auth_expired() {
                warn!("session expired; clearing session");
                self.store().set_session(None);
            }
            CoreError::from(e)
        })
    }
}

/// Build a [`TransportConfig`] from the monitor configuration.
fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None,
    }
}
