// Account endpoints
//
// Cookie-based session login/logout and user registration. The login
// endpoint sets a session cookie in the client's jar; every later request
// carries it automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::CradleClient;
use crate::error::Error;
use crate::models::{LoginResponse, Outcome, UsernameCheck};

impl CradleClient {
    /// Authenticate with username/password.
    ///
    /// `POST /login`. A 2xx body with `success: false` and a non-2xx
    /// response both become [`Error::Authentication`] carrying the server's
    /// message.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.endpoint(&["login"])?;
        debug!(username, "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp: LoginResponse = self
            .post(url, Some(&body), false)
            .await
            .map_err(|e| match e {
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        if !resp.success {
            return Err(Error::Authentication {
                message: resp
                    .message
                    .unwrap_or_else(|| "invalid username or password".into()),
            });
        }

        debug!("login successful");
        Ok(resp)
    }

    /// Create a user account.
    ///
    /// `POST /register`
    pub async fn register_user(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Outcome, Error> {
        let url = self.endpoint(&["register"])?;
        debug!(username, "registering user");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let outcome: Outcome = self.post(url, Some(&body), false).await?;
        if outcome.is_rejected() {
            return Err(Error::Rejected {
                message: outcome
                    .message()
                    .unwrap_or("registration rejected")
                    .to_owned(),
            });
        }
        Ok(outcome)
    }

    /// Whether a username is already taken.
    ///
    /// `GET /check_username/{username}`
    pub async fn check_username(&self, username: &str) -> Result<bool, Error> {
        let url = self.endpoint(&["check_username", username])?;
        let check: UsernameCheck = self.get(url).await?;
        Ok(check.exists)
    }

    /// End the current session.
    ///
    /// `POST /logout`. The body, if any, is ignored.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(&["logout"])?;
        debug!("logging out");
        self.post_ack(url, None::<&()>).await?;
        Ok(())
    }
}
