#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;

use super::SessionStore;
use super::ADMIN_TOKEN_KEY;
use super::USER_TOKEN_KEY;
use crate::domain::models::is_unauthorized;
use crate::domain::models::Session;
use crate::domain::models::TransportBox;

pub const FILL_ALL_FIELDS_TEXT: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH_TEXT: &str = "Passwords do not match";
pub const INVALID_CREDENTIALS_TEXT: &str = "Invalid credentials";
pub const ADMIN_REAUTH_TEXT: &str = "Authentication error. Please log in again.";
pub const ADMIN_LOGIN_REQUIRED_TEXT: &str =
    "You are not logged in as an admin. Run `sahayak admin login` first.";
pub const USER_LOGIN_REQUIRED_TEXT: &str =
    "You are not logged in. Run `sahayak login` first.";

fn any_blank(fields: &[&str]) -> bool {
    return fields.iter().any(|field| return field.trim().is_empty());
}

/// Signs users and admins in and out. Tokens are kept in the session store
/// and handed back as a fresh `Session`.
pub struct Accounts {
    transport: TransportBox,
    store: SessionStore,
}

impl Accounts {
    pub fn new(transport: TransportBox, store: SessionStore) -> Accounts {
        return Accounts { transport, store };
    }

    pub fn transport(&self) -> &TransportBox {
        return &self.transport;
    }

    #[cfg(test)]
    pub async fn session(&self) -> Result<Session> {
        return self.store.session().await;
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if any_blank(&[username, password]) {
            bail!(FILL_ALL_FIELDS_TEXT);
        }

        let token = match self.transport.user_login(username.trim(), password).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = ?err, "User login failed");
                bail!(INVALID_CREDENTIALS_TEXT);
            }
        };

        self.store.set(USER_TOKEN_KEY, &token).await?;
        tracing::info!(username = username.trim(), "User logged in");

        return self.store.session().await;
    }

    /// The backend doesn't hand out a token on signup, in which case the new
    /// account is logged in straight away.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Session> {
        if any_blank(&[username, email, password, confirm_password]) {
            bail!(FILL_ALL_FIELDS_TEXT);
        }
        if password != confirm_password {
            bail!(PASSWORD_MISMATCH_TEXT);
        }

        let token = self
            .transport
            .user_signup(username.trim(), email.trim(), password)
            .await
            .map_err(|err| return anyhow!("Signup failed: {err}"))?;

        match token {
            Some(token) => {
                self.store.set(USER_TOKEN_KEY, &token).await?;
                return self.store.session().await;
            }
            None => return self.login(username, password).await,
        }
    }

    pub async fn logout(&self) -> Result<Session> {
        self.store.remove(USER_TOKEN_KEY).await?;
        return self.store.session().await;
    }

    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Session> {
        if any_blank(&[email, password]) {
            bail!(FILL_ALL_FIELDS_TEXT);
        }

        let token = match self.transport.admin_login(email.trim(), password).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = ?err, "Admin login failed");
                bail!(INVALID_CREDENTIALS_TEXT);
            }
        };

        self.store.set(ADMIN_TOKEN_KEY, &token).await?;
        tracing::info!("Admin logged in");

        return self.store.session().await;
    }

    pub async fn admin_logout(&self) -> Result<Session> {
        self.store.remove(ADMIN_TOKEN_KEY).await?;
        return self.store.session().await;
    }

    pub async fn user_token(&self) -> Result<String> {
        match self.store.session().await?.user_token {
            Some(token) => return Ok(token),
            None => bail!(USER_LOGIN_REQUIRED_TEXT),
        }
    }

    pub async fn admin_token(&self) -> Result<String> {
        match self.store.session().await?.admin_token {
            Some(token) => return Ok(token),
            None => bail!(ADMIN_LOGIN_REQUIRED_TEXT),
        }
    }

    /// Passes admin call results through. A 401 means the stored admin token
    /// is no longer valid, so it is dropped.
    pub async fn check_admin<T>(&self, res: Result<T>) -> Result<T> {
        match res {
            Ok(value) => return Ok(value),
            Err(err) if is_unauthorized(&err) => {
                self.store.remove(ADMIN_TOKEN_KEY).await?;
                tracing::warn!("Admin token rejected, cleared it");
                bail!(ADMIN_REAUTH_TEXT);
            }
            Err(err) => return Err(err),
        }
    }
}
