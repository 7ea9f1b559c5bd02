use std::path::PathBuf;

use anyhow::Context;
use thiserror::Error;
use tracing::{info, warn};

use super::api::{ApiClient, ClientError, Profile};

#[derive(Debug)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(Profile),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("session store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Local persistence for the token and cached profile snapshot. The file is
/// created with 0600 permissions so the token is readable by the owning user
/// only.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<Profile> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, profile: &Profile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("create session dir")?;
        }
        let raw = serde_json::to_string(profile)?;
        std::fs::write(&self.path, raw).context("write session file")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .context("restrict session file permissions")?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Client-side session state machine: Anonymous -> Authenticating ->
/// Authenticated, with the token and profile persisted across restarts.
pub struct Session {
    api: ApiClient,
    store: SessionStore,
    state: SessionState,
}

impl Session {
    /// Restore a session from the local store, if one was persisted.
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        let state = match store.load() {
            Some(profile) => SessionState::Authenticated(profile),
            None => SessionState::Anonymous,
        };
        Self { api, store, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn profile(&self) -> Option<&Profile> {
        match &self.state {
            SessionState::Authenticated(p) => Some(p),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.profile().map(|p| p.token.as_str())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&Profile, SessionError> {
        self.state = SessionState::Authenticating;
        match self.api.register(username, email, password).await {
            Ok(profile) => self.authenticated(profile),
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e.into())
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Profile, SessionError> {
        self.state = SessionState::Authenticating;
        match self.api.login(email, password).await {
            Ok(profile) => self.authenticated(profile),
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e.into())
            }
        }
    }

    fn authenticated(&mut self, profile: Profile) -> Result<&Profile, SessionError> {
        self.store.save(&profile).map_err(SessionError::Store)?;
        info!(user_id = %profile.id, "session authenticated");
        self.state = SessionState::Authenticated(profile);
        match &self.state {
            SessionState::Authenticated(p) => Ok(p),
            _ => unreachable!(),
        }
    }

    /// Clear local session state and return to Anonymous. Does not wait for
    /// any in-flight request.
    pub fn logout(&mut self) {
        self.store.clear();
        self.state = SessionState::Anonymous;
    }

    /// Handle a rejected token: same local effect as logout, so the next
    /// screen is the login form.
    pub fn expire(&mut self) {
        warn!("session token rejected; returning to login");
        self.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            token: "tok".into(),
        }
    }

    #[test]
    fn store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(store.load().is_none());

        let profile = sample_profile();
        store.save(&profile).unwrap();
        let loaded = store.load().expect("saved session should load");
        assert_eq!(loaded.id, profile.id);
        assert_eq!(loaded.token, "tok");

        store.clear();
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(&path);
        store.save(&sample_profile()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_session_file_restores_to_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let session = Session::new(ApiClient::new("http://127.0.0.1:1"), SessionStore::new(path));
        assert!(matches!(session.state(), SessionState::Anonymous));
    }

    #[tokio::test]
    async fn failed_login_returns_to_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        // Port 1 is never listening, so the call fails with a network error.
        let mut session = Session::new(ApiClient::new("http://127.0.0.1:1"), store);

        let err = session.login("ada@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, SessionError::Client(ClientError::Network(_))));
        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(session.token().is_none());
    }

    #[test]
    fn logout_clears_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(&path);
        store.save(&sample_profile()).unwrap();

        let mut session = Session::new(ApiClient::new("http://127.0.0.1:1"), store);
        assert!(matches!(session.state(), SessionState::Authenticated(_)));

        session.logout();
        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(!path.exists());
    }
}
