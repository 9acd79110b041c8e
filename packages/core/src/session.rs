//! Session/identity cache.
//!
//! Reflects the current authentication state for the rest of the app to
//! read synchronously. Provider callbacks and the visibility-triggered
//! refresh poll both land in one internal event queue consumed by a
//! single idempotent handler, so running the same sync twice is safe by
//! construction.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::order::ShippingAddress;

/// Minimal identity payload delivered by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSession {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// Session discovered on initial load, if any.
    InitialSession(Option<ProviderSession>),
    SignedIn(ProviderSession),
    /// A refresh can come back empty, which counts as a sign-out.
    TokenRefreshed(Option<ProviderSession>),
    SignedOut,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub addresses: Vec<ShippingAddress>,
    pub is_admin: bool,
}

#[async_trait::async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Looks up the profile by email, creating a default one when
    /// absent so first-time passwordless sign-in needs no registration.
    async fn get_or_create(
        &self,
        email: &str,
        display_name: Option<&str>,
    ) -> anyhow::Result<UserProfile>;
    async fn update(&self, email: &str, name: &str, phone: &str) -> anyhow::Result<UserProfile>;
    async fn is_admin(&self, email: &str) -> anyhow::Result<bool>;
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_session(&self) -> anyhow::Result<Option<ProviderSession>>;
    async fn sign_out(&self) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session expired, please sign in again")]
    SessionExpired,
    #[error(transparent)]
    Directory(#[from] anyhow::Error),
}

pub struct SessionCache {
    directory: Arc<dyn ProfileDirectory>,
    provider: Arc<dyn IdentityProvider>,
    queue: VecDeque<AuthEvent>,
    is_authenticated: bool,
    uid: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    profile: Option<UserProfile>,
    is_admin: bool,
}

impl SessionCache {
    pub fn new(directory: Arc<dyn ProfileDirectory>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            directory,
            provider,
            queue: VecDeque::new(),
            is_authenticated: false,
            uid: None,
            email: None,
            display_name: None,
            profile: None,
            is_admin: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn push_event(&mut self, event: AuthEvent) {
        self.queue.push_back(event);
    }

    /// Drains the event queue. Applying the same session twice is a
    /// no-op beyond refreshing the cached profile and admin flag.
    pub async fn process_events(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            match event {
                AuthEvent::SignedIn(session)
                | AuthEvent::InitialSession(Some(session))
                | AuthEvent::TokenRefreshed(Some(session)) => self.sync_session(session).await,
                AuthEvent::SignedOut
                | AuthEvent::InitialSession(None)
                | AuthEvent::TokenRefreshed(None) => self.clear_identity(),
            }
        }
    }

    async fn sync_session(&mut self, session: ProviderSession) {
        self.is_authenticated = true;
        self.uid = Some(session.uid.clone());
        self.email = Some(session.email.clone());
        self.display_name = session.display_name.clone();

        // Profile and admin lookups are non-fatal: the identity itself
        // stays signed in even when either of them fails.
        match self
            .directory
            .get_or_create(&session.email, session.display_name.as_deref())
            .await
        {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load profile");
            }
        }

        self.is_admin = self.check_admin_status(&session.email).await;
    }

    /// Never errors; any resolution failure defaults to not-admin.
    async fn check_admin_status(&self, email: &str) -> bool {
        #[cfg(debug_assertions)]
        if dev_admin_allowlist().iter().any(|e| e == email) {
            return true;
        }

        match self.directory.is_admin(email).await {
            Ok(is_admin) => is_admin,
            Err(err) => {
                tracing::warn!(error = %err, "Admin status lookup failed, defaulting to false");
                false
            }
        }
    }

    /// Requires a live provider session, re-validated rather than
    /// assumed from the cache.
    pub async fn update_profile(
        &mut self,
        name: &str,
        phone: &str,
    ) -> Result<UserProfile, SessionError> {
        let session = self
            .provider
            .current_session()
            .await
            .map_err(SessionError::Directory)?
            .ok_or(SessionError::SessionExpired)?;

        let profile = self.directory.update(&session.email, name, phone).await?;
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Local identity state is cleared even when the provider call
    /// fails.
    pub async fn logout(&mut self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::warn!(error = %err, "Provider sign-out failed");
        }
        self.clear_identity();
    }

    fn clear_identity(&mut self) {
        self.is_authenticated = false;
        self.uid = None;
        self.email = None;
        self.display_name = None;
        self.profile = None;
        self.is_admin = false;
    }
}

#[cfg(debug_assertions)]
fn dev_admin_allowlist() -> Vec<String> {
    std::env::var("DEV_ADMIN_EMAILS")
        .map(|raw| {
            raw.split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeDirectory {
        profiles: Mutex<Vec<UserProfile>>,
        create_calls: AtomicUsize,
        fail_admin_lookup: bool,
    }

    #[async_trait::async_trait]
    impl ProfileDirectory for FakeDirectory {
        async fn get_or_create(
            &self,
            email: &str,
            display_name: Option<&str>,
        ) -> anyhow::Result<UserProfile> {
            let mut profiles = self.profiles.lock().unwrap();
            if let Some(existing) = profiles.iter().find(|p| p.email == email) {
                return Ok(existing.clone());
            }
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let profile = UserProfile {
                email: email.to_string(),
                name: display_name.unwrap_or("New User").to_string(),
                phone: String::new(),
                addresses: vec![],
                is_admin: false,
            };
            profiles.push(profile.clone());
            Ok(profile)
        }

        async fn update(
            &self,
            email: &str,
            name: &str,
            phone: &str,
        ) -> anyhow::Result<UserProfile> {
            let mut profiles = self.profiles.lock().unwrap();
            let profile = profiles
                .iter_mut()
                .find(|p| p.email == email)
                .ok_or_else(|| anyhow::anyhow!("profile not found"))?;
            profile.name = name.to_string();
            profile.phone = phone.to_string();
            Ok(profile.clone())
        }

        async fn is_admin(&self, email: &str) -> anyhow::Result<bool> {
            if self.fail_admin_lookup {
                anyhow::bail!("directory unavailable");
            }
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.iter().any(|p| p.email == email && p.is_admin))
        }
    }

    struct FakeProvider {
        session: Mutex<Option<ProviderSession>>,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for FakeProvider {
        async fn current_session(&self) -> anyhow::Result<Option<ProviderSession>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn sign_out(&self) -> anyhow::Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    fn session(uid: &str) -> ProviderSession {
        ProviderSession {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            display_name: None,
        }
    }

    fn cache_with(
        directory: Arc<FakeDirectory>,
        current: Option<ProviderSession>,
    ) -> SessionCache {
        let provider = Arc::new(FakeProvider {
            session: Mutex::new(current),
        });
        SessionCache::new(directory, provider)
    }

    #[tokio::test]
    async fn test_sign_in_creates_profile_lazily() {
        let directory = Arc::new(FakeDirectory::default());
        let mut cache = cache_with(directory.clone(), None);

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;

        assert!(cache.is_authenticated());
        let profile = cache.profile().unwrap();
        assert_eq!(profile.name, "New User");
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_session_events_are_idempotent() {
        // Provider callback and visibility poll converging on the same
        // session must not duplicate anything.
        let directory = Arc::new(FakeDirectory::default());
        let mut cache = cache_with(directory.clone(), None);

        cache.push_event(AuthEvent::InitialSession(Some(session("u1"))));
        cache.push_event(AuthEvent::TokenRefreshed(Some(session("u1"))));
        cache.process_events().await;

        assert!(cache.is_authenticated());
        assert_eq!(directory.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_refresh_clears_identity() {
        let directory = Arc::new(FakeDirectory::default());
        let mut cache = cache_with(directory, None);

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;
        assert!(cache.is_authenticated());

        cache.push_event(AuthEvent::TokenRefreshed(None));
        cache.process_events().await;
        assert!(!cache.is_authenticated());
        assert!(cache.profile().is_none());
        assert!(!cache.is_admin());
    }

    #[tokio::test]
    async fn test_admin_lookup_failure_defaults_to_false() {
        let directory = Arc::new(FakeDirectory {
            fail_admin_lookup: true,
            ..Default::default()
        });
        let mut cache = cache_with(directory, None);

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;

        assert!(cache.is_authenticated(), "sign-in must not be blocked");
        assert!(!cache.is_admin());
    }

    #[tokio::test]
    async fn test_update_profile_requires_live_session() {
        let directory = Arc::new(FakeDirectory::default());
        let mut cache = cache_with(directory.clone(), None);

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;

        // Cache still says signed-in, but the provider session is gone.
        let err = cache.update_profile("Asha", "9999999999").await.unwrap_err();
        assert!(matches!(err, SessionError::SessionExpired));
    }

    #[tokio::test]
    async fn test_update_profile_writes_through() {
        let directory = Arc::new(FakeDirectory::default());
        let mut cache = cache_with(directory, Some(session("u1")));

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;

        let profile = cache.update_profile("Asha", "9999999999").await.unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(cache.profile().unwrap().phone, "9999999999");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_provider_fails() {
        struct FailingProvider;

        #[async_trait::async_trait]
        impl IdentityProvider for FailingProvider {
            async fn current_session(&self) -> anyhow::Result<Option<ProviderSession>> {
                Ok(None)
            }
            async fn sign_out(&self) -> anyhow::Result<()> {
                anyhow::bail!("network down")
            }
        }

        let directory = Arc::new(FakeDirectory::default());
        let mut cache = SessionCache::new(directory, Arc::new(FailingProvider));

        cache.push_event(AuthEvent::SignedIn(session("u1")));
        cache.process_events().await;
        assert!(cache.is_authenticated());

        cache.logout().await;
        assert!(!cache.is_authenticated());
        assert!(cache.email().is_none());
    }
}
