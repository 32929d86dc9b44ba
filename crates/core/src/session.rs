//! Mock session: any non-empty credentials are accepted and a user record is
//! fabricated locally. This is a placeholder login, not a security boundary.

use crate::domain::user::{email_local_part, User};
use crate::notify::{Notification, Notifier};
use crate::storage::{self, KeyValueStore, USER_KEY};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Loading,
    Authenticated,
    Error,
}

impl AuthState {
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Loading
        } else if self.error.is_some() {
            SessionStatus::Error
        } else if self.user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    /// Restores the session from storage. Never fails: unreadable storage
    /// starts unauthenticated, an unparsable record starts in the error state.
    pub fn open(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let initial = match store.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => AuthState {
                    user: Some(user),
                    ..AuthState::default()
                },
                Err(err) => {
                    tracing::warn!(error = %err, "stored user record is corrupt");
                    AuthState {
                        error: Some("Failed to parse user data".to_string()),
                        ..AuthState::default()
                    }
                }
            },
            Ok(None) => AuthState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored user; starting signed out");
                AuthState::default()
            }
        };

        let (state, _) = watch::channel(initial);
        Self {
            store,
            notifier,
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn login(&self, email: &str, password: &str) -> bool {
        self.begin();
        if email.is_empty() || password.is_empty() {
            return self.fail("Email and password are required");
        }
        self.establish(
            User::fabricate(email, email_local_part(email)),
            "Logged in successfully!",
        )
    }

    pub fn signup(&self, email: &str, password: &str, name: &str) -> bool {
        self.begin();
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return self.fail("All fields are required");
        }
        self.establish(User::fabricate(email, name), "Account created successfully!")
    }

    pub fn logout(&self) {
        if let Err(err) = self.store.remove(USER_KEY) {
            tracing::warn!(error = %err, "failed to remove stored user");
        }
        self.state.send_replace(AuthState::default());
        tracing::info!("signed out");
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    // The user only becomes resident once it is persisted.
    fn establish(&self, user: User, success_message: &str) -> bool {
        if let Err(err) = storage::write_json(&*self.store, USER_KEY, &user) {
            tracing::warn!(error = %err, "failed to persist user");
            return self.fail("Failed to save session");
        }
        tracing::info!(user_id = %user.id, email = %user.email, "signed in");
        self.state.send_replace(AuthState {
            user: Some(user),
            is_loading: false,
            error: None,
        });
        self.notifier.notify(Notification::info("Success", success_message));
        true
    }

    // Keeps whichever user was resident before the attempt.
    fn fail(&self, message: &str) -> bool {
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message.to_string());
        });
        self.notifier
            .notify(Notification::destructive("Authentication Error", message));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{RecordingNotifier, Variant};
    use crate::storage::MemoryStore;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn put(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("read-only")
        }

        fn remove(&self, _key: &str) -> anyhow::Result<()> {
            anyhow::bail!("read-only")
        }
    }

    fn fixture() -> (Arc<MemoryStore>, Arc<RecordingNotifier>, SessionStore) {
        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let session = SessionStore::open(store.clone(), notifier.clone());
        (store, notifier, session)
    }

    #[test]
    fn starts_unauthenticated_without_stored_user() {
        let (_, _, session) = fixture();
        assert_eq!(session.state().status(), SessionStatus::Unauthenticated);
        assert!(session.current_user().is_none());
    }

    #[test]
    fn empty_email_is_rejected() {
        let (store, notifier, session) = fixture();

        assert!(!session.login("", "x"));

        let state = session.state();
        assert!(!state.is_authenticated());
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Email and password are required"));
        assert_eq!(state.status(), SessionStatus::Error);
        assert_eq!(notifier.titles(), vec!["Authentication Error".to_string()]);
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn login_then_logout() {
        let (store, _, session) = fixture();

        assert!(session.login("a@b.com", "secret"));
        let state = session.state();
        assert_eq!(state.status(), SessionStatus::Authenticated);
        let user = state.user.unwrap();
        assert_eq!(user.name, "a");
        assert_eq!(user.email, "a@b.com");
        assert!(!user.id.is_empty());

        let stored: User = storage::read_json(&*store, USER_KEY).unwrap().unwrap();
        assert_eq!(stored, user);

        session.logout();
        assert_eq!(session.state(), AuthState::default());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn signup_requires_all_fields_and_keeps_given_name() {
        let (_, _, session) = fixture();

        assert!(!session.signup("a@b.com", "secret", ""));
        assert_eq!(session.state().error.as_deref(), Some("All fields are required"));

        assert!(session.signup("a@b.com", "secret", "Ada"));
        let state = session.state();
        assert!(state.error.is_none());
        assert_eq!(state.user.unwrap().name, "Ada");
    }

    #[test]
    fn session_is_restored_on_open() {
        let (store, notifier, session) = fixture();
        assert!(session.login("carol@example.com", "hunter22"));
        let user = session.current_user();

        let reopened = SessionStore::open(store, notifier);
        assert_eq!(reopened.current_user(), user);
        assert_eq!(reopened.state().status(), SessionStatus::Authenticated);
    }

    #[test]
    fn corrupt_stored_user_opens_in_error_state() {
        let store = Arc::new(MemoryStore::default());
        store.put(USER_KEY, "{not json").unwrap();

        let session = SessionStore::open(store, Arc::new(RecordingNotifier::default()));
        let state = session.state();
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some("Failed to parse user data"));
    }

    #[test]
    fn failed_login_keeps_previous_user() {
        let (_, _, session) = fixture();
        assert!(session.login("a@b.com", "secret"));
        assert!(!session.login("a@b.com", ""));

        let state = session.state();
        assert_eq!(state.user.unwrap().email, "a@b.com");
        assert!(state.error.is_some());
    }

    #[test]
    fn storage_failure_rejects_login() {
        let notifier = Arc::new(RecordingNotifier::default());
        let session = SessionStore::open(Arc::new(ReadOnlyStore), notifier.clone());

        assert!(!session.login("a@b.com", "secret"));

        let state = session.state();
        assert!(!state.is_authenticated());
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Failed to save session"));
        assert_eq!(state.status(), SessionStatus::Error);
        assert_eq!(notifier.titles(), vec!["Authentication Error".to_string()]);
    }

    #[test]
    fn successful_login_and_signup_notify_success() {
        let (_, notifier, session) = fixture();
        assert!(session.login("a@b.com", "secret"));
        assert!(session.signup("b@c.com", "secret", "Bea"));

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.title == "Success" && n.variant == Variant::Default));
        assert_eq!(notes[0].description, "Logged in successfully!");
        assert_eq!(notes[1].description, "Account created successfully!");
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let (_, _, session) = fixture();
        let mut rx = session.subscribe();

        assert!(session.login("a@b.com", "secret"));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        session.logout();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }
}
