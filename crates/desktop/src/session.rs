//! Session/identity provider.
//!
//! Owns the single `SessionState` of the client and the persisted credential.
//! Readers get immutable snapshots or subscribe to changes; only `hydrate`,
//! `login` and `logout` move the state.
//!
//! Every operation takes a ticket (epoch) when it starts. A result is applied
//! only if no later operation has started since, checked under the same lock
//! that writes the state and the credential store. Logout therefore wins over
//! a pending login, and login wins over a pending hydration.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use cmms_auth::{AccessRequirement, Identity, Permission, Role, SessionState, decode_claims};

use crate::api::{ApiError, AuthApi};
use crate::credentials::{CredentialStore, CredentialStoreError, StoredCredentials};
use crate::types::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("a login is already in progress")]
    InFlight,
    #[error("the session provider has been closed")]
    Closed,
    #[error("invalid email or password")]
    Rejected,
    #[error("authentication service unavailable: {0}")]
    Unavailable(#[source] ApiError),
    #[error("could not load the signed-in user: {0}")]
    Identity(#[source] ApiError),
    #[error("the signed-in user has no role")]
    MissingRole,
    #[error("could not persist the session credential: {0}")]
    Storage(#[from] CredentialStoreError),
    #[error("login was superseded by a later sign-out or shutdown")]
    Superseded,
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected(_) => LoginError::Rejected,
            other => LoginError::Unavailable(other),
        }
    }
}

#[derive(Debug, Default)]
struct Control {
    epoch: u64,
    hydration_started: bool,
    login_pending: bool,
    closed: bool,
}

/// Clears `login_pending` when the login future completes or is dropped.
///
/// A login dropped before it settles is treated as failed: if it is still the
/// current operation, the credential is cleared and the state is `Anonymous`.
struct PendingLogin<'a, A: AuthApi, S: CredentialStore> {
    provider: &'a SessionProvider<A, S>,
    epoch: u64,
    settled: bool,
}

impl<A: AuthApi, S: CredentialStore> Drop for PendingLogin<'_, A, S> {
    fn drop(&mut self) {
        let mut control = self.provider.control();
        control.login_pending = false;
        if !self.settled && !control.closed && control.epoch == self.epoch {
            warn!("login cancelled before it settled; signing out");
            self.provider.sign_out_locally();
        }
    }
}

pub struct SessionProvider<A, S> {
    api: A,
    store: S,
    state: watch::Sender<SessionState>,
    control: Mutex<Control>,
}

impl<A: AuthApi, S: CredentialStore> SessionProvider<A, S> {
    pub fn new(api: A, store: S) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            api,
            store,
            state,
            control: Mutex::new(Control::default()),
        }
    }

    /// Current state. Cheap: identities are shared behind an `Arc`.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        match &*self.state.borrow() {
            SessionState::Authenticated(identity) => Some(Arc::clone(identity)),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.state.borrow().has_permission(permission)
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.state.borrow().has_any_permission(permissions)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.state.borrow().has_role(roles)
    }

    pub fn allows(&self, requirement: &AccessRequirement) -> bool {
        self.state.borrow().allows(requirement)
    }

    /// True while a `login` call is in flight; the UI disables its login action.
    pub fn login_pending(&self) -> bool {
        self.control().login_pending
    }

    /// Detach the provider. Results of operations still in flight are dropped.
    pub fn close(&self) {
        let mut control = self.control();
        control.closed = true;
        control.epoch += 1;
        debug!("session provider closed");
    }

    /// Restore the session from the persisted credential.
    ///
    /// Runs once; later calls (or calls after a login has started) return the
    /// current state without doing anything.
    pub async fn hydrate(&self) -> SessionState {
        let epoch = {
            let mut control = self.control();
            if control.hydration_started || control.closed || control.login_pending {
                return self.snapshot();
            }
            if !matches!(*self.state.borrow(), SessionState::Uninitialized) {
                return self.snapshot();
            }
            control.hydration_started = true;
            control.epoch += 1;
            self.transition(SessionState::Hydrating);
            control.epoch
        };

        let stored = match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                self.commit(epoch, || self.transition(SessionState::Anonymous));
                return self.snapshot();
            }
            Err(err) => {
                warn!(error = %err, "stored credential unreadable; discarding");
                self.commit(epoch, || self.sign_out_locally());
                return self.snapshot();
            }
        };

        let claims = decode_claims(&stored.access_token);
        if claims.as_ref().is_some_and(|c| c.is_expired(Utc::now())) {
            info!("stored credential has expired; discarding");
            self.commit(epoch, || self.sign_out_locally());
            return self.snapshot();
        }

        match self.api.me(&stored.access_token).await {
            Ok(me) => {
                let identity = me.into_identity().merge_claims(claims.as_ref());
                if identity.role.is_none() {
                    warn!("restored identity carries no role; discarding credential");
                    self.commit(epoch, || self.sign_out_locally());
                } else {
                    self.commit(epoch, || {
                        self.transition(SessionState::Authenticated(Arc::new(identity)))
                    });
                }
            }
            Err(err) => {
                warn!(
                    error = %err,
                    transient = err.is_transient(),
                    "session hydration failed; discarding credential"
                );
                self.commit(epoch, || self.sign_out_locally());
            }
        }

        self.snapshot()
    }

    /// Sign in. On success the credential is persisted and the state becomes
    /// `Authenticated`; on failure the state is `Anonymous` and the reason is
    /// returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), LoginError> {
        let epoch = {
            let mut control = self.control();
            if control.closed {
                return Err(LoginError::Closed);
            }
            if control.login_pending {
                return Err(LoginError::InFlight);
            }
            control.login_pending = true;
            control.epoch += 1;
            control.epoch
        };
        let mut pending = PendingLogin {
            provider: self,
            epoch,
            settled: false,
        };

        let result = self.run_login(epoch, credentials).await;
        pending.settled = true;
        drop(pending);
        match &result {
            Ok(()) => info!(email = credentials.email(), "signed in"),
            Err(LoginError::Superseded) => debug!("login result discarded"),
            Err(err) => warn!(email = credentials.email(), error = %err, "login failed"),
        }
        result
    }

    async fn run_login(&self, epoch: u64, credentials: &Credentials) -> Result<(), LoginError> {
        let tokens = match self.api.login(credentials).await {
            Ok(tokens) => tokens,
            Err(err) => return Err(self.fail_login(epoch, err.into())),
        };

        let stored = StoredCredentials::from(tokens);
        match self.commit(epoch, || self.store.save(&stored)) {
            None => return Err(LoginError::Superseded),
            Some(Err(err)) => return Err(self.fail_login(epoch, err.into())),
            Some(Ok(())) => {}
        }

        let claims = decode_claims(&stored.access_token);
        let identity = match self.api.me(&stored.access_token).await {
            Ok(me) => me.into_identity().merge_claims(claims.as_ref()),
            Err(err) => return Err(self.fail_login(epoch, LoginError::Identity(err))),
        };
        if identity.role.is_none() {
            return Err(self.fail_login(epoch, LoginError::MissingRole));
        }

        self.commit(epoch, || {
            self.transition(SessionState::Authenticated(Arc::new(identity)))
        })
        .ok_or(LoginError::Superseded)
    }

    /// Settle a failed login: no credential, `Anonymous`. If a later operation
    /// has taken over, the failure is reported as superseded instead.
    fn fail_login(&self, epoch: u64, err: LoginError) -> LoginError {
        match self.commit(epoch, || self.sign_out_locally()) {
            Some(()) => err,
            None => LoginError::Superseded,
        }
    }

    /// Sign out. The credential is cleared and the state is `Anonymous` before
    /// the API is contacted; the API call is best effort.
    pub async fn logout(&self) {
        let token = {
            let mut control = self.control();
            control.epoch += 1;
            let token = match self.store.load() {
                Ok(stored) => stored.map(|s| s.access_token),
                Err(err) => {
                    debug!(error = %err, "stored credential unreadable during logout");
                    None
                }
            };
            self.sign_out_locally();
            token
        };
        info!("signed out");

        if let Some(token) = token {
            if let Err(err) = self.api.logout(&token).await {
                debug!(error = %err, "logout notification failed; ignored");
            }
        }
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `apply` if the operation holding `epoch` is still current.
    fn commit<T>(&self, epoch: u64, apply: impl FnOnce() -> T) -> Option<T> {
        let control = self.control();
        if control.closed || control.epoch != epoch {
            return None;
        }
        Some(apply())
    }

    fn sign_out_locally(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to remove stored credential");
        }
        self.transition(SessionState::Anonymous);
    }

    fn transition(&self, next: SessionState) {
        let from = self.state.borrow().name();
        let to = next.name();
        self.state.send_replace(next);
        if from != to {
            info!(from, to, "session state changed");
        }
    }
}
