//! `cmms-desktop`
//!
//! **Responsibility:** Session plumbing for the CMMS client.
//!
//! This crate provides:
//! - The session/identity provider (hydrate, login, logout)
//! - The HTTP client for the CMMS auth endpoints
//! - Credential persistence (file or in-memory)
//! - Client configuration from the environment
//!
//! Authorization decisions live in `cmms-auth`; menus and route guards in
//! `cmms-navigation`. The CMMS API remains the authority on every request.

pub mod api;
pub mod config;
pub mod credentials;
pub mod session;
pub mod types;

pub use api::{ApiError, AuthApi, HttpAuthApi};
pub use config::{ClientConfig, ConfigError};
pub use credentials::{
    CredentialStore, CredentialStoreError, FileCredentialStore, InMemoryCredentialStore,
    StoredCredentials,
};
pub use session::{LoginError, SessionProvider};
pub use types::{Credentials, MeResponse, TokenPair};
