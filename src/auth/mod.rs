//! Identity Provider Module
//!
//! This module defines the capability interface for authentication providers
//! and re-exports the bundled email-magic-link implementation. A provider
//! authenticates an external identifier (usually an email) into a stable
//! [`Identity`] and derives the per-chain addresses funds move between.
//!
//! Implementations are swappable: a wallet-linking variant or a real
//! magic-link backend can replace [`MagicLinkAuth`] without changes to the
//! kit.

pub mod magic_link;

// Re-export for convenience
pub use magic_link::MagicLinkAuth;

use async_trait::async_trait;

use crate::error::KitError;
use crate::types::{ChainAddresses, Identity};

/// Capability interface for authentication providers.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Performs one-time provider setup.
    ///
    /// Must be called before any other method. Fails with
    /// [`KitError::Initialization`] when required configuration (an API key
    /// or similar) is absent, so misconfiguration surfaces before any login
    /// attempt rather than mid-flow.
    async fn initialize(&self) -> Result<(), KitError>;

    /// Logs a user in with the given identifier (usually an email).
    ///
    /// Repeated calls with the same identifier return an identity with the
    /// same `id`, absent external state changes.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)` - The authenticated identity, now current
    /// - `Err(KitError::Authentication)` - Identifier rejected by the backend
    /// - `Err(KitError::ProviderUnavailable)` - Called before `initialize`
    async fn login(&self, identifier: &str) -> Result<Identity, KitError>;

    /// Logs the current user out.
    ///
    /// Best-effort: local identity state is always cleared, and backend
    /// failures are logged and swallowed rather than surfaced to the caller.
    async fn logout(&self) -> Result<(), KitError>;

    /// Returns the current identity if a user is logged in.
    ///
    /// Absence is not an error.
    async fn current_user(&self) -> Option<Identity>;

    /// Derives the chain address pair for a user id.
    ///
    /// Pure function of `user_id` plus provider configuration: the same input
    /// always yields the same addresses, so repeated derivation (for example
    /// across a session restore) cannot fork a user's addresses.
    fn derive_addresses(&self, user_id: &str) -> ChainAddresses;
}
