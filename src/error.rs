//! Error types for kit operations.

use thiserror::Error;

/// Errors surfaced by identity providers, bridge providers, and the kit.
///
/// Operations invoked directly by the caller (`login`, `bridge_manually`)
/// return these as typed errors. Errors occurring on the automatic deposit
/// delivery path are never propagated to arbitrary call sites; they are
/// converted into an `on_bridge_failed` notification instead.
#[derive(Error, Debug)]
pub enum KitError {
    /// Missing or invalid provider configuration. Fatal to the affected
    /// provider and surfaced before any use.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// The identifier was rejected by the backing identity system.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A bridge submission was rejected.
    #[error("Relay rejected: {0}")]
    Relay(String),

    /// A provider method was invoked before successful initialization.
    /// Every operation fails fast on this except `logout`, which is
    /// best-effort by design.
    #[error("Provider not initialized: {0}")]
    ProviderUnavailable(&'static str),
}
