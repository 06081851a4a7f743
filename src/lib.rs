//! Liquidity Kit Library
//!
//! This crate provides a provider-abstracted authentication and cross-chain
//! bridging kit. Users authenticate with an email-based identity provider,
//! deposits detected on their source-chain address are relayed automatically
//! to their derived destination-chain address, and every lifecycle transition
//! is reported through caller-supplied callbacks.
//!
//! Authentication and bridging are capability traits ([`AuthProvider`] and
//! [`BridgeProvider`]); the kit composes one concrete implementation of each
//! and owns the deposit-to-bridge state machine. The bundled implementations
//! ([`MagicLinkAuth`] and [`SimulatedBridge`]) are demo variants and can be
//! swapped for real backends without touching the orchestration code.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod error;
pub mod kit;
pub mod types;

// Re-export commonly used types
pub use auth::{AuthProvider, MagicLinkAuth};
pub use bridge::{BridgeProvider, DepositCallback, DepositSubscription, SimulatedBridge};
pub use config::{AuthConfig, BridgeConfig, Config, KitConfig};
pub use error::KitError;
pub use kit::{DepositHandlers, LiquidityKit};
pub use types::{
    BridgeRequest, BridgeState, BridgeStatus, ChainAddresses, DepositEvent, Identity,
};
