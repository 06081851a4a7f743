//! Bridge Provider Module
//!
//! This module defines the capability interface for bridge providers and
//! re-exports the bundled simulated implementation. A provider relays token
//! amounts from a source-chain address to a destination-chain address,
//! reports relay status, and delivers deposit events for watched addresses.
//!
//! The interface, not the simulation, is the contract: a real chain-watching
//! implementation replaces [`SimulatedBridge`] without any change to the kit.

pub mod simulated;

// Re-export for convenience
pub use simulated::SimulatedBridge;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::task::AbortHandle;

use crate::error::KitError;
use crate::types::{BridgeRequest, BridgeStatus, DepositEvent};

/// Callback invoked once per delivered deposit event.
///
/// Each invocation runs on its own task, so handling one event never blocks
/// delivery of the next.
pub type DepositCallback = Arc<dyn Fn(DepositEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// Capability interface for bridge providers.
#[async_trait]
pub trait BridgeProvider: Send + Sync {
    /// Performs one-time provider setup.
    ///
    /// Must be called before any other method. Fails with
    /// [`KitError::Initialization`] when required configuration is absent.
    async fn initialize(&self) -> Result<(), KitError>;

    /// Initiates movement of funds between chains.
    ///
    /// Returns once the relay is accepted for processing; acceptance is not
    /// finality. Callers wanting confirmation poll [`status`] with the
    /// returned hash.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - Transaction hash of the accepted relay
    /// - `Err(KitError::Relay)` - Request malformed (unsupported token,
    ///   non-positive amount, identical source and destination) or rejected
    ///   by the backing bridge
    /// - `Err(KitError::ProviderUnavailable)` - Called before `initialize`
    ///
    /// [`status`]: BridgeProvider::status
    async fn relay(&self, request: &BridgeRequest) -> Result<String, KitError>;

    /// Reports the status of a previously accepted relay.
    ///
    /// Queryable at any time after `relay`. The reported state is `pending`
    /// until the provider has independent confirmation, then transitions
    /// permanently to `completed` or `failed`; terminal states never flap.
    async fn status(&self, tx_hash: &str) -> Result<BridgeStatus, KitError>;

    /// Begins delivering deposit events for an address.
    ///
    /// Delivery ordering is not guaranteed to match on-chain order, but an
    /// event is never split or partially delivered. Cancelling the returned
    /// subscription stops delivery within one polling interval and is safe
    /// to call more than once.
    async fn watch_deposits(
        &self,
        address: &str,
        on_event: DepositCallback,
    ) -> Result<DepositSubscription, KitError>;

    /// Returns the bridgeable token symbols per chain name.
    async fn supported_tokens(&self) -> Result<HashMap<String, Vec<String>>, KitError>;
}

// ============================================================================
// SUBSCRIPTION HANDLE
// ============================================================================

/// Handle for an active deposit watch.
///
/// Owned by whichever caller created it. Delivery stops on an explicit
/// [`stop`](DepositSubscription::stop) or implicitly when the handle is
/// dropped.
pub struct DepositSubscription {
    /// Shared with the provider's delivery path, which checks it before
    /// dispatching each event
    cancelled: Arc<AtomicBool>,
    /// Watcher task to abort on stop, when the provider runs one
    watcher: Option<AbortHandle>,
}

impl DepositSubscription {
    /// Creates a subscription handle around a provider's cancellation flag
    /// and optional watcher task.
    pub fn new(cancelled: Arc<AtomicBool>, watcher: Option<AbortHandle>) -> Self {
        Self { cancelled, watcher }
    }

    /// Stops delivery.
    ///
    /// Non-blocking and idempotent. Events not yet dispatched will never
    /// reach the callback; deliveries already in flight are allowed to
    /// complete.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(watcher) = &self.watcher {
            watcher.abort();
        }
    }

    /// Whether `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for DepositSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
