//! Deposit-to-bridge orchestration.
//!
//! [`LiquidityKit`] binds one identity provider and one bridge provider and
//! owns the lifecycle every detected deposit moves through:
//!
//! 1. **Detected**: the event arrives from the bridge provider's stream and
//!    passes deduplication; `on_deposit` fires exactly once per distinct
//!    `(token, tx_hash)` identity.
//! 2. **Eligibility**: auto-bridging proceeds only when the `autobridge` flag
//!    is set and the token passes the allow-list.
//! 3. **BridgeInitiated**: requires a current identity; without one the
//!    lifecycle fails closed (logged, no relay, no crash).
//!    `on_bridge_initiated` fires before the relay call.
//! 4. **BridgeCompleted / BridgeFailed**: exactly one fires per initiated
//!    lifecycle, decided by the relay submission outcome.
//!
//! Errors and panics on the delivery path stay on the delivery path: handler
//! panics are isolated per invocation, and relay errors become
//! `on_bridge_failed` notifications rather than propagating.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::auth::AuthProvider;
use crate::bridge::{BridgeProvider, DepositCallback, DepositSubscription};
use crate::config::KitConfig;
use crate::error::KitError;
use crate::types::{BridgeRequest, DepositEvent, Identity};

// ============================================================================
// LIFECYCLE HANDLERS
// ============================================================================

/// Handler invoked with the deposit event driving a lifecycle transition.
pub type DepositEventHandler = Arc<dyn Fn(&DepositEvent) + Send + Sync>;

/// Handler invoked when an initiated bridge fails at submission.
pub type BridgeFailureHandler = Arc<dyn Fn(&DepositEvent, &KitError) + Send + Sync>;

/// Optional callbacks notified on deposit lifecycle transitions.
///
/// Every field may be left `None`. Handlers run on the delivery task; a
/// panicking handler is logged and isolated, never aborting the subscription.
#[derive(Clone, Default)]
pub struct DepositHandlers {
    /// Fires once per distinct detected deposit
    pub on_deposit: Option<DepositEventHandler>,
    /// Fires once per lifecycle that reaches bridge initiation
    pub on_bridge_initiated: Option<DepositEventHandler>,
    /// Fires when the relay submission is accepted
    pub on_bridge_completed: Option<DepositEventHandler>,
    /// Fires when the relay submission is rejected
    pub on_bridge_failed: Option<BridgeFailureHandler>,
}

/// Invokes a lifecycle handler, isolating panics to this invocation.
fn invoke_handler(name: &str, handler: &Option<DepositEventHandler>, event: &DepositEvent) {
    if let Some(handler) = handler {
        if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
            error!("{} handler panicked, subscription continues", name);
        }
    }
}

/// Invokes the failure handler, isolating panics to this invocation.
fn invoke_failure_handler(
    handler: &Option<BridgeFailureHandler>,
    event: &DepositEvent,
    err: &KitError,
) {
    if let Some(handler) = handler {
        if catch_unwind(AssertUnwindSafe(|| handler(event, err))).is_err() {
            error!("on_bridge_failed handler panicked, subscription continues");
        }
    }
}

// ============================================================================
// THE KIT
// ============================================================================

/// Orchestrator composing one identity provider and one bridge provider.
///
/// Providers are constructed by the caller and passed in; the kit never
/// creates or mutates them, and their lifetime is owner-controlled.
pub struct LiquidityKit {
    /// Identity provider
    auth: Arc<dyn AuthProvider>,
    /// Bridge provider
    bridge: Arc<dyn BridgeProvider>,
    /// Auto-bridge policy and chain route
    config: KitConfig,
    /// Last-known identity, so `current_user` can answer without a provider
    /// round-trip when possible
    current_identity: Arc<RwLock<Option<Identity>>>,
    /// Deposit identities already handled. Shared across subscriptions so the
    /// same deposit watched twice still bridges at most once.
    seen_deposits: Arc<RwLock<HashSet<(String, String)>>>,
}

impl LiquidityKit {
    /// Creates a kit from a provider pair and policy configuration.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        bridge: Arc<dyn BridgeProvider>,
        config: KitConfig,
    ) -> Self {
        Self {
            auth,
            bridge,
            config,
            current_identity: Arc::new(RwLock::new(None)),
            seen_deposits: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Initializes both providers, failing fast on the first error.
    pub async fn initialize(&self) -> Result<(), KitError> {
        self.auth.initialize().await?;
        self.bridge.initialize().await?;
        Ok(())
    }

    /// Logs a user in and caches the resulting identity.
    pub async fn login(&self, identifier: &str) -> Result<Identity, KitError> {
        let identity = self.auth.login(identifier).await?;
        *self.current_identity.write().await = Some(identity.clone());
        Ok(identity)
    }

    /// Logs the current user out.
    ///
    /// The local identity cache is always cleared; provider failures are
    /// logged and swallowed.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!("Identity provider logout failed: {}", e);
        }
        *self.current_identity.write().await = None;
    }

    /// Returns the current identity, preferring the local cache.
    ///
    /// Falls back to the identity provider when the cache is empty and
    /// refreshes the cache from its answer.
    pub async fn current_user(&self) -> Option<Identity> {
        if let Some(identity) = self.current_identity.read().await.clone() {
            return Some(identity);
        }

        let fetched = self.auth.current_user().await;
        if let Some(identity) = &fetched {
            *self.current_identity.write().await = Some(identity.clone());
        }
        fetched
    }

    /// Subscribes to deposits on a source-chain address and drives each
    /// detected deposit through the bridging lifecycle.
    ///
    /// Returns immediately; all further work happens on the delivery path.
    /// Multiple subscriptions run independently, sharing only the dedup set.
    ///
    /// # Arguments
    ///
    /// * `source_address` - Address watched for incoming deposits
    /// * `handlers` - Lifecycle callbacks, each optional
    ///
    /// # Returns
    ///
    /// - `Ok(DepositSubscription)` - Cancellation handle for the watch
    /// - `Err(KitError)` - The bridge provider rejected the watch
    pub async fn subscribe_deposits(
        &self,
        source_address: &str,
        handlers: DepositHandlers,
    ) -> Result<DepositSubscription, KitError> {
        let callback: DepositCallback = {
            let auth = Arc::clone(&self.auth);
            let bridge = Arc::clone(&self.bridge);
            let config = self.config.clone();
            let current_identity = Arc::clone(&self.current_identity);
            let seen_deposits = Arc::clone(&self.seen_deposits);
            let source_address = source_address.to_string();

            Arc::new(move |event: DepositEvent| {
                let auth = Arc::clone(&auth);
                let bridge = Arc::clone(&bridge);
                let config = config.clone();
                let current_identity = Arc::clone(&current_identity);
                let seen_deposits = Arc::clone(&seen_deposits);
                let source_address = source_address.clone();
                let handlers = handlers.clone();

                Box::pin(async move {
                    run_deposit_lifecycle(
                        event,
                        source_address,
                        config,
                        handlers,
                        auth,
                        bridge,
                        current_identity,
                        seen_deposits,
                    )
                    .await;
                })
            })
        };

        self.bridge.watch_deposits(source_address, callback).await
    }

    /// Bridges funds directly, bypassing auto-bridge policy.
    ///
    /// Pass-through to the bridge provider; rejection surfaces to the caller
    /// as a typed error rather than a lifecycle notification.
    pub async fn bridge_manually(
        &self,
        source_address: &str,
        destination_address: &str,
        token_symbol: &str,
        amount: &str,
    ) -> Result<String, KitError> {
        let request = BridgeRequest {
            source_chain: self.config.source_chain.clone(),
            destination_chain: self.config.destination_chain.clone(),
            source_address: source_address.to_string(),
            destination_address: destination_address.to_string(),
            token_symbol: token_symbol.to_string(),
            amount: amount.to_string(),
        };

        self.bridge.relay(&request).await
    }

    /// Returns the bridge provider's token support map.
    pub async fn supported_tokens(
        &self,
    ) -> Result<std::collections::HashMap<String, Vec<String>>, KitError> {
        self.bridge.supported_tokens().await
    }
}

// ============================================================================
// DEPOSIT LIFECYCLE
// ============================================================================

/// Drives one delivered deposit event through the lifecycle.
///
/// Runs on the delivery task for this event. Handler invocations for one
/// event identity are strictly ordered; nothing is guaranteed across
/// identities.
#[allow(clippy::too_many_arguments)]
async fn run_deposit_lifecycle(
    event: DepositEvent,
    source_address: String,
    config: KitConfig,
    handlers: DepositHandlers,
    auth: Arc<dyn AuthProvider>,
    bridge: Arc<dyn BridgeProvider>,
    current_identity: Arc<RwLock<Option<Identity>>>,
    seen_deposits: Arc<RwLock<HashSet<(String, String)>>>,
) {
    // Dedup under the write lock, before any handler runs. Two concurrent
    // deliveries of the same identity race on this insert and only the winner
    // proceeds.
    {
        let mut seen = seen_deposits.write().await;
        if !seen.insert(event.dedup_key()) {
            debug!(
                "Discarding duplicate delivery of deposit {} ({})",
                event.tx_hash, event.token_symbol
            );
            return;
        }
    }

    invoke_handler("on_deposit", &handlers.on_deposit, &event);

    if !config.autobridge {
        return;
    }
    if !config.allowed_tokens.is_empty() && !config.allowed_tokens.contains(&event.token_symbol) {
        debug!(
            "Deposit {} token '{}' is outside the allow-list, not bridging",
            event.tx_hash, event.token_symbol
        );
        return;
    }

    // Cache first, provider second. Without an identity there is no defined
    // destination, so the lifecycle fails closed here.
    let identity = {
        let cached = current_identity.read().await.clone();
        match cached {
            Some(identity) => Some(identity),
            None => {
                let fetched = auth.current_user().await;
                if let Some(identity) = &fetched {
                    *current_identity.write().await = Some(identity.clone());
                }
                fetched
            }
        }
    };
    let Some(identity) = identity else {
        warn!(
            "Deposit {} is eligible for bridging but no user is logged in, skipping relay",
            event.tx_hash
        );
        return;
    };

    let request = BridgeRequest {
        source_chain: config.source_chain.clone(),
        destination_chain: config.destination_chain.clone(),
        source_address,
        destination_address: identity.addresses.destination.clone(),
        token_symbol: event.token_symbol.clone(),
        amount: event.amount.clone(),
    };

    invoke_handler("on_bridge_initiated", &handlers.on_bridge_initiated, &event);

    match bridge.relay(&request).await {
        Ok(tx_hash) => {
            info!(
                "Auto-bridge accepted: deposit {} relayed as {}",
                event.tx_hash, tx_hash
            );
            invoke_handler("on_bridge_completed", &handlers.on_bridge_completed, &event);
        }
        Err(err) => {
            error!(
                "Auto-bridge relay failed for deposit {}: {}",
                event.tx_hash, err
            );
            invoke_failure_handler(&handlers.on_bridge_failed, &event, &err);
        }
    }
}
