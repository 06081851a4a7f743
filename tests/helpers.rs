//! Shared test helpers for unit tests
//!
//! This module provides helper functions used by unit tests.
//!
//! The module is organized into several categories:
//! - **Constants**: Dummy emails, addresses, tokens, and hashes
//! - **Configuration Builders**: Functions to create test configurations
//! - **Default Event Creators**: Functions to create default deposit events
//! - **Mock Providers**: An injectable bridge provider for driving the
//!   deposit lifecycle deterministically
//! - **Handler Recorders**: Lifecycle handlers that record their invocations

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;

use liquidity_kit::bridge::{BridgeProvider, DepositCallback, DepositSubscription};
use liquidity_kit::{
    AuthConfig, BridgeConfig, BridgeRequest, BridgeState, BridgeStatus, Config, DepositEvent,
    DepositHandlers, KitConfig, KitError, LiquidityKit, MagicLinkAuth,
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Chain deposits arrive on in test configurations
pub const SOURCE_CHAIN: &str = "solana";

/// Chain relayed funds land on in test configurations
pub const DESTINATION_CHAIN: &str = "flow";

/// Dummy email for the primary test user
pub const DUMMY_EMAIL: &str = "alice@example.com";

/// Dummy email for a second test user
#[allow(dead_code)]
pub const DUMMY_EMAIL_ALT: &str = "bob@example.com";

/// Dummy publishable API key accepted by the magic-link provider
pub const DUMMY_API_KEY: &str = "pk_test_0000000000000000";

/// Token symbol present in the test token sets
pub const DUMMY_TOKEN: &str = "USDC";

/// Token symbol absent from the test token sets
#[allow(dead_code)]
pub const DUMMY_TOKEN_UNLISTED: &str = "DOGE";

/// Default deposit amount (decimal string)
pub const DUMMY_AMOUNT: &str = "10.00";

/// Dummy deposit transaction hash
pub const DUMMY_TX_HASH: &str = "dep-00000000-0000-0000-0000-000000000001";

/// Second dummy deposit transaction hash
#[allow(dead_code)]
pub const DUMMY_TX_HASH_ALT: &str = "dep-00000000-0000-0000-0000-000000000002";

/// Dummy source-chain address (32 hex characters)
#[allow(dead_code)]
pub const DUMMY_SOURCE_ADDRESS: &str = "c0ffee0000000000000000000000cafe";

/// Dummy destination-chain address (0x-prefixed, 16 hex characters)
#[allow(dead_code)]
pub const DUMMY_DESTINATION_ADDRESS: &str = "0xdecafbad0badf00d";

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Builds a kit configuration with auto-bridge on and no allow-list.
pub fn build_test_kit_config() -> KitConfig {
    KitConfig {
        autobridge: true,
        allowed_tokens: Vec::new(),
        source_chain: SOURCE_CHAIN.to_string(),
        destination_chain: DESTINATION_CHAIN.to_string(),
    }
}

/// Builds an auth configuration with a valid dummy API key.
pub fn build_test_auth_config() -> AuthConfig {
    AuthConfig {
        api_key: DUMMY_API_KEY.to_string(),
        network: "testnet".to_string(),
        demo_email: DUMMY_EMAIL.to_string(),
        source_chain: SOURCE_CHAIN.to_string(),
        destination_chain: DESTINATION_CHAIN.to_string(),
    }
}

/// Builds a bridge configuration with fast timings and emission disabled.
///
/// Tests that want generated deposits override `deposit_probability`.
pub fn build_test_bridge_config() -> BridgeConfig {
    let mut tokens = HashMap::new();
    tokens.insert(
        SOURCE_CHAIN.to_string(),
        vec!["USDC".to_string(), "USDT".to_string(), "ETH".to_string()],
    );
    tokens.insert(
        DESTINATION_CHAIN.to_string(),
        vec!["USDC".to_string(), "USDT".to_string(), "ETH".to_string()],
    );

    BridgeConfig {
        source_chain: SOURCE_CHAIN.to_string(),
        destination_chain: DESTINATION_CHAIN.to_string(),
        polling_interval_ms: 5,
        deposit_probability: 0.0,
        min_deposit_amount: 1.0,
        max_deposit_amount: 100.0,
        relay_latency_ms: 0,
        tokens,
    }
}

/// Builds a complete configuration from the section builders above.
#[allow(dead_code)]
pub fn build_test_config() -> Config {
    Config {
        kit: build_test_kit_config(),
        auth: build_test_auth_config(),
        bridge: build_test_bridge_config(),
    }
}

// ============================================================================
// DEFAULT EVENT CREATORS
// ============================================================================

/// Creates a deposit event with the default token, amount, and hash.
pub fn create_default_deposit_event() -> DepositEvent {
    DepositEvent::new(DUMMY_TOKEN, DUMMY_AMOUNT, DUMMY_TX_HASH)
}

// ============================================================================
// MOCK PROVIDERS
// ============================================================================

/// Bridge provider driven by manual event injection.
///
/// `watch_deposits` records the kit's callback instead of spawning a watcher;
/// tests call [`inject`](ManualBridge::inject) to deliver events
/// deterministically and inspect the recorded relay requests afterwards.
pub struct ManualBridge {
    /// Reject every relay when set
    fail_relay: AtomicBool,
    /// Counter used to mint unique relay hashes
    relay_counter: AtomicUsize,
    /// Accepted relay requests in submission order
    relayed: Arc<RwLock<Vec<BridgeRequest>>>,
    /// Registered (callback, cancellation flag) pairs, one per subscription
    watchers: Arc<RwLock<Vec<(DepositCallback, Arc<AtomicBool>)>>>,
}

impl ManualBridge {
    pub fn new() -> Self {
        Self {
            fail_relay: AtomicBool::new(false),
            relay_counter: AtomicUsize::new(0),
            relayed: Arc::new(RwLock::new(Vec::new())),
            watchers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A bridge whose relay submissions are always rejected.
    #[allow(dead_code)]
    pub fn failing() -> Self {
        let bridge = Self::new();
        bridge.fail_relay.store(true, Ordering::SeqCst);
        bridge
    }

    /// Delivers an event to every live subscription, awaiting each handler
    /// chain so lifecycle effects are visible once this returns.
    pub async fn inject(&self, event: DepositEvent) {
        let watchers = self.watchers.read().await.clone();
        for (callback, cancelled) in watchers {
            if !cancelled.load(Ordering::SeqCst) {
                callback(event.clone()).await;
            }
        }
    }

    /// Returns the relay requests accepted so far.
    pub async fn relayed_requests(&self) -> Vec<BridgeRequest> {
        self.relayed.read().await.clone()
    }
}

#[async_trait]
impl BridgeProvider for ManualBridge {
    async fn initialize(&self) -> Result<(), KitError> {
        Ok(())
    }

    async fn relay(&self, request: &BridgeRequest) -> Result<String, KitError> {
        if self.fail_relay.load(Ordering::SeqCst) {
            return Err(KitError::Relay("injected relay failure".to_string()));
        }
        self.relayed.write().await.push(request.clone());
        let n = self.relay_counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("rly-test-{}", n))
    }

    async fn status(&self, tx_hash: &str) -> Result<BridgeStatus, KitError> {
        Ok(BridgeStatus {
            tx_hash: tx_hash.to_string(),
            source_chain: SOURCE_CHAIN.to_string(),
            destination_chain: DESTINATION_CHAIN.to_string(),
            state: BridgeState::Completed,
            error_detail: None,
        })
    }

    async fn watch_deposits(
        &self,
        _address: &str,
        on_event: DepositCallback,
    ) -> Result<DepositSubscription, KitError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.watchers
            .write()
            .await
            .push((on_event, Arc::clone(&cancelled)));
        Ok(DepositSubscription::new(cancelled, None))
    }

    async fn supported_tokens(&self) -> Result<HashMap<String, Vec<String>>, KitError> {
        Ok(build_test_bridge_config().tokens)
    }
}

/// Builds a kit around the given bridge with an initialized magic-link auth
/// provider.
#[allow(dead_code)]
pub async fn build_initialized_kit(bridge: Arc<ManualBridge>, kit_config: KitConfig) -> LiquidityKit {
    let auth = Arc::new(MagicLinkAuth::new(build_test_auth_config()));
    let kit = LiquidityKit::new(auth, bridge, kit_config);
    kit.initialize().await.expect("Failed to initialize kit");
    kit
}

// ============================================================================
// HANDLER RECORDERS
// ============================================================================

/// Builds lifecycle handlers that append one label per invocation
/// ("deposit", "initiated", "completed", "failed") to the returned log.
#[allow(dead_code)]
pub fn recording_handlers() -> (DepositHandlers, Arc<Mutex<Vec<String>>>) {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    fn record(log: &Arc<Mutex<Vec<String>>>, label: &str) {
        log.lock().expect("handler log poisoned").push(label.to_string());
    }

    let handlers = DepositHandlers {
        on_deposit: Some({
            let log = Arc::clone(&log);
            Arc::new(move |_event| record(&log, "deposit"))
        }),
        on_bridge_initiated: Some({
            let log = Arc::clone(&log);
            Arc::new(move |_event| record(&log, "initiated"))
        }),
        on_bridge_completed: Some({
            let log = Arc::clone(&log);
            Arc::new(move |_event| record(&log, "completed"))
        }),
        on_bridge_failed: Some({
            let log = Arc::clone(&log);
            Arc::new(move |_event, _err| record(&log, "failed"))
        }),
    };

    (handlers, log)
}

/// Snapshot of a recorded handler log.
#[allow(dead_code)]
pub fn log_entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().expect("handler log poisoned").clone()
}

/// Builds a deposit callback that collects delivered events.
#[allow(dead_code)]
pub fn collecting_callback() -> (DepositCallback, Arc<Mutex<Vec<DepositEvent>>>) {
    let events: Arc<Mutex<Vec<DepositEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let callback: DepositCallback = Arc::new(move |event| {
        let sink = Arc::clone(&sink);
        Box::pin(async move {
            sink.lock().expect("event sink poisoned").push(event);
        })
    });

    (callback, events)
}
