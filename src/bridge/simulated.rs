//! Simulated bridge provider.
//!
//! Demo/event-generator variant used to exercise the deposit lifecycle
//! without a chain connection. Deposits are emitted on a fixed polling
//! interval with a fixed per-tick probability, amounts drawn uniformly from a
//! configured range, and every event carries a freshly generated transaction
//! hash.
//!
//! Relay submissions complete synchronously: a request that passes validation
//! is recorded as `completed` the moment it is accepted. A production
//! provider would report `pending` here and flip to a terminal state only on
//! independent confirmation; the status contract already accommodates that.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bridge::{BridgeProvider, DepositCallback, DepositSubscription};
use crate::config::BridgeConfig;
use crate::error::KitError;
use crate::types::{is_positive_amount, BridgeRequest, BridgeState, BridgeStatus, DepositEvent};

/// Simulated bridge provider.
pub struct SimulatedBridge {
    /// Provider configuration
    config: BridgeConfig,
    /// Set once `initialize` has run
    initialized: AtomicBool,
    /// Status registry for accepted relays, keyed by transaction hash.
    /// Entries are terminal on insertion and never mutated afterwards, which
    /// is what keeps reported status monotonic.
    statuses: Arc<RwLock<HashMap<String, BridgeStatus>>>,
    /// Accepted relay requests in submission order.
    ///
    /// **WARNING**: This field is public ONLY for unit testing purposes.
    /// It should not be accessed directly in production code.
    #[doc(hidden)]
    pub relay_log: Arc<RwLock<Vec<BridgeRequest>>>,
}

impl SimulatedBridge {
    /// Creates a new simulated bridge from configuration.
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            initialized: AtomicBool::new(false),
            statuses: Arc::new(RwLock::new(HashMap::new())),
            relay_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn ensure_initialized(&self) -> Result<(), KitError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(KitError::ProviderUnavailable("simulated bridge"))
        }
    }

    /// Validates a relay request against the configured route and token sets.
    fn validate_request(&self, request: &BridgeRequest) -> Result<(), KitError> {
        let tokens = self
            .config
            .tokens
            .get(&request.source_chain)
            .ok_or_else(|| {
                KitError::Relay(format!(
                    "unsupported source chain '{}'",
                    request.source_chain
                ))
            })?;

        if !tokens.contains(&request.token_symbol) {
            return Err(KitError::Relay(format!(
                "token '{}' is not bridgeable on chain '{}'",
                request.token_symbol, request.source_chain
            )));
        }

        if !is_positive_amount(&request.amount) {
            return Err(KitError::Relay(format!(
                "amount '{}' is not a positive decimal",
                request.amount
            )));
        }

        if request.source_address == request.destination_address {
            return Err(KitError::Relay(
                "source and destination address are identical".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl BridgeProvider for SimulatedBridge {
    async fn initialize(&self) -> Result<(), KitError> {
        if self.config.polling_interval_ms == 0 {
            return Err(KitError::Initialization(
                "polling_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.config.deposit_probability) {
            return Err(KitError::Initialization(format!(
                "deposit_probability {} is outside [0.0, 1.0]",
                self.config.deposit_probability
            )));
        }
        if self.config.min_deposit_amount < 0.0
            || self.config.min_deposit_amount >= self.config.max_deposit_amount
        {
            return Err(KitError::Initialization(format!(
                "deposit amount range [{}, {}) is empty or negative",
                self.config.min_deposit_amount, self.config.max_deposit_amount
            )));
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(
            "Simulated bridge initialized for route {} -> {}",
            self.config.source_chain, self.config.destination_chain
        );
        Ok(())
    }

    async fn relay(&self, request: &BridgeRequest) -> Result<String, KitError> {
        self.ensure_initialized()?;
        self.validate_request(request)?;

        // Simulated submission latency.
        tokio::time::sleep(Duration::from_millis(self.config.relay_latency_ms)).await;

        let tx_hash = format!("rly-{}", Uuid::new_v4());
        let status = BridgeStatus {
            tx_hash: tx_hash.clone(),
            source_chain: request.source_chain.clone(),
            destination_chain: request.destination_chain.clone(),
            state: BridgeState::Completed,
            error_detail: None,
        };

        self.statuses.write().await.insert(tx_hash.clone(), status);
        self.relay_log.write().await.push(request.clone());

        info!(
            "Relay accepted: {} {} from {} ({}) to {} ({}) as {}",
            request.amount,
            request.token_symbol,
            request.source_address,
            request.source_chain,
            request.destination_address,
            request.destination_chain,
            tx_hash
        );

        Ok(tx_hash)
    }

    async fn status(&self, tx_hash: &str) -> Result<BridgeStatus, KitError> {
        self.ensure_initialized()?;

        self.statuses
            .read()
            .await
            .get(tx_hash)
            .cloned()
            .ok_or_else(|| KitError::Relay(format!("unknown transaction hash '{}'", tx_hash)))
    }

    async fn watch_deposits(
        &self,
        address: &str,
        on_event: DepositCallback,
    ) -> Result<DepositSubscription, KitError> {
        self.ensure_initialized()?;

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let config = self.config.clone();
        let address = address.to_string();

        info!(
            "Watching {} for deposits every {}ms",
            address, config.polling_interval_ms
        );

        let watcher = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_millis(config.polling_interval_ms));

            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }

                let Some(tokens) = config.tokens.get(&config.source_chain) else {
                    warn!(
                        "No tokens configured for chain '{}', stopping deposit watcher",
                        config.source_chain
                    );
                    break;
                };
                if tokens.is_empty() {
                    warn!(
                        "Empty token set for chain '{}', stopping deposit watcher",
                        config.source_chain
                    );
                    break;
                }

                // Scoped so the thread-local generator is not held across an
                // await point.
                let event = {
                    let mut rng = rand::thread_rng();
                    if rng.gen::<f64>() < config.deposit_probability {
                        let token = &tokens[rng.gen_range(0..tokens.len())];
                        let amount = rng
                            .gen_range(config.min_deposit_amount..config.max_deposit_amount);
                        Some(DepositEvent::new(
                            token,
                            &format!("{:.2}", amount),
                            &format!("dep-{}", Uuid::new_v4()),
                        ))
                    } else {
                        None
                    }
                };

                let Some(event) = event else { continue };

                info!(
                    "Deposit detected on {}: {} {} ({})",
                    address, event.amount, event.token_symbol, event.tx_hash
                );

                if flag.load(Ordering::SeqCst) {
                    break;
                }
                // Own task per event so a slow handler never delays the next
                // tick.
                tokio::spawn(on_event(event));
            }
        });

        Ok(DepositSubscription::new(
            cancelled,
            Some(watcher.abort_handle()),
        ))
    }

    async fn supported_tokens(&self) -> Result<HashMap<String, Vec<String>>, KitError> {
        self.ensure_initialized()?;
        Ok(self.config.tokens.clone())
    }
}
