//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the kit and the
//! bundled reference providers. Configuration includes the bridged chain
//! route, auto-bridge policy, identity provider credentials, and the deposit
//! simulator's timing settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all kit settings.
///
/// This structure holds configuration for:
/// - The kit itself (auto-bridge policy and chain route)
/// - The email-magic-link identity provider
/// - The simulated bridge provider (timing and token settings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kit-level configuration (auto-bridge policy, chain route)
    pub kit: KitConfig,
    /// Identity provider configuration
    pub auth: AuthConfig,
    /// Bridge provider configuration
    pub bridge: BridgeConfig,
}

/// Kit-level policy and routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitConfig {
    /// Whether detected deposits are bridged automatically
    #[serde(default = "default_autobridge")]
    pub autobridge: bool,
    /// Token symbols eligible for auto-bridging (empty = allow all)
    #[serde(default)]
    pub allowed_tokens: Vec<String>,
    /// Chain deposits arrive on
    pub source_chain: String,
    /// Chain relayed funds are delivered to
    pub destination_chain: String,
}

/// Configuration for the email-magic-link identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Publishable API key for the magic-link backend
    pub api_key: String,
    /// Network label recorded in identity metadata ("mainnet", "testnet")
    pub network: String,
    /// Email logged in by the demo binary
    pub demo_email: String,
    /// Chain name salting source address derivation
    pub source_chain: String,
    /// Chain name salting destination address derivation
    pub destination_chain: String,
}

/// Configuration for the simulated bridge provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Chain watched for deposits
    pub source_chain: String,
    /// Chain relayed funds are delivered to
    pub destination_chain: String,
    /// Polling interval of the deposit watcher in milliseconds
    pub polling_interval_ms: u64,
    /// Probability of emitting a deposit on each watcher tick (0.0 to 1.0)
    pub deposit_probability: f64,
    /// Lower bound of simulated deposit amounts
    pub min_deposit_amount: f64,
    /// Upper bound of simulated deposit amounts
    pub max_deposit_amount: f64,
    /// Simulated relay submission latency in milliseconds
    pub relay_latency_ms: u64,
    /// Bridgeable token symbols per chain name
    #[serde(default)]
    pub tokens: HashMap<String, Vec<String>>,
}

fn default_autobridge() -> bool {
    true
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration for internal consistency.
    ///
    /// This function ensures that:
    /// - The chain route is well formed (distinct source and destination)
    /// - The auth and bridge sections agree with the kit's chain route
    /// - Simulator timing settings are usable
    /// - The source chain has a token set and the allow-list is drawn from it
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A setting is out of range or inconsistent
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kit.source_chain == self.kit.destination_chain {
            anyhow::bail!(
                "Configuration error: source chain and destination chain are both '{}'. The bridge route must cross two distinct chains.",
                self.kit.source_chain
            );
        }

        if self.auth.source_chain != self.kit.source_chain
            || self.auth.destination_chain != self.kit.destination_chain
        {
            anyhow::bail!(
                "Configuration error: auth section derives addresses for {}->{} but the kit routes {}->{}. Address derivation must match the bridge route.",
                self.auth.source_chain,
                self.auth.destination_chain,
                self.kit.source_chain,
                self.kit.destination_chain
            );
        }

        if self.bridge.source_chain != self.kit.source_chain
            || self.bridge.destination_chain != self.kit.destination_chain
        {
            anyhow::bail!(
                "Configuration error: bridge section routes {}->{} but the kit routes {}->{}.",
                self.bridge.source_chain,
                self.bridge.destination_chain,
                self.kit.source_chain,
                self.kit.destination_chain
            );
        }

        if self.bridge.polling_interval_ms == 0 {
            anyhow::bail!("Configuration error: polling_interval_ms must be greater than zero.");
        }

        if !(0.0..=1.0).contains(&self.bridge.deposit_probability) {
            anyhow::bail!(
                "Configuration error: deposit_probability {} is outside [0.0, 1.0].",
                self.bridge.deposit_probability
            );
        }

        if self.bridge.min_deposit_amount < 0.0
            || self.bridge.min_deposit_amount >= self.bridge.max_deposit_amount
        {
            anyhow::bail!(
                "Configuration error: deposit amount range [{}, {}) is empty or negative.",
                self.bridge.min_deposit_amount,
                self.bridge.max_deposit_amount
            );
        }

        let source_tokens = match self.bridge.tokens.get(&self.bridge.source_chain) {
            Some(tokens) if !tokens.is_empty() => tokens,
            _ => anyhow::bail!(
                "Configuration error: no tokens configured for source chain '{}'.",
                self.bridge.source_chain
            ),
        };

        for token in &self.kit.allowed_tokens {
            if !source_tokens.contains(token) {
                anyhow::bail!(
                    "Configuration error: allowed token '{}' is not bridgeable on source chain '{}'.",
                    token,
                    self.bridge.source_chain
                );
            }
        }

        Ok(())
    }

    /// Resolves the configuration file path.
    ///
    /// Checks the `LIQUIDITY_KIT_CONFIG_PATH` environment variable first and
    /// falls back to `config/kit.toml`.
    pub fn path() -> String {
        std::env::var("LIQUIDITY_KIT_CONFIG_PATH").unwrap_or_else(|_| "config/kit.toml".to_string())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Resolves the config path (env override or `config/kit.toml`)
    /// 2. If the file exists, loads and parses the configuration
    /// 3. Validates the configuration
    /// 4. If it doesn't exist, returns an error asking the user to copy the
    ///    template
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - File missing, unparseable, or invalid
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::path();

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/kit.template.toml config/kit.toml\n\
                Then edit config/kit.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration suitable for the local demo.
    ///
    /// For real use the API key must be replaced and the token sets adjusted
    /// to the deployed bridge.
    pub fn default() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            "solana".to_string(),
            vec!["USDC".to_string(), "USDT".to_string(), "ETH".to_string()],
        );
        tokens.insert(
            "flow".to_string(),
            vec!["USDC".to_string(), "USDT".to_string(), "ETH".to_string()],
        );

        Self {
            kit: KitConfig {
                autobridge: true,
                allowed_tokens: Vec::new(),
                source_chain: "solana".to_string(),
                destination_chain: "flow".to_string(),
            },
            auth: AuthConfig {
                api_key: "pk_test_0000000000000000".to_string(),
                network: "testnet".to_string(),
                demo_email: "demo@example.com".to_string(),
                source_chain: "solana".to_string(),
                destination_chain: "flow".to_string(),
            },
            bridge: BridgeConfig {
                source_chain: "solana".to_string(),
                destination_chain: "flow".to_string(),
                polling_interval_ms: 10000,
                deposit_probability: 0.05,
                min_deposit_amount: 1.0,
                max_deposit_amount: 100.0,
                relay_latency_ms: 500,
                tokens,
            },
        }
    }
}
