//! Email-magic-link identity provider.
//!
//! Server-side variant modeled on a magic-link admin SDK: the backend is
//! keyed by a publishable API key and hands back a stable external user
//! identifier. Identity ids and chain addresses are derived deterministically
//! by hashing, so the same email always resolves to the same identity and
//! address pair.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::auth::AuthProvider;
use crate::config::AuthConfig;
use crate::error::KitError;
use crate::types::{ChainAddresses, Identity};

/// Provider tag recorded in identity metadata.
const PROVIDER_TAG: &str = "magic-link";

/// Email-magic-link authentication provider.
pub struct MagicLinkAuth {
    /// Provider configuration
    config: AuthConfig,
    /// Set once `initialize` has validated the configuration
    initialized: AtomicBool,
    /// Currently logged-in identity, if any
    current: RwLock<Option<Identity>>,
}

impl MagicLinkAuth {
    /// Creates a new provider from configuration.
    ///
    /// Construction never fails; configuration problems surface from
    /// `initialize`.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            initialized: AtomicBool::new(false),
            current: RwLock::new(None),
        }
    }

    /// Derives the stable user id for an external identifier.
    ///
    /// First 32 hex characters of `sha256(identifier)`.
    pub fn derive_user_id(identifier: &str) -> String {
        hash_hex(identifier)[..32].to_string()
    }

    /// Reinstalls a previously issued identity as the current session.
    ///
    /// Used when a caller persisted a login across process restarts.
    /// Addresses and metadata are re-derived from the id rather than trusted
    /// from the caller, so a tampered destination address cannot be smuggled
    /// back in.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)` - The restored identity, now current
    /// - `Err(KitError::ProviderUnavailable)` - Called before `initialize`
    pub async fn restore_session(
        &self,
        user_id: &str,
        display_email: Option<String>,
    ) -> Result<Identity, KitError> {
        self.ensure_initialized()?;

        let identity = self.build_identity(user_id, display_email);
        *self.current.write().await = Some(identity.clone());
        info!("Restored magic-link session for user {}", identity.id);
        Ok(identity)
    }

    fn ensure_initialized(&self) -> Result<(), KitError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(KitError::ProviderUnavailable("magic-link auth"))
        }
    }

    fn build_identity(&self, user_id: &str, display_email: Option<String>) -> Identity {
        let mut metadata = HashMap::new();
        metadata.insert("provider".to_string(), PROVIDER_TAG.to_string());
        metadata.insert("network".to_string(), self.config.network.clone());

        Identity {
            id: user_id.to_string(),
            display_email,
            addresses: self.derive_addresses(user_id),
            metadata,
        }
    }
}

#[async_trait]
impl AuthProvider for MagicLinkAuth {
    async fn initialize(&self) -> Result<(), KitError> {
        if self.config.api_key.trim().is_empty() {
            return Err(KitError::Initialization(
                "magic-link API key is missing".to_string(),
            ));
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(
            "Magic-link auth initialized for network '{}'",
            self.config.network
        );
        Ok(())
    }

    async fn login(&self, identifier: &str) -> Result<Identity, KitError> {
        self.ensure_initialized()?;

        // Stand-in for DID token validation against the magic-link backend.
        let identifier = identifier.trim();
        if identifier.is_empty() || !identifier.contains('@') {
            return Err(KitError::Authentication(format!(
                "identifier '{}' was rejected by the magic-link backend",
                identifier
            )));
        }

        let user_id = Self::derive_user_id(identifier);
        let identity = self.build_identity(&user_id, Some(identifier.to_string()));

        *self.current.write().await = Some(identity.clone());
        info!("Magic-link login succeeded for user {}", identity.id);
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), KitError> {
        // A real backend call would go here; failures must not reach the
        // caller, so they would be logged the same way.
        let cleared = self.current.write().await.take();
        match cleared {
            Some(identity) => info!("Logged out user {}", identity.id),
            None => warn!("Logout requested with no active session"),
        }
        Ok(())
    }

    async fn current_user(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    fn derive_addresses(&self, user_id: &str) -> ChainAddresses {
        let source_seed = hash_hex(&format!("{}-{}", user_id, self.config.source_chain));
        let destination_seed = hash_hex(&format!("{}-{}", user_id, self.config.destination_chain));

        ChainAddresses {
            source: source_seed[..32].to_string(),
            destination: format!("0x{}", &destination_seed[..16]),
        }
    }
}

/// Hex-encoded sha256 of a string.
fn hash_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
