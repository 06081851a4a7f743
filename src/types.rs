//! Core data model shared by providers and the kit.
//!
//! Addresses, identifiers, and token amounts are carried as strings. Amounts
//! in particular stay decimal-as-string end to end; they are validated as
//! decimal literals but never parsed into a binary float, so no precision is
//! lost between detection and relay.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTITY
// ============================================================================

/// Pair of chain addresses derived for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAddresses {
    /// Address watched for deposits on the source chain
    pub source: String,
    /// Address receiving relayed funds on the destination chain
    pub destination: String,
}

/// An authenticated user identity.
///
/// Created on first successful login and immutable from then on. The `id` is
/// derived deterministically from the external identifier, so the same email
/// resolves to the same identity across sessions. The identity provider owns
/// the current identity; the kit only caches a transient reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier derived from the external identifier
    pub id: String,
    /// Email shown to the user, if the backing system returned one
    pub display_email: Option<String>,
    /// Derived source/destination chain addresses
    pub addresses: ChainAddresses,
    /// Opaque provider metadata (provider tag, network, and similar)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

// ============================================================================
// DEPOSITS AND BRIDGING
// ============================================================================

/// An observed incoming-funds event on a watched address.
///
/// Immutable once emitted. Its identity for deduplication purposes is the
/// `(token_symbol, tx_hash)` pair; re-delivery of an already-seen pair must
/// not trigger a second bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    /// Symbol of the deposited token
    pub token_symbol: String,
    /// Deposited amount as a decimal string
    pub amount: String,
    /// Transaction hash of the deposit
    pub tx_hash: String,
    /// Epoch milliseconds when the deposit was detected
    pub detected_at_ms: i64,
}

impl DepositEvent {
    /// Creates a deposit event stamped with the current detection time.
    pub fn new(token_symbol: &str, amount: &str, tx_hash: &str) -> Self {
        Self {
            token_symbol: token_symbol.to_string(),
            amount: amount.to_string(),
            tx_hash: tx_hash.to_string(),
            detected_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Returns the `(token_symbol, tx_hash)` pair identifying this event
    /// for deduplication.
    pub fn dedup_key(&self) -> (String, String) {
        (self.token_symbol.clone(), self.tx_hash.clone())
    }
}

/// Parameters for relaying funds between chains.
///
/// Built by the kit from a [`DepositEvent`] plus the current identity's
/// destination address, or supplied directly for manual bridging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    /// Chain the funds are leaving
    pub source_chain: String,
    /// Chain the funds are arriving on
    pub destination_chain: String,
    /// Address holding the funds on the source chain
    pub source_address: String,
    /// Address receiving the funds on the destination chain
    pub destination_address: String,
    /// Symbol of the token being moved
    pub token_symbol: String,
    /// Amount as a decimal string
    pub amount: String,
}

/// Submission state of a bridge transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    /// Accepted but not yet independently confirmed
    Pending,
    /// Terminal: confirmed complete
    Completed,
    /// Terminal: confirmed failed
    Failed,
}

/// Status of a bridge transaction.
///
/// Status is monotonic: once a terminal state (`Completed` or `Failed`) is
/// reported for a transaction hash, subsequent queries return the same
/// terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Transaction hash returned by the relay submission
    pub tx_hash: String,
    /// Chain the funds left
    pub source_chain: String,
    /// Chain the funds arrived on
    pub destination_chain: String,
    /// Current submission state
    pub state: BridgeState,
    /// Failure detail when `state` is `Failed`
    pub error_detail: Option<String>,
}

// ============================================================================
// AMOUNT VALIDATION
// ============================================================================

/// Checks that a string is a non-negative decimal literal.
///
/// Accepts digits with at most one interior decimal point (`"10"`, `"10.00"`,
/// `"0.5"`). Rejects signs, exponents, separators, and leading or trailing
/// points. Validation never parses the value into a float.
pub fn is_decimal_amount(amount: &str) -> bool {
    if amount.is_empty() || amount.starts_with('.') || amount.ends_with('.') {
        return false;
    }
    let mut dots = 0usize;
    for c in amount.chars() {
        match c {
            '0'..='9' => {}
            '.' => dots += 1,
            _ => return false,
        }
    }
    dots <= 1
}

/// Checks that a string is a decimal literal strictly greater than zero.
pub fn is_positive_amount(amount: &str) -> bool {
    is_decimal_amount(amount) && amount.chars().any(|c| ('1'..='9').contains(&c))
}
