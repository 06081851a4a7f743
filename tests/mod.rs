//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_initialized_kit, build_test_auth_config, build_test_bridge_config, build_test_config,
    build_test_kit_config, collecting_callback, create_default_deposit_event, log_entries,
    recording_handlers, ManualBridge, DESTINATION_CHAIN, DUMMY_AMOUNT, DUMMY_API_KEY, DUMMY_EMAIL,
    DUMMY_EMAIL_ALT, DUMMY_DESTINATION_ADDRESS, DUMMY_SOURCE_ADDRESS, DUMMY_TOKEN,
    DUMMY_TOKEN_UNLISTED, DUMMY_TX_HASH, DUMMY_TX_HASH_ALT, SOURCE_CHAIN,
};
