//! Liquidity Kit Demo
//!
//! A demo service that wires the bundled providers together: logs a demo user
//! in with the magic-link provider, watches the user's source address with
//! the simulated bridge, and logs every deposit lifecycle transition until
//! Ctrl-C.
//!
//! ## Overview
//!
//! 1. Initializes logging and tracing
//! 2. Loads configuration (TOML file or built-in demo defaults)
//! 3. Constructs and initializes the providers and the kit
//! 4. Logs the demo user in and subscribes to deposits
//! 5. Runs until shutdown

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use liquidity_kit::{Config, DepositHandlers, LiquidityKit, MagicLinkAuth, SimulatedBridge};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting Liquidity Kit demo");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Liquidity Kit demo");
        println!();
        println!("Usage: liquidity-kit [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  LIQUIDITY_KIT_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    // Check for custom config path
    let mut config_path = None;
    for (i, arg) in args.iter().enumerate() {
        if arg == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            break;
        }
    }
    if let Some(path) = config_path {
        std::env::set_var("LIQUIDITY_KIT_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    }

    // Load configuration, falling back to built-in demo defaults when no
    // file exists at the resolved path
    let config = if std::path::Path::new(&Config::path()).exists() {
        Config::load()?
    } else {
        info!(
            "No configuration file at '{}', using built-in demo defaults",
            Config::path()
        );
        Config::default()
    };

    // Construct providers and the kit; lifetimes are owned here
    let auth = Arc::new(MagicLinkAuth::new(config.auth.clone()));
    let bridge = Arc::new(SimulatedBridge::new(config.bridge.clone()));
    let kit = LiquidityKit::new(auth, bridge, config.kit.clone());

    kit.initialize().await?;
    info!("Providers initialized");

    let tokens = kit.supported_tokens().await?;
    for (chain, symbols) in &tokens {
        info!("Bridgeable on {}: {}", chain, symbols.join(", "));
    }

    // Log the demo user in; deposits on their source address will be relayed
    // to their destination address
    let identity = kit.login(&config.auth.demo_email).await?;
    info!(
        "Logged in {} (id {}): source {} -> destination {}",
        config.auth.demo_email, identity.id, identity.addresses.source, identity.addresses.destination
    );

    let handlers = DepositHandlers {
        on_deposit: Some(Arc::new(|event| {
            info!(
                "Deposit detected: {} {} ({})",
                event.amount, event.token_symbol, event.tx_hash
            );
        })),
        on_bridge_initiated: Some(Arc::new(|event| {
            info!("Bridge initiated for deposit {}", event.tx_hash);
        })),
        on_bridge_completed: Some(Arc::new(|event| {
            info!("Bridge completed for deposit {}", event.tx_hash);
        })),
        on_bridge_failed: Some(Arc::new(|event, err| {
            error!("Bridge failed for deposit {}: {}", event.tx_hash, err);
        })),
    };

    let subscription = kit
        .subscribe_deposits(&identity.addresses.source, handlers)
        .await?;
    info!("Watching {} for deposits, Ctrl-C to stop", identity.addresses.source);

    // Run until shutdown
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    subscription.stop();
    kit.logout().await;

    info!("Shutdown complete");
    Ok(())
}
