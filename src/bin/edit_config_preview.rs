//! Preview binary - prints the store-edit screen payload without running
//! the demo server.
//!
//! Usage:
//!   cargo run --bin edit-config-preview
//!
//! Optional environment variables:
//! - MULTILINGUAL_MIN_CORE_VERSION (defaults to no constraint)
//! - MULTILINGUAL_MIN_COMMERCE_VERSION (defaults to 4.11.0)

use std::sync::Arc;

use anyhow::Result;

use pos_language_bridge::config::Config;
use pos_language_bridge::hooks::Hooks;
use pos_language_bridge::host::LanguageInfo;
use pos_language_bridge::memory::MemoryHost;
use pos_language_bridge::LanguageBridge;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let host = Arc::new(MemoryHost::new());
    host.set_default_language("en");
    host.add_active_language(LanguageInfo::new("en", "English"));
    host.add_active_language(LanguageInfo::new("fr", "Français"));
    host.add_active_language(LanguageInfo::new("de", "Deutsch"));
    host.set_commerce_version("5.3.0");

    let bridge = LanguageBridge::new(
        config,
        Hooks::new(),
        host.clone(),
        host.clone(),
        host.clone(),
        host,
    );

    match bridge.store_edit_payload() {
        Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        None => println!("Store-edit payload unavailable: multilingual support is disabled."),
    }

    Ok(())
}
