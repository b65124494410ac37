use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;

use pos_language_bridge::config::Config;
use pos_language_bridge::hooks::Hooks;
use pos_language_bridge::host::LanguageInfo;
use pos_language_bridge::memory::MemoryHost;
use pos_language_bridge::server::{self, AppState};
use pos_language_bridge::LanguageBridge;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pos_language_bridge=info".parse()?),
        )
        .init();

    info!("Starting point-of-sale language bridge demo host");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Wire the bridge to a seeded in-memory host
    let host = Arc::new(MemoryHost::new());
    seed_demo_data(&host);

    let bridge = Arc::new(LanguageBridge::new(
        config.clone(),
        Hooks::new(),
        host.clone(),
        host.clone(),
        host.clone(),
        host.clone(),
    ));

    let app = server::router(AppState {
        bridge,
        host,
    })
    .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Serving {} on {}", config.api_namespace, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// A bilingual catalog with two stores, enough to exercise every route.
fn seed_demo_data(host: &MemoryHost) {
    host.set_default_language("en");
    host.add_active_language(LanguageInfo::new("en", "English"));
    host.add_active_language(LanguageInfo::new("fr", "Français"));
    host.set_core_version("4.6.5");
    host.set_commerce_version("5.3.0");

    let chair_en = host.add_product("Dining chair", "en");
    let chair_fr = host.add_product("Chaise de salle à manger", "fr");
    host.add_product("Walnut desk", "en");

    host.add_variation(chair_en, "Dining chair - oak", "en");
    host.add_variation(chair_en, "Dining chair - ash", "en");
    host.add_variation(chair_fr, "Chaise - chêne", "fr");

    let main_street = host.add_store("Main Street");
    let paris = host.add_store("Paris Pop-up");
    host.set_store_meta(
        paris,
        pos_language_bridge::config::DEFAULT_STORE_LANGUAGE_META_KEY,
        "fr",
    );
    host.authorize_store(main_street);
    host.authorize_store(paris);

    info!("Seeded demo catalog: 3 products, 3 variations, 2 stores");
}
