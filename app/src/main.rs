//! Starter demo binary
//!
//! Logs in against the configured backend and reports the resulting state.
//!
//! ```text
//! API_BASE_URL=http://localhost:3000 LOGIN_EMAIL=a@b.c LOGIN_PASSWORD=secret cargo run --bin starter
//! ```

use anyhow::Context;
use serde_json::Value;
use starter_app::presentation::PageLoader;
use starter_app::session::login_user;
use starter_app::{ClientConfig, RequestCoordinator, RequestData, build_store};
use starter_http::ReqwestTransport;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starter=info,starter_app=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::info!(base_url = ?config.base_url, timeout = ?config.timeout, "Starting");

    let store = build_store();
    let coordinator = RequestCoordinator::new(ReqwestTransport::new(), config);

    let loader = PageLoader::follow(store.subscribe(), |view| match view {
        Some(spinner) => tracing::info!(text = %spinner.text, "Page loader shown"),
        None => tracing::info!("Page loader hidden"),
    });

    let mut credentials = RequestData::new();
    credentials.insert(
        "email".to_string(),
        Value::String(std::env::var("LOGIN_EMAIL").context("LOGIN_EMAIL must be set")?),
    );
    credentials.insert(
        "password".to_string(),
        Value::String(std::env::var("LOGIN_PASSWORD").context("LOGIN_PASSWORD must be set")?),
    );

    match login_user(&store, &coordinator, credentials).await {
        Ok(session) => tracing::info!(user = %session.user, "Login succeeded"),
        Err(failure) => tracing::warn!(
            %failure,
            status = failure.status,
            network = failure.is_network_error,
            "Login failed"
        ),
    }

    let auth = store.state(|s| s.auth.clone()).await;
    println!("{}", serde_json::to_string_pretty(&auth)?);

    store.shutdown(Duration::from_secs(5)).await?;
    drop(store);
    loader.await?;

    Ok(())
}
