//! Headless host for the CMMS session.
//!
//! Restores the stored session (signing in from `CMMS_EMAIL`/`CMMS_PASSWORD`
//! when there is none) and prints what the signed-in user may see.

use anyhow::Context;
use serde_json::json;

use cmms_desktop::{ClientConfig, Credentials, FileCredentialStore, HttpAuthApi, SessionProvider};
use cmms_navigation::{RouteTable, UiAction, build_menu, cmms_catalog, visible_actions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cmms_observability::init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let api = HttpAuthApi::new(&config).context("failed to build HTTP client")?;
    let credentials_path = config
        .credentials_path()
        .context("no data directory for the credential file; set CMMS_CREDENTIALS_PATH")?;
    tracing::info!(api_url = %config.api_url, path = ?credentials_path, "starting session");

    let session = SessionProvider::new(api, FileCredentialStore::new(credentials_path));
    let state = session.hydrate().await;

    if !state.is_authenticated() {
        let email = std::env::var("CMMS_EMAIL");
        let password = std::env::var("CMMS_PASSWORD");
        if let (Ok(email), Ok(password)) = (email, password) {
            let credentials =
                Credentials::new(email, password).context("invalid CMMS_EMAIL/CMMS_PASSWORD")?;
            if let Err(err) = session.login(&credentials).await {
                tracing::warn!(error = %err, "sign-in from environment failed");
            }
        }
    }

    let state = session.snapshot();
    let identity = state.identity();
    let routes = RouteTable::cmms().with_login_path(config.login_path.clone());
    let home = routes.evaluate(&state, "/");

    let report = json!({
        "session": state.name(),
        "role": state.role(),
        "home": home,
        "menu": build_menu(&cmms_catalog(), identity),
        "actions": visible_actions(identity, &UiAction::ALL),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    session.close();
    Ok(())
}
