//! Curator admin console.
//!
//! Mounts one resource page (badges, avatar borders, VIP plans, redeem codes
//! or gacha items) and drives it from stdin.

#![forbid(unsafe_code)]

mod console_config;
mod console_notifier;
mod shell;

use std::sync::Arc;
use std::time::Duration;

use curator_application::{ResourceApi, ResourcePage, SessionAccessor};
use curator_core::{AppError, AppResult, Session};
use curator_domain::{
    AvatarBorderBinding, BadgeBinding, GachaItemBinding, RedeemCodeBinding, ResourceBinding,
    VipPlanBinding,
};
use curator_infrastructure::{FileSessionStorage, HttpResourceApi, InMemoryResourceApi};
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::console_config::{BackendConfig, ConsoleConfig, init_tracing};
use crate::console_notifier::ConsoleNotifier;

const RESOURCES: &str = "badges, avatar-borders, vip-plans, redeem-codes, gacha-items";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let resource = std::env::args().nth(1).unwrap_or_else(|| "badges".to_owned());

    match resource.as_str() {
        "badges" => run::<BadgeBinding>(&config).await,
        "avatar-borders" => run::<AvatarBorderBinding>(&config).await,
        "vip-plans" => run::<VipPlanBinding>(&config).await,
        "redeem-codes" => run::<RedeemCodeBinding>(&config).await,
        "gacha-items" => run::<GachaItemBinding>(&config).await,
        other => Err(AppError::Validation(format!(
            "unknown resource '{other}', expected one of: {RESOURCES}"
        ))),
    }
}

async fn run<B: ResourceBinding>(config: &ConsoleConfig) -> AppResult<()> {
    let api = build_api::<B>(config)?;
    let storage = Arc::new(FileSessionStorage::new(config.session_file.clone()));
    let session_file = storage.path().display().to_string();
    let session = SessionAccessor::new(storage);

    let current = session.session();
    if !current.as_ref().is_some_and(Session::is_authenticated) {
        warn!(
            session_file = session_file.as_str(),
            "no admin session found, requests will ask to re-authenticate"
        );
    }
    info!(
        resource = B::NAME,
        session_file = session_file.as_str(),
        role = current.as_ref().and_then(Session::role).unwrap_or("unknown"),
        "starting admin console"
    );

    let page = ResourcePage::<B>::mount(
        &session,
        api,
        Arc::new(ConsoleNotifier::new()),
        config.page_size,
    );
    // Load failures are reported by the notifier; the shell still starts.
    let _ = page.open().await;

    let result = shell::run(&page, BufReader::new(tokio::io::stdin())).await;
    page.unmount();
    result
}

fn build_api<B: ResourceBinding>(
    config: &ConsoleConfig,
) -> AppResult<Arc<dyn ResourceApi<B::Record>>> {
    match &config.backend {
        BackendConfig::Http { api_base_url } => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_seconds))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            Ok(Arc::new(HttpResourceApi::<B>::new(
                http_client,
                api_base_url.as_str(),
            )?))
        }
        BackendConfig::Memory => Ok(Arc::new(InMemoryResourceApi::<B>::new())),
    }
}
