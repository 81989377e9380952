//! Provision the initial administrator
//!
//! Reads `seed.admin_email`, `seed.admin_password` and
//! `seed.admin_full_name` (e.g. `KR__SEED__ADMIN_PASSWORD`) and creates the
//! account with the `ADMIN` role unless the email is already registered.

use anyhow::{bail, Result};
use keep_reading_backend::{
    config::{AppConfig, StorageBackend},
    db,
    state::AppState,
};
use keep_reading_shared::Role;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keep_reading_backend=info,keep_reading_seed=info".into()),
        )
        .init();

    let config = AppConfig::load()?;

    if config.storage.backend == StorageBackend::Memory {
        bail!("seeding requires storage.backend = postgres");
    }
    let Some(password) = config.seed.admin_password.clone() else {
        bail!("seed.admin_password is not set (KR__SEED__ADMIN_PASSWORD)");
    };

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let email = config.seed.admin_email.clone();
    let full_name = config.seed.admin_full_name.clone();
    let state = AppState::new(pool, config);

    let created = state
        .auth()
        .provision(&email, &password, &full_name, Role::Admin)
        .await
        .map_err(|e| anyhow::anyhow!("failed to provision admin: {}", e))?;

    if created {
        info!(email = %email, "Admin account created");
    } else {
        info!(email = %email, "Admin account already exists, nothing to do");
    }

    Ok(())
}
