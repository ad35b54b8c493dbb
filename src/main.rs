use affiliate_portal::{
    auth::HostedAuthClient,
    bot::{self, BotData},
    config::{admins::AdminAllowList, auth::AuthSettings, database, portal},
    core::withdraw::WithdrawPolicy,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Portal settings (business hours, withdrawal rules, support contact)
    let settings = portal::load_default_settings()
        .inspect_err(|e| error!("Failed to load portal settings: {}", e))?;
    let policy = WithdrawPolicy::from_settings(&settings)?;
    info!(
        min_amount = settings.withdraw.min_amount,
        open_hour = settings.business_hours.open_hour,
        close_hour = settings.business_hours.close_hour,
        "Loaded portal settings"
    );

    // 4. Databases: hosted backend plus local client state
    let backend = database::connect_backend()
        .await
        .inspect(|_| info!("Connected to backend database."))
        .inspect_err(|e| error!("Failed to connect to backend database: {}", e))?;
    let local = database::connect_local_state()
        .await
        .inspect(|_| info!("Local state database ready."))
        .inspect_err(|e| error!("Failed to open local state database: {}", e))?;

    // 5. Auth service and admin allow-list
    let auth = HostedAuthClient::new(
        AuthSettings::from_env().inspect_err(|e| error!("Auth settings missing: {}", e))?,
    );
    let admins = AdminAllowList::from_env();
    if admins.is_empty() {
        warn!("ADMIN_EMAILS is empty; admin commands will refuse everyone");
    } else {
        info!("Loaded {} admin email(s)", admins.len());
    }

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(backend, local, Arc::new(settings), policy, admins, auth);
    bot::run_bot(token, data).await?;

    Ok(())
}
