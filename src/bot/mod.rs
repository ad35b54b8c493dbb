//! Bot layer - Discord-specific interface and command handlers
//!
//! Slash commands are the portal's views. Each command resolves the caller's local
//! store, asks [`crate::core::access`] whether the caller may see the view and then
//! renders core read models as embeds.

/// Discord command implementations (session, dashboard, withdraw, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, admission guard)
pub mod handlers;

use crate::{
    auth::HostedAuthClient,
    config::{admins::AdminAllowList, portal::PortalSettings},
    core::withdraw::WithdrawPolicy,
    errors::{Error, Result},
    store::LocalStore,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, instrument};

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Embed colour for regular replies
pub const COLOR_INFO: u32 = 0x0058_65F2;
/// Embed colour for confirmations
pub const COLOR_SUCCESS: u32 = 0x0057_F287;
/// Embed colour for warnings and failures
pub const COLOR_WARNING: u32 = 0x00FE_E75C;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Hosted backend with users, influencers, sales and withdrawal requests
    pub backend: DatabaseConnection,
    /// Local database holding per-user client state
    pub local: DatabaseConnection,
    pub settings: Arc<PortalSettings>,
    pub policy: WithdrawPolicy,
    pub admins: AdminAllowList,
    pub auth: HostedAuthClient,
}

impl BotData {
    #[must_use]
    pub fn new(
        backend: DatabaseConnection,
        local: DatabaseConnection,
        settings: Arc<PortalSettings>,
        policy: WithdrawPolicy,
        admins: AdminAllowList,
        auth: HostedAuthClient,
    ) -> Self {
        Self {
            backend,
            local,
            settings,
            policy,
            admins,
            auth,
        }
    }

    /// Local store scoped to a Discord user.
    #[must_use]
    pub fn store_for(&self, user: serenity::UserId) -> LocalStore<'_, DatabaseConnection> {
        LocalStore::new(&self.local, user.to_string())
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let content = match error {
                Error::Database(_) | Error::Http(_) => format!(
                    "❌ Não foi possível carregar os dados ({error}). Tente o comando novamente."
                ),
                _ => format!("❌ {error}"),
            };
            let reply = poise::CreateReply::default().content(content).ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework and runs the Discord client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::login(),
                commands::logout(),
                commands::whoami(),
                commands::dashboard(),
                commands::sales(),
                commands::payouts(),
                commands::support(),
                commands::link(),
                commands::withdraw(),
                commands::admin(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| tracing::error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| tracing::error!("Client error: {:?}", e))?;
    Ok(())
}
