//! Session Discord commands - `login`, `logout` and `whoami`.
//!
//! Replies are ephemeral: credentials and identities are only shown to the caller.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{COLOR_INFO, COLOR_SUCCESS, Context},
        core::{
            access::{self, Admission, Route},
            session,
        },
        entities::Role,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Profile picked at sign-in
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum Profile {
        #[name = "Influenciador"]
        Influencer,
        #[name = "Administrador"]
        Admin,
    }

    impl From<Profile> for Role {
        fn from(profile: Profile) -> Self {
            match profile {
                Profile::Influencer => Self::Influencer,
                Profile::Admin => Self::Admin,
            }
        }
    }

    /// Signs in to the portal with your email and password.
    #[poise::command(slash_command)]
    pub async fn login(
        ctx: Context<'_>,
        #[description = "Email da sua conta"] email: String,
        #[description = "Senha"] password: String,
        #[description = "Perfil (padrão: influenciador)"] profile: Option<Profile>,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let data = ctx.data();
        let store = data.store_for(ctx.author().id);
        let role = Role::from(profile.unwrap_or(Profile::Influencer));

        let identity = match session::sign_in(&store, &data.auth, &email, &password, role).await {
            Ok(identity) => identity,
            Err(e @ (Error::Validation { .. } | Error::Authentication { .. })) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ Falha no login: {e}"))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let description = match identity.role {
            Role::Influencer => "Use `/dashboard` para ver seus números.".to_string(),
            Role::Admin if data.admins.is_admin(Some(&identity.email)) => {
                "Use `/admin overview` para abrir o painel.".to_string()
            }
            Role::Admin => format!(
                "⚠️ {} não está na lista de administradores; o painel admin continuará bloqueado.",
                identity.email
            ),
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("Login realizado ({})", identity.role))
            .description(description)
            .color(COLOR_SUCCESS);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Signs out and forgets your session markers.
    #[poise::command(slash_command)]
    pub async fn logout(ctx: Context<'_>) -> Result<()> {
        let store = ctx.data().store_for(ctx.author().id);
        session::sign_out(&store).await?;
        ctx.send(
            poise::CreateReply::default()
                .content("👋 Sessão encerrada.")
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Shows who is signed in.
    #[poise::command(slash_command)]
    pub async fn whoami(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let store = data.store_for(ctx.author().id);

        let content = match access::admit(&store, &data.admins, Route::Landing).await? {
            Admission::Admitted(identity) => {
                let embed = serenity::CreateEmbed::default()
                    .title("Sessão atual")
                    .field("Email", identity.email, true)
                    .field("Perfil", identity.role.to_string(), true)
                    .color(COLOR_INFO);
                poise::CreateReply::default().embed(embed)
            }
            Admission::RedirectToLogin => poise::CreateReply::default()
                .content("Nenhuma sessão ativa. Use `/login` para entrar."),
        };
        ctx.send(content.ephemeral(true)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
