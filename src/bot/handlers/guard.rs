//! Runs route admission for a command and answers the caller when it is refused.

use crate::{
    bot::Context,
    core::{
        access::{self, Admission, Route},
        session::Identity,
    },
    errors::Result,
};

/// Returns the caller's identity, or replies with a sign-in hint and returns `None`.
pub async fn require(ctx: Context<'_>, route: Route) -> Result<Option<Identity>> {
    let data = ctx.data();
    let store = data.store_for(ctx.author().id);

    match access::admit(&store, &data.admins, route).await? {
        Admission::Admitted(identity) => Ok(Some(identity)),
        Admission::RedirectToLogin => {
            tracing::debug!(user = %ctx.author().id, ?route, "Redirecting to login");
            let hint = if route.is_admin_route() {
                "🔒 Acesso restrito a administradores. Use `/login` com uma conta de administrador."
            } else {
                "🔒 Você precisa entrar primeiro. Use `/login` para acessar o portal."
            };
            ctx.send(poise::CreateReply::default().content(hint).ephemeral(true))
                .await?;
            Ok(None)
        }
    }
}

/// Same check as [`require`] but silent, for autocomplete providers.
pub async fn is_admitted(ctx: Context<'_>, route: Route) -> bool {
    let data = ctx.data();
    let store = data.store_for(ctx.author().id);
    matches!(
        access::admit(&store, &data.admins, route).await,
        Ok(Admission::Admitted(_))
    )
}
