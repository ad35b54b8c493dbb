//! General Discord commands - ping and help.
//! These commands need no session and touch no database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Lists the portal commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Portal de Afiliados**\n\
        Acompanhe suas vendas e solicite saques sem sair do Discord.\n\n\
        **Sessão**\n\
        • `/login <email> <senha> [perfil]` - Entra como influenciador ou administrador.\n\
        • `/logout` - Encerra a sessão.\n\
        • `/whoami` - Mostra quem está conectado.\n\n\
        **Influenciador**\n\
        • `/dashboard` - Resumo de vendas, comissões e saldo.\n\
        • `/sales` - Histórico de vendas.\n\
        • `/payouts` - Saques já pagos.\n\
        • `/link` - Seu link de afiliado.\n\
        • `/support` - Fale com o suporte pelo WhatsApp.\n\
        • `/withdraw start|method|pix|back|status` - Solicita um saque via PIX.\n\n\
        **Administrador**\n\
        • `/admin overview` - Números gerais do programa.\n\
        • `/admin withdrawals` - Solicitações de saque.\n\
        • `/admin mark_paid <id>` - Marca um saque como pago.\n\
        • `/admin influencers` - Lista de influenciadores.\n\
        • `/admin edit_profile`, `/admin edit_metrics`, `/admin add_sale`, `/admin create_influencer`";

        ctx.send(
            poise::CreateReply::default()
                .content(help_text)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
