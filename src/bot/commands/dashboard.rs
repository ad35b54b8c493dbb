//! Influencer dashboard commands - overview, sales history, payouts, link and support.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{COLOR_INFO, COLOR_SUCCESS, Context, handlers::guard},
        core::{
            access::Route,
            dashboard,
            format::{format_brl, format_datetime},
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Rows listed per history embed
    const HISTORY_LIMIT: usize = 15;

    /// Shows your sales, commissions and available balance.
    #[poise::command(slash_command)]
    pub async fn dashboard(ctx: Context<'_>) -> Result<()> {
        let Some(identity) = guard::require(ctx, Route::Dashboard).await? else {
            return Ok(());
        };
        let data = ctx.data();

        let overview =
            dashboard::influencer_overview(&data.backend, &identity.id, &data.policy, chrono::Utc::now())
                .await?;

        let withdraw_hint = if overview.withdrawals_open {
            "✅ Saques abertos agora: use `/withdraw start`.".to_string()
        } else {
            format!(
                "⏰ Saques disponíveis das {:02}:00 às {:02}:00.",
                data.policy.hours.open_hour(),
                data.policy.hours.close_hour()
            )
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("Olá, {}!", overview.display_name))
            .field("Vendas", overview.sales_count.to_string(), true)
            .field("Comissões", format_brl(overview.total_commissions), true)
            .field("Saldo disponível", format_brl(overview.available_balance), true)
            .field("Cliques", overview.clicks.to_string(), true)
            .field(
                "Link de afiliado",
                overview
                    .affiliate_link
                    .unwrap_or_else(|| "Ainda não configurado".to_string()),
                false,
            )
            .footer(serenity::CreateEmbedFooter::new(withdraw_hint))
            .color(COLOR_INFO);

        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Lists your sales, most recent first.
    #[poise::command(slash_command)]
    pub async fn sales(ctx: Context<'_>) -> Result<()> {
        let Some(identity) = guard::require(ctx, Route::Dashboard).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let offset = data.policy.hours.offset();

        let sales = dashboard::sales_history(&data.backend, &identity.id).await?;
        if sales.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("Nenhuma venda registrada ainda.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = sales
            .iter()
            .take(HISTORY_LIMIT)
            .map(|sale| {
                (
                    format!("{} • {}", sale.product, format_datetime(Some(sale.date), offset)),
                    format!(
                        "Cliente: {}\nValor: {} • Comissão: {}",
                        sale.customer,
                        format_brl(sale.value),
                        format_brl(sale.commission)
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("Histórico de vendas")
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} venda(s) no total",
                sales.len()
            )))
            .color(COLOR_INFO);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Lists your paid withdrawals.
    #[poise::command(slash_command)]
    pub async fn payouts(ctx: Context<'_>) -> Result<()> {
        let Some(identity) = guard::require(ctx, Route::Dashboard).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let offset = data.policy.hours.offset();

        let paid = dashboard::paid_withdrawals(&data.backend, &identity.id).await?;
        if paid.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("Nenhum saque pago ainda.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let lines: Vec<String> = paid
            .iter()
            .take(HISTORY_LIMIT)
            .map(|w| {
                format!(
                    "**{}** • {} • pago em {}",
                    format_brl(w.amount),
                    w.method,
                    format_datetime(w.paid_at, offset)
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("Saques pagos")
            .description(lines.join("\n"))
            .color(COLOR_SUCCESS);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows your affiliate link.
    #[poise::command(slash_command)]
    pub async fn link(ctx: Context<'_>) -> Result<()> {
        let Some(identity) = guard::require(ctx, Route::Dashboard).await? else {
            return Ok(());
        };
        let data = ctx.data();

        let overview =
            dashboard::influencer_overview(&data.backend, &identity.id, &data.policy, chrono::Utc::now())
                .await?;
        let content = overview.affiliate_link.map_or_else(
            || "Seu link de afiliado ainda não foi configurado. Fale com o suporte.".to_string(),
            |link| format!("🔗 Seu link de afiliado:\n{link}"),
        );
        ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Opens a WhatsApp chat with support.
    #[poise::command(slash_command)]
    pub async fn support(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::Dashboard).await?.is_none() {
            return Ok(());
        }
        let url = dashboard::support_link(&ctx.data().settings.support)?;

        let embed = serenity::CreateEmbed::default()
            .title("Atendimento via WhatsApp")
            .description(format!("[Abrir conversa com o suporte]({url})"))
            .color(COLOR_SUCCESS);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
