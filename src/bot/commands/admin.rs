//! Admin Discord commands - `/admin overview|withdrawals|mark_paid|influencers|...`.
//!
//! Every subcommand runs the admission guard for its route; the allow-list decides.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            COLOR_INFO, COLOR_SUCCESS, Context,
            handlers::{autocomplete, guard},
        },
        core::{
            access::Route,
            admin,
            format::{format_brl, format_datetime},
            influencer::{self, MetricsUpdate, NewInfluencer, ProfileUpdate},
            sale::{self, NewSale},
            user,
        },
        entities::{WithdrawalStatus, influencer as influencer_entity, withdrawal_request},
        errors::{Error, Result},
    };
    use chrono::{FixedOffset, Utc};
    use poise::serenity_prelude as serenity;

    /// Rows shown in the withdrawal console and influencer list
    const LIST_LIMIT: usize = 20;

    fn status_label(status: WithdrawalStatus) -> &'static str {
        match status {
            WithdrawalStatus::Pending => "⏳ pendente",
            WithdrawalStatus::Paid => "✅ pago",
            WithdrawalStatus::Canceled => "✖️ cancelado",
        }
    }

    fn console_embed(
        requests: &[withdrawal_request::Model],
        offset: FixedOffset,
    ) -> serenity::CreateEmbed {
        let fields: Vec<(String, String, bool)> = requests
            .iter()
            .take(LIST_LIMIT)
            .map(|r| {
                let mut value = format!(
                    "{} • {} • chave: {}\ncriado: {} • prazo: {}",
                    r.method,
                    status_label(r.status),
                    r.pix_key.as_deref().unwrap_or("—"),
                    format_datetime(Some(r.created_at), offset),
                    format_datetime(r.deadline_at, offset),
                );
                if r.can_mark_paid() {
                    value.push_str(&format!("\n`/admin mark_paid {}`", r.id));
                } else if r.paid_at.is_some() {
                    value.push_str(&format!("\npago em {}", format_datetime(r.paid_at, offset)));
                }
                (format!("{} • {}", format_brl(r.amount), r.id), value, false)
            })
            .collect();

        let pending = requests
            .iter()
            .filter(|r| r.status == WithdrawalStatus::Pending)
            .count();
        serenity::CreateEmbed::default()
            .title("Solicitações de saque")
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} solicitação(ões) • {pending} pendente(s)",
                requests.len()
            )))
            .color(COLOR_INFO)
    }

    async fn find_by_username(ctx: Context<'_>, username: &str) -> Result<Option<influencer_entity::Model>> {
        let found = influencer::get_influencer_by_username(&ctx.data().backend, username).await?;
        if found.is_none() {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ Influenciador '{username}' não encontrado."))
                    .ephemeral(true),
            )
            .await?;
        }
        Ok(found)
    }

    /// Replies with validation problems instead of failing the command.
    async fn reply_invalid(ctx: Context<'_>, error: Error) -> Result<()> {
        match error {
            Error::Validation { .. } | Error::InvalidAmount { .. } => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("⚠️ {error}"))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            other => Err(other),
        }
    }

    fn influencer_embed(title: &str, inf: &influencer_entity::Model) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title(title)
            .field("Nome", inf.display_name(), true)
            .field("Usuário", inf.username.as_str(), true)
            .field("Email", inf.email.as_str(), true)
            .field("Vendas (R$)", format_brl(inf.total_sales), true)
            .field("Comissões", format_brl(inf.total_commissions), true)
            .field("Pendente", format_brl(inf.pending_payment), true)
            .field("Cliques", inf.total_clicks.to_string(), true)
            .field("Nº de vendas", inf.total_sales_count.to_string(), true)
            .field(
                "Link",
                inf.affiliate_link.as_deref().unwrap_or("—"),
                false,
            )
            .color(COLOR_SUCCESS)
    }

    /// Parent command for the admin views.
    #[poise::command(
        slash_command,
        subcommands(
            "admin_overview",
            "admin_withdrawals",
            "admin_mark_paid",
            "admin_influencers",
            "admin_edit_profile",
            "admin_edit_metrics",
            "admin_add_sale",
            "admin_create_influencer"
        )
    )]
    pub async fn admin(ctx: Context<'_>) -> Result<()> {
        let help_text = "Painel administrativo. Subcomandos:\n\
            `/admin overview` - Números gerais\n\
            `/admin withdrawals` - Solicitações de saque\n\
            `/admin mark_paid` - Marca um saque como pago\n\
            `/admin influencers` - Lista de influenciadores\n\
            `/admin edit_profile` - Edita nome, usuário e link\n\
            `/admin edit_metrics` - Edita números financeiros\n\
            `/admin add_sale` - Registra uma venda\n\
            `/admin create_influencer` - Cria um perfil de influenciador";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows revenue, paid commissions, active influencers and pending withdrawals.
    #[poise::command(slash_command, rename = "overview")]
    pub async fn admin_overview(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::Admin).await?.is_none() {
            return Ok(());
        }
        let overview = admin::admin_overview(&ctx.data().backend, Utc::now()).await?;

        let embed = serenity::CreateEmbed::default()
            .title("Visão geral")
            .field("Receita total", format_brl(overview.total_revenue), true)
            .field(
                "Comissões pagas",
                format_brl(overview.total_commissions_paid),
                true,
            )
            .field(
                format!("Ativos ({} dias)", admin::ACTIVE_WINDOW_DAYS),
                overview.active_influencers.to_string(),
                true,
            )
            .field(
                "Saques pendentes",
                overview.pending_withdrawals.to_string(),
                true,
            )
            .color(COLOR_INFO);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Lists withdrawal requests, newest first.
    #[poise::command(slash_command, rename = "withdrawals")]
    pub async fn admin_withdrawals(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::AdminFinancial).await?.is_none() {
            return Ok(());
        }
        let data = ctx.data();
        let requests = admin::withdrawal_console(&data.backend).await?;
        if requests.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("Nenhuma solicitação de saque.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let embed = console_embed(&requests, data.policy.hours.offset());
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Marks a pending withdrawal as paid.
    #[poise::command(slash_command, rename = "mark_paid")]
    pub async fn admin_mark_paid(
        ctx: Context<'_>,
        #[description = "ID da solicitação"]
        #[autocomplete = "autocomplete::autocomplete_pending_withdrawal"]
        id: String,
    ) -> Result<()> {
        if guard::require(ctx, Route::AdminFinancial).await?.is_none() {
            return Ok(());
        }
        let data = ctx.data();
        ctx.defer_ephemeral().await?;

        let requests = match admin::mark_paid_and_refetch(&data.backend, id.trim(), Utc::now()).await {
            Ok(requests) => requests,
            Err(Error::NotFound { .. }) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ Solicitação '{id}' não encontrada."))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(Error::WithdrawalNotPending { status, .. }) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!(
                            "⚠️ A solicitação '{id}' está {}; só saques pendentes podem ser pagos.",
                            status_label(status)
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let embed = console_embed(&requests, data.policy.hours.offset());
        ctx.send(
            poise::CreateReply::default()
                .content(format!("✅ Saque {id} marcado como pago."))
                .embed(embed)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Lists influencers by name.
    #[poise::command(slash_command, rename = "influencers")]
    pub async fn admin_influencers(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::AdminInfluencers).await?.is_none() {
            return Ok(());
        }
        let influencers = influencer::list_influencers(&ctx.data().backend).await?;
        if influencers.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("Nenhum influenciador cadastrado. Use `/admin create_influencer`.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = influencers
            .iter()
            .take(LIST_LIMIT)
            .map(|inf| {
                (
                    format!("{} (@{})", inf.display_name(), inf.username),
                    format!(
                        "Vendas: {} • Comissões: {} • Pendente: {}",
                        inf.total_sales_count,
                        format_brl(inf.total_commissions),
                        format_brl(inf.pending_payment)
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("Influenciadores")
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} cadastrado(s)",
                influencers.len()
            )))
            .color(COLOR_INFO);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Edits an influencer's name, username or affiliate link.
    #[poise::command(slash_command, rename = "edit_profile")]
    pub async fn admin_edit_profile(
        ctx: Context<'_>,
        #[description = "Usuário do influenciador"]
        #[autocomplete = "autocomplete::autocomplete_influencer"]
        username: String,
        #[description = "Nome completo (vazio para limpar)"] full_name: Option<String>,
        #[description = "Novo usuário"] new_username: Option<String>,
        #[description = "Link de afiliado (vazio para limpar)"] affiliate_link: Option<String>,
    ) -> Result<()> {
        if guard::require(ctx, Route::AdminInfluencers).await?.is_none() {
            return Ok(());
        }
        let Some(target) = find_by_username(ctx, &username).await? else {
            return Ok(());
        };

        let update = ProfileUpdate {
            full_name,
            username: new_username,
            affiliate_link,
        };
        match influencer::update_profile(&ctx.data().backend, &target.id, update).await {
            Ok(updated) => {
                tracing::info!(influencer_id = %updated.id, admin = %ctx.author().id, "Updated influencer profile");
                ctx.send(
                    poise::CreateReply::default()
                        .embed(influencer_embed("Perfil atualizado", &updated))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            Err(e) => reply_invalid(ctx, e).await,
        }
    }

    /// Edits an influencer's financial figures.
    #[poise::command(slash_command, rename = "edit_metrics")]
    pub async fn admin_edit_metrics(
        ctx: Context<'_>,
        #[description = "Usuário do influenciador"]
        #[autocomplete = "autocomplete::autocomplete_influencer"]
        username: String,
        #[description = "Link de afiliado"] affiliate_link: Option<String>,
        #[description = "Saldo pendente (R$)"] pending_payment: Option<f64>,
        #[description = "Total de vendas (R$)"] total_sales: Option<f64>,
        #[description = "Total de comissões (R$)"] total_commissions: Option<f64>,
        #[description = "Total de cliques"] total_clicks: Option<i64>,
        #[description = "Número de vendas"] total_sales_count: Option<i64>,
    ) -> Result<()> {
        if guard::require(ctx, Route::AdminInfluencers).await?.is_none() {
            return Ok(());
        }
        let Some(target) = find_by_username(ctx, &username).await? else {
            return Ok(());
        };

        let update = MetricsUpdate {
            affiliate_link,
            pending_payment,
            total_sales,
            total_commissions,
            total_clicks,
            total_sales_count,
        };
        match influencer::update_metrics(&ctx.data().backend, &target.id, update).await {
            Ok(updated) => {
                tracing::info!(influencer_id = %updated.id, admin = %ctx.author().id, "Updated influencer metrics");
                ctx.send(
                    poise::CreateReply::default()
                        .embed(influencer_embed("Dados financeiros atualizados", &updated))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            Err(e) => reply_invalid(ctx, e).await,
        }
    }

    /// Registers a sale for an influencer.
    #[poise::command(slash_command, rename = "add_sale")]
    pub async fn admin_add_sale(
        ctx: Context<'_>,
        #[description = "Usuário do influenciador"]
        #[autocomplete = "autocomplete::autocomplete_influencer"]
        username: String,
        #[description = "Produto vendido"] product: String,
        #[description = "Cliente"] customer: String,
        #[description = "Comissão em R$ (padrão 0)"] commission: Option<f64>,
    ) -> Result<()> {
        if guard::require(ctx, Route::AdminInfluencers).await?.is_none() {
            return Ok(());
        }
        let Some(target) = find_by_username(ctx, &username).await? else {
            return Ok(());
        };

        let new_sale = NewSale {
            influencer_id: target.id.clone(),
            product,
            customer,
            commission: commission.unwrap_or(0.0),
            date: None,
        };
        match sale::create_sale(&ctx.data().backend, new_sale).await {
            Ok(created) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!(
                            "✅ Venda registrada para {}: {} • valor estimado {} • comissão {}",
                            target.display_name(),
                            created.product,
                            format_brl(created.value),
                            format_brl(created.commission)
                        ))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            Err(e) => reply_invalid(ctx, e).await,
        }
    }

    /// Creates an influencer profile for an existing account.
    #[poise::command(slash_command, rename = "create_influencer")]
    pub async fn admin_create_influencer(
        ctx: Context<'_>,
        #[description = "Email da conta"] email: String,
        #[description = "Usuário público"] username: String,
        #[description = "ID da conta (padrão: procurado pelo email)"] user_id: Option<String>,
        #[description = "Nome completo"] full_name: Option<String>,
        #[description = "Link de afiliado"] affiliate_link: Option<String>,
    ) -> Result<()> {
        if guard::require(ctx, Route::AdminInfluencers).await?.is_none() {
            return Ok(());
        }
        let db = &ctx.data().backend;

        let id = match user_id {
            Some(id) => id,
            None => match user::get_user_by_email(db, &email).await? {
                Some(account) => account.id,
                None => {
                    ctx.send(
                        poise::CreateReply::default()
                            .content(format!(
                                "❌ Nenhuma conta encontrada para {email}. Informe o `user_id`."
                            ))
                            .ephemeral(true),
                    )
                    .await?;
                    return Ok(());
                }
            },
        };

        let new_influencer = NewInfluencer {
            id,
            email,
            username,
            full_name,
            affiliate_link,
        };
        match influencer::create_influencer(db, new_influencer).await {
            Ok(created) => {
                tracing::info!(influencer_id = %created.id, admin = %ctx.author().id, "Created influencer");
                ctx.send(
                    poise::CreateReply::default()
                        .embed(influencer_embed("Influenciador criado", &created))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            Err(e) => reply_invalid(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
