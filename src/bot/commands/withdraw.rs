//! Withdrawal wizard commands - `/withdraw start|method|pix|back|status`.
//!
//! The wizard state is loaded from the caller's local store at the start of every
//! subcommand and saved back after each successful step.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{COLOR_INFO, COLOR_SUCCESS, COLOR_WARNING, Context, handlers::guard},
        core::{
            access::Route,
            format::format_brl,
            withdraw::{self, WithdrawFlow, WithdrawStep},
        },
        entities::WithdrawalMethod,
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Methods listed in the method step
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum MethodChoice {
        #[name = "PIX"]
        Pix,
        #[name = "Transferência bancária"]
        BankTransfer,
    }

    impl From<MethodChoice> for WithdrawalMethod {
        fn from(choice: MethodChoice) -> Self {
            match choice {
                MethodChoice::Pix => Self::Pix,
                MethodChoice::BankTransfer => Self::BankTransfer,
            }
        }
    }

    const fn route_for(step: WithdrawStep) -> Route {
        match step {
            WithdrawStep::Start => Route::WithdrawStart,
            WithdrawStep::Method => Route::WithdrawMethod,
            WithdrawStep::Pix => Route::WithdrawPix,
            WithdrawStep::Confirmed => Route::WithdrawConfirmed,
        }
    }

    /// User-facing text for errors that leave the wizard where it was.
    fn step_error_message(error: &Error) -> Option<String> {
        match error {
            Error::Validation { message } => Some(format!("⚠️ {message}")),
            Error::InvalidAmount { .. } => Some("⚠️ Informe um valor maior que zero.".to_string()),
            Error::OutsideBusinessHours { open, close } => Some(format!(
                "⏰ Saques só podem ser iniciados entre {open:02}:00 e {close:02}:00 (horário de Brasília)."
            )),
            Error::InvalidTransition { from, .. } => Some(format!(
                "⚠️ Esta etapa não está disponível agora (etapa atual: {from}). Use `/withdraw start` para recomeçar."
            )),
            _ => None,
        }
    }

    async fn reply_step_error(ctx: Context<'_>, error: Error) -> Result<()> {
        let Some(message) = step_error_message(&error) else {
            return Err(error);
        };
        tracing::debug!(user = %ctx.author().id, "Withdraw step refused: {error}");
        ctx.send(poise::CreateReply::default().content(message).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Parent command for the withdrawal wizard.
    #[poise::command(
        slash_command,
        subcommands(
            "withdraw_start",
            "withdraw_method",
            "withdraw_pix",
            "withdraw_back",
            "withdraw_status"
        )
    )]
    pub async fn withdraw(ctx: Context<'_>) -> Result<()> {
        let help_text = "Solicitação de saque. Etapas:\n\
            `/withdraw start` - Inicia um novo saque\n\
            `/withdraw method` - Escolhe o método (PIX)\n\
            `/withdraw pix` - Informa a chave PIX e o valor\n\
            `/withdraw back` - Volta uma etapa\n\
            `/withdraw status` - Mostra o saque confirmado";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Starts a new withdrawal (business hours only).
    #[poise::command(slash_command, rename = "start")]
    pub async fn withdraw_start(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::WithdrawStart).await?.is_none() {
            return Ok(());
        }
        let data = ctx.data();
        let store = data.store_for(ctx.author().id);

        let mut flow: WithdrawFlow = store.load_or_default().await?;
        if let Err(e) = flow.start(&data.policy, Utc::now()) {
            return reply_step_error(ctx, e).await;
        }
        store.save(&flow).await?;

        let embed = serenity::CreateEmbed::default()
            .title("Novo saque")
            .description("Escolha o método de recebimento com `/withdraw method`.")
            .field("Métodos disponíveis", "PIX", false)
            .color(COLOR_INFO);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Chooses how to receive the money.
    #[poise::command(slash_command, rename = "method")]
    pub async fn withdraw_method(
        ctx: Context<'_>,
        #[description = "Método de recebimento"] method: MethodChoice,
    ) -> Result<()> {
        if guard::require(ctx, Route::WithdrawMethod).await?.is_none() {
            return Ok(());
        }
        let data = ctx.data();
        let store = data.store_for(ctx.author().id);

        let mut flow: WithdrawFlow = store.load_or_default().await?;
        if let Err(e) = flow.choose_method(method.into()) {
            return reply_step_error(ctx, e).await;
        }
        store.save(&flow).await?;

        let minimum = if data.policy.min_amount > 0.0 {
            format!("Valor mínimo: {}.", format_brl(data.policy.min_amount))
        } else {
            String::new()
        };
        ctx.send(
            poise::CreateReply::default()
                .content(format!(
                    "Método PIX selecionado. Informe a chave e o valor com `/withdraw pix`. {minimum}"
                ))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Enters the PIX key and amount and confirms the withdrawal.
    #[poise::command(slash_command, rename = "pix")]
    pub async fn withdraw_pix(
        ctx: Context<'_>,
        #[description = "Chave PIX (CPF, email, telefone ou aleatória)"] key: String,
        #[description = "Valor em reais, por exemplo 150,00"] amount: String,
    ) -> Result<()> {
        let Some(identity) = guard::require(ctx, Route::WithdrawPix).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let store = data.store_for(ctx.author().id);
        let now = Utc::now();

        let mut flow: WithdrawFlow = store.load_or_default().await?;
        let outcome = match withdraw::submit_withdrawal(
            &data.backend,
            &mut flow,
            &data.policy,
            Some(identity.id),
            &key,
            &amount,
            now,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => return reply_step_error(ctx, e).await,
        };
        // The backend row may already exist, so the receipt goes out either way
        store.save_or_log(&flow).await;

        let notice = outcome.notice();
        let color = if outcome.is_committed() {
            COLOR_SUCCESS
        } else {
            COLOR_WARNING
        };
        let mut embed = serenity::CreateEmbed::default()
            .title("Saque confirmado")
            .field(notice.title, notice.description, false)
            .color(color);
        if let Some(receipt) = flow.receipt(now) {
            embed = embed.description(receipt);
        }
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Goes back one step, keeping what was typed.
    #[poise::command(slash_command, rename = "back")]
    pub async fn withdraw_back(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let store = data.store_for(ctx.author().id);
        let mut flow: WithdrawFlow = store.load_or_default().await?;

        if guard::require(ctx, route_for(flow.step)).await?.is_none() {
            return Ok(());
        }
        if let Err(e) = flow.back() {
            return reply_step_error(ctx, e).await;
        }
        store.save(&flow).await?;

        let next = match flow.step {
            WithdrawStep::Method => "Escolha o método com `/withdraw method`.",
            _ => "Use `/withdraw start` para iniciar um saque.",
        };
        ctx.send(poise::CreateReply::default().content(next).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows the confirmed withdrawal and the time left until the deadline.
    #[poise::command(slash_command, rename = "status")]
    pub async fn withdraw_status(ctx: Context<'_>) -> Result<()> {
        if guard::require(ctx, Route::WithdrawConfirmed).await?.is_none() {
            return Ok(());
        }
        let store = ctx.data().store_for(ctx.author().id);
        let flow: WithdrawFlow = store.load_or_default().await?;

        let Some(receipt) = flow.receipt(Utc::now()) else {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "Nenhum saque confirmado (etapa atual: {}). Use `/withdraw start`.",
                        flow.step
                    ))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        let mut embed = serenity::CreateEmbed::default()
            .title("Saque em andamento")
            .description(receipt)
            .color(COLOR_INFO);
        if let Some(id) = &flow.draft.last_request_id {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!("ID: {id}")));
        }
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
