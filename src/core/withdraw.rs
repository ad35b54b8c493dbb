//! Withdrawal wizard - the influencer's click-to-cash flow.
//!
//! The flow is a small ordered state machine:
//!
//! ```text
//! Start --start()--> Method --choose_method(PIX)--> Pix --confirm()--> Confirmed
//!   ^                  |                              |
//!   +------back()------+              Method <--back()+
//! ```
//!
//! The in-progress [`WithdrawFlow`] is saved to the user's local store after every step
//! so it survives restarts. Only `start()` clears it.
//!
//! Submission is best-effort: once the entry is valid the flow always reaches
//! `Confirmed`, and [`submit_withdrawal`] reports through [`SubmissionOutcome`] whether
//! the backend actually stored the request. The deadline kept in the draft is a display
//! hint; when the backend returns a record with a different `deadline_at`, that value
//! replaces the local one.

use crate::{
    config::portal::PortalSettings,
    core::{format, withdrawal},
    entities::{WithdrawalMethod, WithdrawalStatus, withdrawal_request},
    errors::{Error, Result},
    store::Persisted,
};
use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position in the wizard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawStep {
    #[default]
    Start,
    Method,
    Pix,
    Confirmed,
}

impl std::fmt::Display for WithdrawStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Method => f.write_str("method"),
            Self::Pix => f.write_str("pix"),
            Self::Confirmed => f.write_str("confirmed"),
        }
    }
}

/// Client-held state of a withdrawal that has not been durably confirmed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawDraft {
    #[serde(default)]
    pub method: Option<WithdrawalMethod>,
    #[serde(default)]
    pub pix_key: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Set by `confirm()`; never set before it
    #[serde(default, rename = "deadlineISO")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_request_id: Option<String>,
}

/// Draft plus the step the user is on. Persisted under `withdrawFlow`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WithdrawFlow {
    pub step: WithdrawStep,
    pub draft: WithdrawDraft,
}

impl Persisted for WithdrawFlow {
    const KEY: &'static str = "withdrawFlow";
    const VERSION: u32 = 1;

    fn migrate(version: u32, data: Value) -> Result<Value> {
        match version {
            // v0 stored the bare draft; the step was implied by the page being shown
            0 => {
                let draft: WithdrawDraft = serde_json::from_value(data)?;
                let step = if draft.deadline.is_some() {
                    WithdrawStep::Confirmed
                } else if draft.method.is_some() {
                    WithdrawStep::Pix
                } else {
                    WithdrawStep::Start
                };
                Ok(serde_json::to_value(Self { step, draft })?)
            }
            v => Err(Error::Config {
                message: format!("Unknown withdraw flow version {v}"),
            }),
        }
    }
}

/// Daily window, in a fixed reference timezone, during which withdrawals may start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusinessHours {
    open_hour: u32,
    close_hour: u32,
    offset: FixedOffset,
}

impl BusinessHours {
    #[must_use]
    pub const fn new(open_hour: u32, close_hour: u32, offset: FixedOffset) -> Self {
        Self {
            open_hour,
            close_hour,
            offset,
        }
    }

    /// True when `now` falls in `[open_hour, close_hour)` in the reference timezone.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let hour = now.with_timezone(&self.offset).hour();
        hour >= self.open_hour && hour < self.close_hour
    }

    #[must_use]
    pub const fn open_hour(&self) -> u32 {
        self.open_hour
    }

    #[must_use]
    pub const fn close_hour(&self) -> u32 {
        self.close_hour
    }

    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Rules applied by the wizard
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WithdrawPolicy {
    pub hours: BusinessHours,
    /// Smallest amount accepted; `0` disables the check
    pub min_amount: f64,
    /// Time between confirmation and the promised payout
    pub deadline: Duration,
}

impl WithdrawPolicy {
    pub fn from_settings(settings: &PortalSettings) -> Result<Self> {
        let hours = &settings.business_hours;
        Ok(Self {
            hours: BusinessHours::new(hours.open_hour, hours.close_hour, hours.offset()?),
            min_amount: settings.withdraw.min_amount,
            deadline: Duration::minutes(settings.withdraw.deadline_minutes),
        })
    }
}

/// A PIX key and amount that passed validation
#[derive(Clone, Debug, PartialEq)]
pub struct PixEntry {
    pix_key: String,
    amount: f64,
}

impl PixEntry {
    #[must_use]
    pub fn pix_key(&self) -> &str {
        &self.pix_key
    }

    #[must_use]
    pub const fn amount(&self) -> f64 {
        self.amount
    }
}

/// Parses an amount typed by a user. Accepts `150`, `150.00` and `150,00`.
fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates the PIX step. Any error means the confirm action stays disabled.
pub fn validate_entry(
    policy: &WithdrawPolicy,
    method: Option<WithdrawalMethod>,
    pix_key: &str,
    amount_text: &str,
) -> Result<PixEntry> {
    if method != Some(WithdrawalMethod::Pix) {
        return Err(Error::Validation {
            message: "Escolha o método PIX antes de informar a chave".to_string(),
        });
    }

    let pix_key = pix_key.trim();
    if pix_key.chars().count() <= 3 {
        return Err(Error::Validation {
            message: "A chave PIX deve ter mais de 3 caracteres".to_string(),
        });
    }

    let amount = parse_amount(amount_text).ok_or_else(|| Error::Validation {
        message: format!("'{}' não é um valor válido", amount_text.trim()),
    })?;
    if amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if amount < policy.min_amount {
        return Err(Error::Validation {
            message: format!("O valor mínimo para saque é {}", format::format_brl(policy.min_amount)),
        });
    }

    Ok(PixEntry {
        pix_key: pix_key.to_string(),
        amount,
    })
}

/// Whether the confirm action is enabled for this input.
#[must_use]
pub fn can_confirm(
    policy: &WithdrawPolicy,
    method: Option<WithdrawalMethod>,
    pix_key: &str,
    amount_text: &str,
) -> bool {
    validate_entry(policy, method, pix_key, amount_text).is_ok()
}

impl WithdrawFlow {
    fn expect_step(&self, expected: WithdrawStep, action: &'static str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.step,
                action,
            })
        }
    }

    /// Start → Method. Clears any previous draft. Only allowed inside business hours;
    /// outside them nothing changes.
    pub fn start(&mut self, policy: &WithdrawPolicy, now: DateTime<Utc>) -> Result<()> {
        if !policy.hours.contains(now) {
            return Err(Error::OutsideBusinessHours {
                open: policy.hours.open_hour(),
                close: policy.hours.close_hour(),
            });
        }
        *self = Self {
            step: WithdrawStep::Method,
            draft: WithdrawDraft::default(),
        };
        Ok(())
    }

    /// Method → Pix. PIX is the only method offered.
    pub fn choose_method(&mut self, method: WithdrawalMethod) -> Result<()> {
        self.expect_step(WithdrawStep::Method, "choose a method")?;
        if method != WithdrawalMethod::Pix {
            return Err(Error::Validation {
                message: format!("Método {method} não está disponível"),
            });
        }
        self.draft.method = Some(method);
        self.step = WithdrawStep::Pix;
        Ok(())
    }

    /// Method → Start, Pix → Method. The draft is kept as is.
    pub fn back(&mut self) -> Result<()> {
        self.step = match self.step {
            WithdrawStep::Method => WithdrawStep::Start,
            WithdrawStep::Pix => WithdrawStep::Method,
            from => {
                return Err(Error::InvalidTransition {
                    from,
                    action: "go back",
                });
            }
        };
        Ok(())
    }

    /// Pix → Confirmed. Stores the entry and sets the local deadline to
    /// `now + policy.deadline`, which is returned.
    pub fn confirm(
        &mut self,
        entry: &PixEntry,
        policy: &WithdrawPolicy,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        self.expect_step(WithdrawStep::Pix, "confirm")?;
        let deadline = now + policy.deadline;
        self.draft.pix_key = entry.pix_key.clone();
        self.draft.amount = Some(entry.amount);
        self.draft.deadline = Some(deadline);
        self.step = WithdrawStep::Confirmed;
        Ok(deadline)
    }

    /// Folds the backend's answer into the draft.
    ///
    /// The stored `deadline_at` replaces the local deadline unless the two differ by less
    /// than a millisecond, which is only the backend's timestamp precision.
    pub fn record_outcome(&mut self, outcome: &SubmissionOutcome) {
        if let SubmissionOutcome::Committed { request } = outcome {
            self.draft.last_request_id = Some(request.id.clone());
            if let Some(stored) = request.deadline_at {
                let precision = Duration::milliseconds(1);
                let same_instant = self.draft.deadline.is_some_and(|local| {
                    let drift = stored - local;
                    drift > -precision && drift < precision
                });
                if !same_instant {
                    self.draft.deadline = Some(stored);
                }
            }
        }
    }

    /// Receipt shown on the Confirmed step, or `None` when nothing was confirmed.
    #[must_use]
    pub fn receipt(&self, now: DateTime<Utc>) -> Option<String> {
        let deadline = self.draft.deadline?;
        let method = self.draft.method.unwrap_or(WithdrawalMethod::Pix);
        Some(format!(
            "Método: {method} • Valor: R$ {:.2} • Chave: {}\nPrazo restante: {}",
            self.draft.amount.unwrap_or(0.0),
            self.draft.pix_key,
            format::format_countdown(deadline, now)
        ))
    }
}

/// Short user-facing message about a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Result of the best-effort backend write
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    /// The backend stored the request
    Committed {
        request: withdrawal_request::Model,
    },
    /// The flow advanced locally but the backend write failed
    AcceptedLocally { reason: String },
}

impl SubmissionOutcome {
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// The single notification the user gets about this submission.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Committed { request } => Notice {
                title: "Solicitação registrada".to_string(),
                description: format!("ID: {}", request.id),
            },
            Self::AcceptedLocally { .. } => Notice {
                title: "Não foi possível salvar no banco".to_string(),
                description: "O pedido seguiu por aqui para você não perder tempo. \
                              Se ele não aparecer no painel, fale com o suporte."
                    .to_string(),
            },
        }
    }
}

/// Validates the entry, confirms the flow and tries to store the request.
///
/// Validation failures return `Err` before anything changes and without a backend call.
/// Backend failures do not: the flow is already `Confirmed` and the outcome is
/// [`SubmissionOutcome::AcceptedLocally`].
pub async fn submit_withdrawal<C: ConnectionTrait>(
    db: &C,
    flow: &mut WithdrawFlow,
    policy: &WithdrawPolicy,
    user_id: Option<String>,
    pix_key: &str,
    amount_text: &str,
    now: DateTime<Utc>,
) -> Result<SubmissionOutcome> {
    flow.expect_step(WithdrawStep::Pix, "confirm")?;
    let entry = validate_entry(policy, flow.draft.method, pix_key, amount_text)?;
    flow.confirm(&entry, policy, now)?;

    let request = withdrawal::NewWithdrawalRequest {
        user_id,
        method: WithdrawalMethod::Pix,
        amount: entry.amount,
        pix_key: Some(entry.pix_key.clone()),
        status: Some(WithdrawalStatus::Pending),
        deadline_at: Some(now + policy.deadline),
    };

    let outcome = match withdrawal::create_withdrawal_request(db, request, now).await {
        Ok(request) => {
            tracing::info!(withdrawal_id = %request.id, amount = request.amount, "Withdrawal request stored");
            SubmissionOutcome::Committed { request }
        }
        Err(e) => {
            tracing::warn!("Failed to store withdrawal request, continuing locally: {e}");
            SubmissionOutcome::AcceptedLocally {
                reason: e.to_string(),
            }
        }
    };

    flow.record_outcome(&outcome);
    Ok(outcome)
}
