//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are only offered to callers admitted to the admin views; everyone else
//! gets an empty list.

use crate::{
    bot::{Context, handlers::guard},
    core::{access::Route, influencer, withdrawal},
    entities::WithdrawalStatus,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Suggests ids of pending withdrawal requests, newest first.
pub async fn autocomplete_pending_withdrawal(ctx: Context<'_>, partial: &str) -> Vec<String> {
    if !guard::is_admitted(ctx, Route::AdminFinancial).await {
        return Vec::new();
    }

    let Ok(pending) =
        withdrawal::list_withdrawal_requests_by_status(&ctx.data().backend, WithdrawalStatus::Pending)
            .await
    else {
        return Vec::new();
    };

    pending
        .into_iter()
        .map(|request| request.id)
        .filter(|id| id.starts_with(partial.trim()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests influencer usernames matching the partial input (case-insensitive).
pub async fn autocomplete_influencer(ctx: Context<'_>, partial: &str) -> Vec<String> {
    if !guard::is_admitted(ctx, Route::AdminInfluencers).await {
        return Vec::new();
    }

    let Ok(influencers) = influencer::list_influencers(&ctx.data().backend).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = influencers
        .into_iter()
        .filter(|inf| {
            inf.username.to_lowercase().contains(&partial_lower)
                || inf.display_name().to_lowercase().contains(&partial_lower)
        })
        .map(|inf| inf.username)
        .take(MAX_SUGGESTIONS)
        .collect();

    matching.sort();
    matching
}
