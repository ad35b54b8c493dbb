//! Entity module - `SeaORM` definitions for the backend tables and the local state table.
//! Backend entities mirror the hosted collections (`users`, `influencers`, `sales`,
//! `withdrawal_requests`); `client_state` lives in the local store only.

pub mod client_state;
pub mod influencer;
pub mod sale;
pub mod user;
pub mod withdrawal_request;

// Re-export specific types to avoid conflicts
pub use client_state::{
    Column as ClientStateColumn, Entity as ClientState, Model as ClientStateModel,
};
pub use influencer::{Column as InfluencerColumn, Entity as Influencer, Model as InfluencerModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
pub use withdrawal_request::{
    Column as WithdrawalRequestColumn, Entity as WithdrawalRequest,
    Model as WithdrawalRequestModel, WithdrawalMethod, WithdrawalStatus,
};
