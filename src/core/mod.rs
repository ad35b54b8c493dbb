//! Framework-agnostic portal logic. Nothing in here knows about Discord.

pub mod access;
pub mod admin;
pub mod dashboard;
pub mod format;
pub mod influencer;
pub mod sale;
pub mod session;
pub mod user;
pub mod withdraw;
pub mod withdrawal;
