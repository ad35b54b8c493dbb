//! Discord command implementations organized by view.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Admin console commands
pub mod admin;

/// Influencer dashboard commands
pub mod dashboard;

/// General utility commands
pub mod general;

/// Sign-in and sign-out commands
pub mod session;

/// Withdrawal wizard commands
pub mod withdraw;

// Export commands
pub use admin::*;
pub use dashboard::*;
pub use general::*;
pub use session::*;
pub use withdraw::*;
