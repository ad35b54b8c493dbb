//! Portal settings loaded from config.toml
//!
//! Every field has a default so the bot starts without a config file. The file only
//! needs the values that differ, e.g.:
//!
//! ```toml
//! [withdraw]
//! min_amount = 50.0
//!
//! [business_hours]
//! open_hour = 9
//! close_hour = 19
//! utc_offset_hours = -3
//! ```

use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Withdrawal validation rules
    pub withdraw: WithdrawSettings,
    /// Daily window in which withdrawals may be started
    pub business_hours: BusinessHoursSettings,
    /// Support contact shown on the influencer dashboard
    pub support: SupportSettings,
}

/// Withdrawal validation rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WithdrawSettings {
    /// Minimum amount accepted by the wizard; `0` disables the check
    pub min_amount: f64,
    /// How long after confirmation the payout is promised, in minutes
    pub deadline_minutes: i64,
}

impl Default for WithdrawSettings {
    fn default() -> Self {
        Self {
            min_amount: 50.0,
            deadline_minutes: 60,
        }
    }
}

/// Daily window in which withdrawals may be started
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusinessHoursSettings {
    /// First hour (inclusive) of the window
    pub open_hour: u32,
    /// Hour (exclusive) at which the window closes
    pub close_hour: u32,
    /// Offset of the reference timezone from UTC
    pub utc_offset_hours: i32,
}

impl Default for BusinessHoursSettings {
    fn default() -> Self {
        // Brasília time
        Self {
            open_hour: 9,
            close_hour: 19,
            utc_offset_hours: -3,
        }
    }
}

impl BusinessHoursSettings {
    /// Reference timezone as a fixed offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| Error::Config {
            message: format!("Invalid UTC offset: {} hours", self.utc_offset_hours),
        })
    }
}

/// Support contact shown on the influencer dashboard
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupportSettings {
    /// WhatsApp number in international format, digits only
    pub whatsapp_number: String,
    /// Message prefilled in the chat
    pub message: String,
}

impl Default for SupportSettings {
    fn default() -> Self {
        Self {
            whatsapp_number: "5511999999999".to_string(),
            message: "Olá! Preciso de suporte no portal de afiliados.".to_string(),
        }
    }
}

impl PortalSettings {
    /// Checks values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<()> {
        let hours = &self.business_hours;
        if hours.open_hour >= hours.close_hour || hours.close_hour > 24 {
            return Err(Error::Config {
                message: format!(
                    "Business hours must satisfy open < close <= 24 (got {}..{})",
                    hours.open_hour, hours.close_hour
                ),
            });
        }
        hours.offset()?;
        if !self.withdraw.min_amount.is_finite() || self.withdraw.min_amount < 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.withdraw.min_amount,
            });
        }
        if self.withdraw.deadline_minutes <= 0 {
            return Err(Error::Config {
                message: "withdraw.deadline_minutes must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads portal settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value fails [`PortalSettings::validate`]
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<PortalSettings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let settings: PortalSettings = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from ./config.toml, or defaults when the file does not exist.
pub fn load_default_settings() -> Result<PortalSettings> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_settings(path)
    } else {
        tracing::info!("No config.toml found, using default portal settings");
        Ok(PortalSettings::default())
    }
}
