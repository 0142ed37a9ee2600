//! Dispatch pacing and action flow configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::dispatch::{Pacing, PacingStrategy};

use super::error::ValidationError;

/// How replies are paced and what the follow-up flows offer
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Spacing between paced sends in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default)]
    pub pacing: PacingStrategy,

    /// Delay before the shipping follow-up buttons in milliseconds
    #[serde(default = "default_follow_up_delay_ms")]
    pub follow_up_delay_ms: u64,

    /// Target of the "Track my shipment" button
    pub shipping_tracking_url: Option<String>,

    /// Number dialed by the "Call us" button
    pub support_phone_number: Option<String>,
}

impl DispatchConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing::new(self.pacing, Duration::from_millis(self.interval_ms))
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidSendInterval);
        }
        if let Some(url) = &self.shipping_tracking_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl("DISPATCH__SHIPPING_TRACKING_URL"));
            }
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            pacing: PacingStrategy::default(),
            follow_up_delay_ms: default_follow_up_delay_ms(),
            shipping_tracking_url: None,
            support_phone_number: None,
        }
    }
}

fn default_interval_ms() -> u64 {
    1100
}

fn default_follow_up_delay_ms() -> u64 {
    3000
}
