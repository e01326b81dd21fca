use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const DEFAULT_MIN_SLOT_DURATION_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub min_slot_duration_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let min_slot_duration_minutes = env::var("MIN_SLOT_DURATION_MINUTES")
            .ok()
            .and_then(|value| {
                value
                    .parse::<i64>()
                    .map_err(|_| {
                        warn!("MIN_SLOT_DURATION_MINUTES is not a valid integer: {}", value);
                    })
                    .ok()
            })
            .unwrap_or(DEFAULT_MIN_SLOT_DURATION_MINUTES);

        let config = Self {
            min_slot_duration_minutes,
        };

        if !config.is_valid() {
            warn!("MIN_SLOT_DURATION_MINUTES must be positive, falling back to default");
            return Self::default();
        }

        config
    }

    pub fn is_valid(&self) -> bool {
        self.min_slot_duration_minutes > 0
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_slot_duration_minutes: DEFAULT_MIN_SLOT_DURATION_MINUTES,
        }
    }
}
