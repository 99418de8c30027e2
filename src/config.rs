use std::env;

use crate::models::RoomType;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub oracle_url: String,
    pub booking: BookingConfig,
}

/// Knobs for the booking lifecycle itself, injected into the core functions
/// so tests can run with alternate values.
#[derive(Clone, Debug)]
pub struct BookingConfig {
    /// Grace window (minutes) subtracted from "now" when a caller supplies no
    /// signature timestamp.
    pub signature_time_limit_minutes: i64,
    /// Added to every computed payment amount to absorb downstream rounding.
    pub payment_epsilon: f64,
    pub double_price: f64,
    pub twin_price: f64,
}

impl BookingConfig {
    pub fn base_price(&self, room_type: RoomType) -> f64 {
        match room_type {
            RoomType::Double => self.double_price,
            RoomType::Twin => self.twin_price,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            signature_time_limit_minutes: 10,
            payment_epsilon: 0.00001,
            double_price: 100.0,
            twin_price: 85.0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = BookingConfig::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "stayhash.db".to_string()),
            oracle_url: env::var("PRICE_ORACLE_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
            booking: BookingConfig {
                signature_time_limit_minutes: env::var("SIGNATURE_TIME_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.signature_time_limit_minutes),
                payment_epsilon: env::var("PAYMENT_EPSILON")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.payment_epsilon),
                double_price: env::var("ROOM_PRICE_DOUBLE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.double_price),
                twin_price: env::var("ROOM_PRICE_TWIN")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.twin_price),
            },
        }
    }
}
