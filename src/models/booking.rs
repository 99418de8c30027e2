use serde::{Deserialize, Serialize};

/// A reservation paid for in cryptocurrency. Plain data record; the lifecycle
/// rules live in `services::booking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Storage row id, assigned on save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Assigned exactly once at creation, immutable thereafter. Uniqueness is
    /// enforced by the storage layer.
    pub booking_hash: String,
    pub guest_eth_address: String,
    pub room_type: RoomType,
    /// First night of the stay; valid range is 1..=4.
    pub from: i64,
    /// Last night of the stay; must satisfy `from <= to <= 4`.
    pub to: i64,
    pub payment_amount: f64,
    pub payment_type: PaymentType,
    /// Settlement reference filled in later by the payment-confirmation
    /// process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_tx: Option<String>,
    /// Epoch seconds at which the guest signed the booking.
    pub signature_timestamp: i64,
    /// Hex-encoded guest personal data, produced by `services::personal_info`.
    pub encrypted_personal_info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Double,
    Twin,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Double => "double",
            RoomType::Twin => "twin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "double" => Some(RoomType::Double),
            "twin" => Some(RoomType::Twin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Eth,
    Lif,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Eth => "eth",
            PaymentType::Lif => "lif",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eth" => Some(PaymentType::Eth),
            "lif" => Some(PaymentType::Lif),
            _ => None,
        }
    }
}
