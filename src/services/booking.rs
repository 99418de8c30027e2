use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::config::BookingConfig;
use crate::errors::AppError;
use crate::models::{Booking, PaymentType, RoomType};
use crate::services::{hash, payment, personal_info};

/// Caller-supplied booking fields. Everything is optional so that a missing
/// field surfaces as its own `no<Field>` error instead of a generic
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub guest_eth_address: Option<String>,
    pub room_type: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub payment_amount: Option<f64>,
    pub payment_type: Option<String>,
    pub signature_timestamp: Option<i64>,
    pub personal_info: Option<Value>,
    pub eth_price: Option<f64>,
}

/// Builds a fully-populated booking from raw input. Steps run in a fixed
/// order and the first failure wins:
/// field validation, signature-timestamp default, personal-info encoding,
/// hash assignment, payment amount.
pub fn generate(
    input: &BookingInput,
    eth_price: Option<f64>,
    cfg: &BookingConfig,
) -> Result<Booking, AppError> {
    let guest_eth_address = input
        .guest_eth_address
        .clone()
        .ok_or(AppError::MissingField("guestEthAddress"))?;

    let room_type = match input.room_type.as_deref() {
        None => return Err(AppError::MissingField("roomType")),
        Some(s) => {
            RoomType::parse(s).ok_or_else(|| AppError::InvalidField("roomType".to_string()))?
        }
    };

    let from = input.from.ok_or(AppError::MissingField("from"))?;
    if from <= 0 || from >= 5 {
        return Err(AppError::FromOutOfRange);
    }

    let to = input.to.ok_or(AppError::MissingField("to"))?;
    if to < from || to >= 5 {
        return Err(AppError::ToOutOfRange);
    }

    let payment_type = match input.payment_type.as_deref() {
        None => return Err(AppError::MissingField("paymentType")),
        Some(s) => {
            PaymentType::parse(s).ok_or_else(|| AppError::InvalidField("paymentType".to_string()))?
        }
    };

    if let Some(amount) = input.payment_amount {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::MinAmount);
        }
    }

    // Without an explicit timestamp the payment window starts partially
    // expired; callers wanting a full window supply their own.
    let signature_timestamp = input
        .signature_timestamp
        .unwrap_or_else(|| Utc::now().timestamp() - cfg.signature_time_limit_minutes * 60);

    let info = input
        .personal_info
        .as_ref()
        .ok_or(AppError::InvalidPersonalInfo)?;
    let encrypted_personal_info = personal_info::encode(info)?;

    let booking_hash = hash::generate_hash();

    // A caller-supplied amount is kept as-is (validated above), never
    // recomputed.
    let payment_amount = match input.payment_amount {
        Some(amount) => amount,
        None => {
            let price = eth_price.ok_or(AppError::InvalidEthPrice)?;
            payment::payment_amount(cfg, room_type, from, to, price)?
        }
    };

    Ok(Booking {
        id: None,
        booking_hash,
        guest_eth_address,
        room_type,
        from,
        to,
        payment_amount,
        payment_type,
        payment_tx: None,
        signature_timestamp,
        encrypted_personal_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> BookingInput {
        BookingInput {
            guest_eth_address: Some("0x8f2a5b1c3d4e5f60718293a4b5c6d7e8f9001122".to_string()),
            room_type: Some("double".to_string()),
            from: Some(1),
            to: Some(2),
            payment_amount: None,
            payment_type: Some("eth".to_string()),
            signature_timestamp: None,
            personal_info: Some(serde_json::json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "birthDate": "1815-12-10",
                "phone": "+442071234567",
            })),
            eth_price: None,
        }
    }

    fn cfg() -> BookingConfig {
        BookingConfig::default()
    }

    #[test]
    fn test_generates_full_booking() {
        let booking = generate(&valid_input(), Some(1000.0), &cfg()).unwrap();
        assert_eq!(booking.room_type, RoomType::Double);
        assert_eq!(booking.payment_type, PaymentType::Eth);
        assert!(booking.booking_hash.starts_with("0x"));
        assert!((booking.payment_amount - 0.20001).abs() < 1e-12);
        assert!(booking.encrypted_personal_info.starts_with("0x"));
        assert!(booking.payment_tx.is_none());
        assert!(booking.id.is_none());
    }

    #[test]
    fn test_default_signature_timestamp() {
        let cfg = cfg();
        let before = Utc::now().timestamp();
        let booking = generate(&valid_input(), Some(1000.0), &cfg).unwrap();
        let after = Utc::now().timestamp();

        let window = cfg.signature_time_limit_minutes * 60;
        assert!(booking.signature_timestamp >= before - window - 2);
        assert!(booking.signature_timestamp <= after - window + 2);
    }

    #[test]
    fn test_supplied_signature_timestamp_kept() {
        let input = BookingInput {
            signature_timestamp: Some(1_700_000_000),
            ..valid_input()
        };
        let booking = generate(&input, Some(1000.0), &cfg()).unwrap();
        assert_eq!(booking.signature_timestamp, 1_700_000_000);
    }

    #[test]
    fn test_missing_guest_address() {
        let input = BookingInput {
            guest_eth_address: None,
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "noGuestEthAddress");
    }

    #[test]
    fn test_missing_room_type() {
        let input = BookingInput {
            room_type: None,
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "noRoomType");
    }

    #[test]
    fn test_unknown_room_type() {
        let input = BookingInput {
            room_type: Some("penthouse".to_string()),
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "invalidRoomType");
    }

    #[test]
    fn test_from_boundaries() {
        for from in [0, 5, -1] {
            let input = BookingInput {
                from: Some(from),
                to: Some(4),
                ..valid_input()
            };
            let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
            assert_eq!(err.code().unwrap(), "fromOutOfRange", "from = {from}");
        }

        let input = BookingInput {
            from: Some(1),
            to: Some(4),
            ..valid_input()
        };
        assert!(generate(&input, Some(1000.0), &cfg()).is_ok());
    }

    #[test]
    fn test_to_before_from_rejected() {
        let input = BookingInput {
            from: Some(3),
            to: Some(2),
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "toOutOfRange");
    }

    #[test]
    fn test_to_upper_boundary_rejected() {
        let input = BookingInput {
            from: Some(1),
            to: Some(5),
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "toOutOfRange");
    }

    #[test]
    fn test_supplied_payment_amount_not_recomputed() {
        let input = BookingInput {
            payment_amount: Some(0.5),
            ..valid_input()
        };
        // No price available: must not matter when the amount is supplied
        let booking = generate(&input, None, &cfg()).unwrap();
        assert_eq!(booking.payment_amount, 0.5);
    }

    #[test]
    fn test_non_positive_payment_amount_rejected() {
        let input = BookingInput {
            payment_amount: Some(0.0),
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "minAmount");
    }

    #[test]
    fn test_missing_price_when_amount_not_supplied() {
        let err = generate(&valid_input(), None, &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "invalidEthPrice");
    }

    #[test]
    fn test_non_object_personal_info_rejected() {
        let input = BookingInput {
            personal_info: Some(serde_json::json!("not an object")),
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "invalidPersonalInfo");
    }

    #[test]
    fn test_missing_personal_info_rejected() {
        let input = BookingInput {
            personal_info: None,
            ..valid_input()
        };
        let err = generate(&input, Some(1000.0), &cfg()).unwrap_err();
        assert_eq!(err.code().unwrap(), "invalidPersonalInfo");
    }

    #[test]
    fn test_alternate_config_values_respected() {
        let cfg = BookingConfig {
            signature_time_limit_minutes: 1,
            payment_epsilon: 0.0,
            double_price: 50.0,
            twin_price: 40.0,
        };
        let booking = generate(&valid_input(), Some(100.0), &cfg).unwrap();
        // 50 * 2 / 100, no epsilon
        assert!((booking.payment_amount - 1.0).abs() < 1e-12);
    }
}
