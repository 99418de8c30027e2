use crate::config::BookingConfig;
use crate::errors::AppError;
use crate::models::RoomType;

const WEI_DECIMALS: usize = 18;

fn check_price(eth_price: f64) -> Result<(), AppError> {
    if !eth_price.is_finite() || eth_price <= 0.0 {
        return Err(AppError::InvalidEthPrice);
    }
    Ok(())
}

/// Amount owed in the settlement currency:
/// `base_price * nights / eth_price + epsilon`, where a one-night stay has
/// `to == from`. The epsilon absorbs downstream rounding.
pub fn payment_amount(
    cfg: &BookingConfig,
    room_type: RoomType,
    from: i64,
    to: i64,
    eth_price: f64,
) -> Result<f64, AppError> {
    check_price(eth_price)?;
    let nights = (1 + to - from) as f64;
    Ok(cfg.base_price(room_type) * nights / eth_price + cfg.payment_epsilon)
}

/// Per-night unit price in wei. The ether-to-wei conversion shifts the
/// decimal representation by 18 digits rather than multiplying floats, so the
/// smallest-unit value carries no settlement drift.
pub fn wei_per_night(
    cfg: &BookingConfig,
    room_type: RoomType,
    eth_price: f64,
) -> Result<u128, AppError> {
    check_price(eth_price)?;
    let ether = cfg.base_price(room_type) / eth_price;
    ether_to_wei(&ether.to_string())
}

/// Digits beyond 18 decimals are truncated toward zero; amounts too large to
/// represent in wei are rejected rather than wrapped.
fn ether_to_wei(decimal: &str) -> Result<u128, AppError> {
    let (int_part, frac_part) = match decimal.split_once('.') {
        Some((i, f)) => (i, f),
        None => (decimal, ""),
    };
    let int: u128 = int_part.parse().map_err(|_| AppError::InvalidEthPrice)?;
    let mut frac = frac_part.to_string();
    frac.truncate(WEI_DECIMALS);
    while frac.len() < WEI_DECIMALS {
        frac.push('0');
    }
    let frac: u128 = frac.parse().map_err(|_| AppError::InvalidEthPrice)?;
    int.checked_mul(10u128.pow(WEI_DECIMALS as u32))
        .and_then(|wei| wei.checked_add(frac))
        .ok_or(AppError::InvalidEthPrice)
}
