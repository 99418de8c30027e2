use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::{booking, personal_info};
use crate::state::AppState;

/// Serializes a booking for the wire with the personal info decoded back into
/// a `personalInfo` object.
fn booking_response(booking: &Booking) -> Result<serde_json::Value, AppError> {
    let personal_info = personal_info::decode(&booking.encrypted_personal_info)?;
    let mut value =
        serde_json::to_value(booking).map_err(|e| AppError::Internal(e.to_string()))?;
    value["personalInfo"] = personal_info;
    Ok(value)
}

// POST /api/booking
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(input): Json<booking::BookingInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    // Resolve the exchange rate up front; the oracle is only consulted when
    // the caller supplied neither an amount nor a quote.
    let eth_price = match (input.payment_amount, input.eth_price) {
        (Some(_), quote) => quote,
        (None, Some(quote)) => Some(quote),
        (None, None) => {
            let currency = input.payment_type.as_deref().unwrap_or("eth");
            let quote = state
                .oracle
                .current_price(currency)
                .await
                .map_err(|e| AppError::Oracle(e.to_string()))?;
            Some(quote)
        }
    };

    let record = booking::generate(&input, eth_price, &state.config.booking)?;

    let saved = {
        let db = state.db.lock().unwrap();
        queries::save_booking(&db, &record)?
    };

    tracing::info!(booking_hash = %saved.booking_hash, "created booking");

    let body = serde_json::json!({ "booking": booking_response(&saved)? });
    Ok((StatusCode::CREATED, Json(body)))
}

// GET /api/booking/:id (by booking hash)
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_hash): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::find_by_hash(&db, &booking_hash)?
    };
    Ok(Json(booking_response(&booking)?))
}

// DELETE /api/booking/:id (by row id)
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_by_id(&db, id)?
    };

    tracing::info!(booking_hash = %deleted.booking_hash, "deleted booking");

    Ok(Json(booking_response(&deleted)?))
}
