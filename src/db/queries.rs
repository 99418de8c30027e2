use rusqlite::{params, Connection, Row};

use crate::errors::{normalize_db_error, AppError};
use crate::models::{Booking, PaymentType, RoomType};

// Every rusqlite error leaving this module goes through
// `errors::normalize_db_error` so callers only ever see application codes.

const BOOKING_COLUMNS: &str = "id, booking_hash, guest_eth_address, room_type, from_night, \
     to_night, payment_amount, payment_type, payment_tx, signature_timestamp, \
     encrypted_personal_info";

struct RawBooking {
    id: i64,
    booking_hash: String,
    guest_eth_address: String,
    room_type: String,
    from: i64,
    to: i64,
    payment_amount: f64,
    payment_type: String,
    payment_tx: Option<String>,
    signature_timestamp: i64,
    encrypted_personal_info: String,
}

fn raw_from_row(row: &Row) -> rusqlite::Result<RawBooking> {
    Ok(RawBooking {
        id: row.get(0)?,
        booking_hash: row.get(1)?,
        guest_eth_address: row.get(2)?,
        room_type: row.get(3)?,
        from: row.get(4)?,
        to: row.get(5)?,
        payment_amount: row.get(6)?,
        payment_type: row.get(7)?,
        payment_tx: row.get(8)?,
        signature_timestamp: row.get(9)?,
        encrypted_personal_info: row.get(10)?,
    })
}

fn booking_from_raw(raw: RawBooking) -> Result<Booking, AppError> {
    let room_type = RoomType::parse(&raw.room_type)
        .ok_or_else(|| AppError::InvalidField("roomType".to_string()))?;
    let payment_type = PaymentType::parse(&raw.payment_type)
        .ok_or_else(|| AppError::InvalidField("paymentType".to_string()))?;

    Ok(Booking {
        id: Some(raw.id),
        booking_hash: raw.booking_hash,
        guest_eth_address: raw.guest_eth_address,
        room_type,
        from: raw.from,
        to: raw.to,
        payment_amount: raw.payment_amount,
        payment_type,
        payment_tx: raw.payment_tx,
        signature_timestamp: raw.signature_timestamp,
        encrypted_personal_info: raw.encrypted_personal_info,
    })
}

pub fn save_booking(conn: &Connection, booking: &Booking) -> Result<Booking, AppError> {
    conn.execute(
        "INSERT INTO bookings (booking_hash, guest_eth_address, room_type, from_night, to_night,
            payment_amount, payment_type, payment_tx, signature_timestamp, encrypted_personal_info)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.booking_hash,
            booking.guest_eth_address,
            booking.room_type.as_str(),
            booking.from,
            booking.to,
            booking.payment_amount,
            booking.payment_type.as_str(),
            booking.payment_tx,
            booking.signature_timestamp,
            booking.encrypted_personal_info,
        ],
    )
    .map_err(normalize_db_error)?;

    let mut saved = booking.clone();
    saved.id = Some(conn.last_insert_rowid());
    Ok(saved)
}

pub fn find_by_hash(conn: &Connection, booking_hash: &str) -> Result<Booking, AppError> {
    let raw = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_hash = ?1"),
            params![booking_hash],
            raw_from_row,
        )
        .map_err(normalize_db_error)?;
    booking_from_raw(raw)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    let raw = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            raw_from_row,
        )
        .map_err(normalize_db_error)?;
    booking_from_raw(raw)
}

/// Deletes a booking and returns the record as it was stored.
pub fn delete_by_id(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    let booking = find_by_id(conn, id)?;
    conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])
        .map_err(normalize_db_error)?;
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn sample_booking(hash: &str) -> Booking {
        Booking {
            id: None,
            booking_hash: hash.to_string(),
            guest_eth_address: "0x8f2a5b1c3d4e5f60718293a4b5c6d7e8f9001122".to_string(),
            room_type: RoomType::Double,
            from: 1,
            to: 2,
            payment_amount: 0.20001,
            payment_type: PaymentType::Eth,
            payment_tx: None,
            signature_timestamp: 1_700_000_000,
            encrypted_personal_info: "0x7b7d".to_string(),
        }
    }

    #[test]
    fn test_save_and_find_by_hash() {
        let conn = setup_db();
        let saved = save_booking(&conn, &sample_booking("0xabc")).unwrap();
        assert!(saved.id.is_some());

        let found = find_by_hash(&conn, "0xabc").unwrap();
        assert_eq!(found.booking_hash, "0xabc");
        assert_eq!(found.room_type, RoomType::Double);
        assert_eq!(found.from, 1);
        assert_eq!(found.to, 2);
        assert_eq!(found.signature_timestamp, 1_700_000_000);
    }

    #[test]
    fn test_duplicate_hash_surfaces_duplicate_booking() {
        let conn = setup_db();
        save_booking(&conn, &sample_booking("0xsame")).unwrap();

        let err = save_booking(&conn, &sample_booking("0xsame")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateBooking));
        assert_eq!(err.code().unwrap(), "duplicateBooking");
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let conn = setup_db();
        let err = find_by_hash(&conn, "0xmissing").unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_delete_returns_record_then_gone() {
        let conn = setup_db();
        let saved = save_booking(&conn, &sample_booking("0xdel")).unwrap();
        let id = saved.id.unwrap();

        let deleted = delete_by_id(&conn, id).unwrap();
        assert_eq!(deleted.booking_hash, "0xdel");

        let err = find_by_id(&conn, id).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let conn = setup_db();
        let err = delete_by_id(&conn, 999).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_corrupt_room_type_surfaces_invalid_field() {
        let conn = setup_db();
        save_booking(&conn, &sample_booking("0xbad")).unwrap();
        conn.execute(
            "UPDATE bookings SET room_type = 'suite' WHERE booking_hash = '0xbad'",
            [],
        )
        .unwrap();

        let err = find_by_hash(&conn, "0xbad").unwrap_err();
        assert_eq!(err.code().unwrap(), "invalidRoomType");
    }
}
