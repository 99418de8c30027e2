pub mod booking;

pub use booking::{Booking, PaymentType, RoomType};
