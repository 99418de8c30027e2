pub mod booking;
pub mod hash;
pub mod oracle;
pub mod payment;
pub mod personal_info;
