//! Booking reference calculation for checkout deduplication.

use sha2::{Digest, Sha256};

use crate::models::{BookingIntent, UserId};

/// Calculate the SHA-256 hex digest of arbitrary content.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Reference shared by every submission of the same intent by the same user.
///
/// The canonical form is `user|package|start|end|party|subtotal`, with the
/// subtotal normalized so `150` and `150.00` agree.
pub fn booking_reference(user_id: UserId, intent: &BookingIntent) -> String {
    let canonical = format!(
        "{}|{}|{}|{}|{}|{}",
        user_id,
        intent.package_id,
        intent.start_date,
        intent.end_date,
        intent.party_size,
        intent.subtotal.normalize()
    );
    calculate_checksum(&canonical)
}
