use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookingId, PackageId, UserId};

/// What the booking screen hands to checkout: the chosen range, party size
/// and the resulting subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingIntent {
    pub package_id: PackageId,
    /// ISO `YYYY-MM-DD`.
    pub start_date: String,
    /// ISO `YYYY-MM-DD`.
    pub end_date: String,
    pub party_size: u32,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    EWallet,
}

impl PaymentMethod {
    pub fn allows_installments(&self) -> bool {
        matches!(self, PaymentMethod::CreditCard)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallmentOption {
    #[default]
    PayInFull,
    Monthly { months: u8 },
}

impl InstallmentOption {
    /// Instalment counts offered for card payments.
    pub const MONTHLY_TERMS: [u8; 3] = [3, 6, 12];

    pub fn months(&self) -> u8 {
        match self {
            InstallmentOption::PayInFull => 1,
            InstallmentOption::Monthly { months } => *months,
        }
    }

    /// Amount due per instalment, rounded to two decimals.
    pub fn per_installment(&self, total: Decimal) -> Decimal {
        (total / Decimal::from(self.months().max(1))).round_dp(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting payment by the external checkout.
    Pending,
    Confirmed,
    Cancelled,
}

/// A confirmed checkout, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookingId>,
    /// SHA-256 over the user and intent; identical submissions share it.
    pub reference: String,
    pub user_id: UserId,
    pub intent: BookingIntent,
    pub contact: ContactDetails,
    pub payment_method: PaymentMethod,
    pub installments: InstallmentOption,
    pub amount_per_installment: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_installment_rounding() {
        let total = Decimal::new(100000, 2); // 1000.00
        assert_eq!(
            InstallmentOption::PayInFull.per_installment(total),
            Decimal::new(100000, 2)
        );
        assert_eq!(
            InstallmentOption::Monthly { months: 3 }.per_installment(total),
            Decimal::new(33333, 2)
        );
        assert_eq!(
            InstallmentOption::Monthly { months: 6 }.per_installment(total),
            Decimal::new(16667, 2)
        );
    }

    #[test]
    fn test_installment_serialization() {
        let json = serde_json::to_value(InstallmentOption::Monthly { months: 6 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "monthly", "months": 6}));
        let back: InstallmentOption =
            serde_json::from_value(serde_json::json!({"type": "pay_in_full"})).unwrap();
        assert_eq!(back, InstallmentOption::PayInFull);
    }

    #[test]
    fn test_only_cards_allow_installments() {
        assert!(PaymentMethod::CreditCard.allows_installments());
        assert!(!PaymentMethod::BankTransfer.allows_installments());
        assert!(!PaymentMethod::EWallet.allows_installments());
    }
}
