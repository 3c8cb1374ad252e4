//! Checkout flow: contact details, payment method, instalments, review.
//!
//! The flow only moves forward through its own methods, and each method
//! checks it is called at the right step. No payment is taken here; a
//! confirmed checkout yields a pending [`BookingRecord`] for the external
//! payment provider.

use chrono::Utc;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::booking::{BookingError, BookingResult};
use crate::db::checksum::booking_reference;
use crate::models::{
    BookingIntent, BookingRecord, BookingStatus, ContactDetails, InstallmentOption,
    PaymentMethod, UserId,
};

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    ContactDetails,
    PaymentMethod,
    InstallmentOption,
    Review,
    Confirmed,
}

/// Totals shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub total: Decimal,
    pub installments: InstallmentOption,
    pub amount_per_installment: Decimal,
}

#[derive(Debug, Clone)]
pub struct Checkout {
    intent: BookingIntent,
    step: CheckoutStep,
    contact: Option<ContactDetails>,
    payment_method: Option<PaymentMethod>,
    installments: InstallmentOption,
}

impl Checkout {
    pub fn new(intent: BookingIntent) -> Self {
        Self {
            intent,
            step: CheckoutStep::ContactDetails,
            contact: None,
            payment_method: None,
            installments: InstallmentOption::PayInFull,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn intent(&self) -> &BookingIntent {
        &self.intent
    }

    pub fn contact(&self) -> Option<&ContactDetails> {
        self.contact.as_ref()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    fn expect_step(&self, expected: CheckoutStep) -> BookingResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(BookingError::OutOfOrder {
                expected,
                actual: self.step,
            })
        }
    }

    pub fn submit_contact(&mut self, contact: ContactDetails) -> BookingResult<()> {
        self.expect_step(CheckoutStep::ContactDetails)?;
        self.contact = Some(validate_contact(&contact)?);
        self.step = CheckoutStep::PaymentMethod;
        Ok(())
    }

    /// Methods without instalments skip straight to review.
    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> BookingResult<()> {
        self.expect_step(CheckoutStep::PaymentMethod)?;
        self.payment_method = Some(method);
        if method.allows_installments() {
            self.step = CheckoutStep::InstallmentOption;
        } else {
            self.installments = InstallmentOption::PayInFull;
            self.step = CheckoutStep::Review;
        }
        Ok(())
    }

    pub fn choose_installments(&mut self, option: InstallmentOption) -> BookingResult<()> {
        self.expect_step(CheckoutStep::InstallmentOption)?;
        if let InstallmentOption::Monthly { months } = option {
            if !InstallmentOption::MONTHLY_TERMS.contains(&months) {
                return Err(BookingError::UnsupportedTerm(months));
            }
        }
        self.installments = option;
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Step back one screen. Returns false at the first step and once confirmed.
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            CheckoutStep::ContactDetails | CheckoutStep::Confirmed => return false,
            CheckoutStep::PaymentMethod => CheckoutStep::ContactDetails,
            CheckoutStep::InstallmentOption => CheckoutStep::PaymentMethod,
            CheckoutStep::Review => match self.payment_method {
                Some(method) if method.allows_installments() => CheckoutStep::InstallmentOption,
                _ => CheckoutStep::PaymentMethod,
            },
        };
        self.step = previous;
        true
    }

    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary {
            total: self.intent.subtotal,
            installments: self.installments,
            amount_per_installment: self.installments.per_installment(self.intent.subtotal),
        }
    }

    /// Finish the flow, producing the record to persist.
    pub fn confirm(&mut self, user_id: UserId) -> BookingResult<BookingRecord> {
        self.expect_step(CheckoutStep::Review)?;
        let (Some(contact), Some(payment_method)) = (self.contact.clone(), self.payment_method)
        else {
            return Err(BookingError::OutOfOrder {
                expected: CheckoutStep::ContactDetails,
                actual: self.step,
            });
        };

        let record = BookingRecord {
            id: None,
            reference: booking_reference(user_id, &self.intent),
            user_id,
            intent: self.intent.clone(),
            contact,
            payment_method,
            installments: self.installments,
            amount_per_installment: self.summary().amount_per_installment,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        self.step = CheckoutStep::Confirmed;
        info!(
            "Checkout confirmed for package {} ({})",
            record.intent.package_id, record.reference
        );
        Ok(record)
    }
}

/// Check and trim contact details.
pub fn validate_contact(contact: &ContactDetails) -> BookingResult<ContactDetails> {
    let full_name = contact.full_name.trim();
    if full_name.is_empty() {
        return Err(BookingError::InvalidContact {
            field: "full_name",
            reason: "must not be empty".into(),
        });
    }

    let email = contact.email.trim();
    if !is_valid_email(email) {
        return Err(BookingError::InvalidContact {
            field: "email",
            reason: format!("'{}' is not an email address", email),
        });
    }

    let phone = contact.phone.trim();
    validate_phone(phone)?;

    Ok(ContactDetails {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty())
        && labels.last().is_some_and(|tld| tld.len() >= 2)
}

fn validate_phone(phone: &str) -> BookingResult<()> {
    let invalid = |reason: String| BookingError::InvalidContact {
        field: "phone",
        reason,
    };

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if let Some(c) = body
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')')))
    {
        return Err(invalid(format!("unexpected character '{}'", c)));
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(invalid(format!(
            "expected {}-{} digits, got {}",
            MIN_PHONE_DIGITS, MAX_PHONE_DIGITS, digits
        )));
    }
    Ok(())
}
