//! # Payment References and Ledger Notes
//!
//! Payment metadata travels inside the free-text ledger note and is
//! recovered from it when a receipt is generated.
//!
//! ## Note Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BOOKING entry note:                                                    │
//! │    Booked room 101 for Ada Lovelace from 2024-01-01 to 2024-01-03      │
//! │      | payment: mobile_money (MM-20240101-1A2B3C4D)                    │
//! │                 └────┬─────┘  └─────────┬──────────┘                   │
//! │                   method             reference                          │
//! │                                                                         │
//! │  CANCELLATION entry note:                                               │
//! │    Cancelled room 101 booking for Ada Lovelace                          │
//! │      (2024-01-01 to 2024-01-03)                                        │
//! │                                                                         │
//! │  Receipt generation scans for the trailing                              │
//! │    payment: <method> (<reference>)                                      │
//! │  pattern, case-insensitive, defaulting both fields to "N/A".           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Carrying structured data in prose is fragile, but the format is part
//! of the ledger's observable history, so both the writer and the parser
//! live here side by side and are tested against each other.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::PaymentMethod;

// =============================================================================
// Reference Synthesis
// =============================================================================

/// Synthesizes a payment reference when the caller did not supply one.
///
/// ## Format
/// `<prefix>-<YYYYMMDD>-<8 uppercase hex>` where prefix is `BT` for bank
/// transfers and `MM` otherwise.
///
/// ## Example
/// `MM-20240101-1A2B3C4D`
pub fn generate_payment_reference(method: PaymentMethod, today: NaiveDate) -> String {
    let random = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!(
        "{}-{}-{}",
        method.reference_prefix(),
        today.format("%Y%m%d"),
        random
    )
}

// =============================================================================
// Note Builders
// =============================================================================

/// Builds the note for a BOOKING ledger entry.
///
/// The payment suffix is appended whenever the caller supplies both a
/// method and a reference; bookings without payment details carry no
/// suffix. The method is recorded as given, not canonicalized.
pub fn booking_note(
    customer_name: &str,
    room_number: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    payment: Option<(&str, &str)>,
) -> String {
    let mut note = format!(
        "Booked room {} for {} from {} to {}",
        room_number, customer_name, check_in, check_out
    );

    if let Some((method, reference)) = payment {
        note.push_str(&format!(" | payment: {} ({})", method, reference));
    }

    note
}

/// Builds the note for a CANCELLATION ledger entry.
pub fn cancellation_note(
    customer_name: &str,
    room_number: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> String {
    format!(
        "Cancelled room {} booking for {} ({} to {})",
        room_number, customer_name, check_in, check_out
    )
}

// =============================================================================
// Note Parse-Back
// =============================================================================

/// Recovers `(method, reference)` from a ledger note.
///
/// Accepts the trailing pattern `payment: <method> (<reference>)`,
/// case-insensitive on the keyword and method, tolerating surrounding
/// whitespace. Returns `None` when the suffix is absent or malformed.
///
/// ## Example
/// ```rust
/// use lodge_core::payment::parse_payment_note;
///
/// let note = "Booked room 101 for Ada from 2024-01-01 to 2024-01-03 \
///             | payment: mobile_money (MM-20240101-1A2B3C4D)";
/// let (method, reference) = parse_payment_note(note).unwrap();
/// assert_eq!(method, "mobile_money");
/// assert_eq!(reference, "MM-20240101-1A2B3C4D");
/// ```
pub fn parse_payment_note(note: &str) -> Option<(String, String)> {
    let trimmed = note.trim_end();
    if !trimmed.ends_with(')') {
        return None;
    }

    // ASCII lowering keeps byte offsets aligned with the original.
    let lowered = trimmed.to_ascii_lowercase();
    let keyword_at = lowered.rfind("payment:")?;
    let rest = trimmed[keyword_at + "payment:".len()..].trim_start();

    let method_len = rest
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(rest.len());
    if method_len == 0 {
        return None;
    }
    let method = rest[..method_len].to_ascii_lowercase();

    let reference = rest[method_len..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    if reference.is_empty() {
        return None;
    }

    Some((method, reference.to_string()))
}

/// Presentation form of a wire method name for receipts.
///
/// `"mobile_money"` becomes `"Mobile Money"`.
pub fn display_payment_method(method: &str) -> String {
    method
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_format() {
        let reference =
            generate_payment_reference(PaymentMethod::BankTransfer, date(2024, 1, 15));
        let parts: Vec<&str> = reference.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BT");
        assert_eq!(parts[1], "20240115");
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_mobile_money_prefix() {
        let reference =
            generate_payment_reference(PaymentMethod::MobileMoney, date(2024, 1, 15));
        assert!(reference.starts_with("MM-20240115-"));
    }

    #[test]
    fn test_note_roundtrip() {
        let note = booking_note(
            "Ada Lovelace",
            "101",
            date(2024, 1, 1),
            date(2024, 1, 3),
            Some(("mobile_money", "MM-20240101-1A2B3C4D")),
        );

        assert_eq!(
            note,
            "Booked room 101 for Ada Lovelace from 2024-01-01 to 2024-01-03 \
             | payment: mobile_money (MM-20240101-1A2B3C4D)"
        );

        let (method, reference) = parse_payment_note(&note).unwrap();
        assert_eq!(method, "mobile_money");
        assert_eq!(reference, "MM-20240101-1A2B3C4D");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let (method, reference) =
            parse_payment_note("something | PAYMENT: Bank_Transfer (REF-9)  ").unwrap();
        assert_eq!(method, "bank_transfer");
        assert_eq!(reference, "REF-9");
    }

    #[test]
    fn test_parse_rejects_missing_or_malformed_suffix() {
        // Staff bookings carry no payment suffix at all.
        assert!(parse_payment_note("Booked room 101 for Ada from a to b").is_none());
        assert!(parse_payment_note("payment: mobile_money").is_none());
        assert!(parse_payment_note("payment: (REF)").is_none());
        assert!(parse_payment_note("payment: mobile_money ()").is_none());
        // Suffix must be at the end of the note.
        assert!(parse_payment_note("payment: mm (REF) trailing words").is_none());
    }

    #[test]
    fn test_cancellation_note() {
        let note = cancellation_note("Ada Lovelace", "101", date(2024, 1, 1), date(2024, 1, 3));
        assert_eq!(
            note,
            "Cancelled room 101 booking for Ada Lovelace (2024-01-01 to 2024-01-03)"
        );
        assert!(parse_payment_note(&note).is_none());
    }

    #[test]
    fn test_display_payment_method() {
        assert_eq!(display_payment_method("mobile_money"), "Mobile Money");
        assert_eq!(display_payment_method("bank_transfer"), "Bank Transfer");
        assert_eq!(display_payment_method("card"), "Card");
    }
}
