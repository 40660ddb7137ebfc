//! # Receipt Rendering
//!
//! Builds the downloadable booking receipt as a single-page PDF with no
//! third-party PDF library. The document is assembled object by object:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  %PDF-1.4                                                   │
//! │  1: Catalog ─→ 2: Pages ─→ 3: Page (612 x 792)             │
//! │                              │                              │
//! │                              ├─ F1: Helvetica               │
//! │                              ├─ F2: Helvetica-Bold          │
//! │                              └─ 6: Contents (draw stream)   │
//! │  xref table + trailer                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Layout: a two-tone header banner, a booking-details card, a payment
//! summary card with a highlighted total box, and a footer line. Colors
//! mirror the web frontend's theme tokens.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::money::Money;

// =============================================================================
// Receipt Record
// =============================================================================

/// Everything the PDF needs, precomputed by the caller.
///
/// `payment_method` and `payment_reference` arrive already formatted for
/// display (`"Mobile Money"`, or `"N/A"` when the booking ledger entry
/// carried no payment details).
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptRecord {
    pub booking_id: String,
    pub customer: String,
    /// Room number with its type, e.g. `"101 (Deluxe)"`.
    pub room: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub rate_per_day: Money,
    pub total_paid: Money,
    pub payment_method: String,
    pub payment_reference: String,
    pub issued: DateTime<Utc>,
}

// =============================================================================
// Theme Colors
// =============================================================================

const BG_COLOR: &str = "0.957 0.965 0.984";
const SURFACE_COLOR: &str = "1 1 1";
const BORDER_COLOR: &str = "0.847 0.875 0.922";
const TEXT_COLOR: &str = "0.11 0.141 0.192";
const MUTED_COLOR: &str = "0.404 0.451 0.529";
const BRAND_DARK: &str = "0.02 0.212 0.502";
const BRAND_COLOR: &str = "0 0.337 0.839";
const HEADER_SOFT: &str = "0.867 0.914 1";
const TOTAL_BOX_FILL: &str = "0.863 0.914 1";

// =============================================================================
// Rendering
// =============================================================================

/// Escapes the characters that delimit a PDF literal string.
fn escape_pdf_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

struct ContentStream {
    commands: Vec<String>,
}

impl ContentStream {
    fn new() -> Self {
        Self { commands: Vec::new() }
    }

    fn push(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    fn filled_rect(&mut self, color: &str, x: i32, y: i32, w: i32, h: i32) {
        self.push(format!("{color} rg"));
        self.push(format!("{x} {y} {w} {h} re f"));
    }

    fn stroked_rect(&mut self, color: &str, x: i32, y: i32, w: i32, h: i32) {
        self.push(format!("{color} RG"));
        self.push("1 w");
        self.push(format!("{x} {y} {w} {h} re S"));
    }

    fn text(&mut self, font: &str, size: u32, color: &str, x: i32, y: i32, text: &str) {
        self.push("BT");
        self.push(format!("/{font} {size} Tf"));
        self.push(format!("{color} rg"));
        self.push(format!("1 0 0 1 {x} {y} Tm"));
        self.push(format!("({}) Tj", escape_pdf_text(text)));
        self.push("ET");
    }

    fn into_bytes(self) -> Vec<u8> {
        self.commands.join("\n").into_bytes()
    }
}

/// Renders the receipt to PDF bytes. Pure, no IO.
pub fn render_pdf(receipt: &ReceiptRecord) -> Vec<u8> {
    let mut cs = ContentStream::new();

    // Page background.
    cs.filled_rect(BG_COLOR, 0, 0, 612, 792);

    // Two-tone header banner.
    cs.filled_rect(BRAND_DARK, 30, 708, 552, 54);
    cs.filled_rect(BRAND_COLOR, 30, 762, 552, 30);

    // Main cards.
    for (x, y, w, h) in [(30, 472, 552, 220), (30, 250, 552, 205)] {
        cs.filled_rect(SURFACE_COLOR, x, y, w, h);
        cs.stroked_rect(BORDER_COLOR, x, y, w, h);
    }

    // Header text.
    cs.text("F2", 21, "1 1 1", 48, 774, "Hotel Reservation Receipt");
    cs.text(
        "F1",
        11,
        HEADER_SOFT,
        48,
        748,
        "Payment confirmation for your room booking",
    );
    cs.text(
        "F1",
        10,
        HEADER_SOFT,
        430,
        748,
        &format!("Receipt #{}", receipt.booking_id),
    );

    // Booking details card.
    cs.text("F2", 13, BRAND_COLOR, 48, 678, "Booking Details");
    let detail_rows = [
        ("Customer", receipt.customer.clone()),
        ("Room", receipt.room.clone()),
        ("Check-in", receipt.check_in.to_string()),
        ("Check-out", receipt.check_out.to_string()),
        ("Days", receipt.nights.to_string()),
        ("Issued", receipt.issued.format("%Y-%m-%d %H:%M:%S").to_string()),
    ];
    let mut y = 652;
    for (label, value) in &detail_rows {
        cs.text("F2", 10, MUTED_COLOR, 48, y, &format!("{label}:"));
        cs.text("F1", 11, TEXT_COLOR, 170, y, value);
        y -= 26;
    }

    // Payment summary card.
    cs.text("F2", 13, BRAND_COLOR, 48, 438, "Payment Summary");
    let payment_rows = [
        ("Rate per day", receipt.rate_per_day.to_string()),
        ("Payment method", receipt.payment_method.clone()),
        ("Payment reference", receipt.payment_reference.clone()),
    ];
    let mut y = 412;
    for (label, value) in &payment_rows {
        cs.text("F2", 10, MUTED_COLOR, 48, y, &format!("{label}:"));
        cs.text("F1", 11, TEXT_COLOR, 170, y, value);
        y -= 28;
    }

    // Highlighted total box.
    cs.filled_rect(TOTAL_BOX_FILL, 420, 270, 150, 40);
    cs.stroked_rect(BORDER_COLOR, 420, 270, 150, 40);
    cs.text("F2", 10, MUTED_COLOR, 434, 296, "TOTAL PAID");
    cs.text("F2", 15, BRAND_DARK, 434, 280, &receipt.total_paid.to_string());

    cs.text(
        "F1",
        10,
        MUTED_COLOR,
        48,
        225,
        "Thank you for booking with Hotel Reservation System.",
    );
    cs.text("F1", 9, MUTED_COLOR, 48, 208, "Keep this receipt for your records.");

    assemble_document(cs.into_bytes())
}

/// Wraps a content stream in the fixed catalog/pages/fonts object graph
/// and appends the xref table and trailer.
fn assemble_document(stream: Vec<u8>) -> Vec<u8> {
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(6);
    objects.push(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_vec());
    objects.push(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_vec());
    objects.push(
        b"3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
          /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>\nendobj\n"
            .to_vec(),
    );
    objects.push(
        b"4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n".to_vec(),
    );
    objects.push(
        b"5 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>\nendobj\n".to_vec(),
    );

    let mut content_object =
        format!("6 0 obj\n<< /Length {} >>\nstream\n", stream.len()).into_bytes();
    content_object.extend_from_slice(&stream);
    content_object.extend_from_slice(b"\nendstream\nendobj\n");
    objects.push(content_object);

    let mut pdf: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for object in &objects {
        offsets.push(pdf.len());
        pdf.extend_from_slice(object);
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }

    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_start
        )
        .as_bytes(),
    );

    pdf
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_receipt() -> ReceiptRecord {
        ReceiptRecord {
            booking_id: "b-123".to_string(),
            customer: "Ada (Lovelace)".to_string(),
            room: "101 (Deluxe)".to_string(),
            check_in: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            nights: 2,
            rate_per_day: Money::from_cents(10000),
            total_paid: Money::from_cents(20000),
            payment_method: "Mobile Money".to_string(),
            payment_reference: "MM-20240101-1A2B3C4D".to_string(),
            issued: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_pdf_envelope() {
        let bytes = render_pdf(&sample_receipt());

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_pdf_contains_receipt_fields() {
        let bytes = render_pdf(&sample_receipt());
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("(Receipt #b-123) Tj"));
        // Parentheses in field values are escaped in the literal string.
        assert!(text.contains("(Ada \\(Lovelace\\)) Tj"));
        assert!(text.contains("(101 \\(Deluxe\\)) Tj"));
        assert!(text.contains("(2024-01-01) Tj"));
        assert!(text.contains("($100.00) Tj"));
        assert!(text.contains("($200.00) Tj"));
        assert!(text.contains("(MM-20240101-1A2B3C4D) Tj"));
        assert!(text.contains("(2024-01-01 09:30:00) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_pdf(&sample_receipt());
        let text = String::from_utf8_lossy(&bytes);

        let xref_at = text.rfind("xref\n").unwrap();
        let first_offset: usize = text[xref_at..]
            .lines()
            .nth(3)
            .unwrap()
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[first_offset..].starts_with("1 0 obj"));
    }
}
