//! Reference number generation for invoices.

use chrono::{Datelike, Utc};
use rand::Rng;

/// Hex alphabet used for the random segment of reference numbers.
const HEX_CHARSET: &[u8] = b"0123456789abcdef";

/// Generates an invoice number of the form `INV-<year>-<8 hex chars>`.
///
/// The random segment gives 16^8 (~4.3 billion) combinations per year;
/// the `invoices.number` unique constraint catches the rare collision.
pub fn generate_invoice_number() -> String {
    invoice_number_for_year(Utc::now().year())
}

/// Generates an invoice number for a specific year.
pub fn invoice_number_for_year(year: i32) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..HEX_CHARSET.len());
            HEX_CHARSET[idx] as char
        })
        .collect();

    format!("INV-{}-{}", year, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_format() {
        let number = invoice_number_for_year(2025);
        assert!(number.starts_with("INV-2025-"));
        assert_eq!(number.len(), "INV-2025-".len() + 8);
    }

    #[test]
    fn test_invoice_number_suffix_is_hex() {
        let number = invoice_number_for_year(2025);
        let suffix = number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(suffix.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_invoice_numbers_are_unique_in_practice() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(invoice_number_for_year(2025)));
        }
    }

    #[test]
    fn test_generate_invoice_number_uses_current_year() {
        let number = generate_invoice_number();
        let year = Utc::now().year().to_string();
        assert!(number.starts_with(&format!("INV-{}-", year)));
    }
}
