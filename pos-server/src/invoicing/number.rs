//! Invoice number formatting
//!
//! Numbers take the form "F-0001": a fixed prefix, a dash, and the
//! sequence value zero-padded to four digits. Values past 9999 simply
//! widen, so "F-10000" follows "F-9999".

/// Prefix for fiscal invoice numbers
pub const INVOICE_PREFIX: &str = "F";

/// Render a sequence value as an invoice number
pub fn format_number(value: i64) -> String {
    format!("{}-{:04}", INVOICE_PREFIX, value)
}

/// Extract the sequence value from an invoice number. Returns `None`
/// for strings that do not carry a numeric suffix.
pub fn parse_number(number: &str) -> Option<i64> {
    let (_, suffix) = number.rsplit_once('-')?;
    suffix.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_number(1), "F-0001");
        assert_eq!(format_number(42), "F-0042");
        assert_eq!(format_number(9999), "F-9999");
    }

    #[test]
    fn widens_past_four_digits() {
        assert_eq!(format_number(10000), "F-10000");
        assert_eq!(format_number(123456), "F-123456");
    }

    #[test]
    fn parses_back_what_it_formats() {
        assert_eq!(parse_number("F-0001"), Some(1));
        assert_eq!(parse_number("F-10000"), Some(10000));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_eq!(parse_number("F-"), None);
        assert_eq!(parse_number("0001"), None);
        assert_eq!(parse_number("F-abc"), None);
    }
}
