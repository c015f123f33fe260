//! Totals derivation and invoice numbering. Everything here is a pure
//! function of its arguments; invalid numeric input coerces to zero
//! instead of raising.

use crate::model::LineItem;

pub const NUMBER_PREFIX: &str = "FAC";

/// Clamp non-finite values to zero so a stray NaN in a stored record can
/// never poison a total.
pub fn num(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Sum of quantity × unit price over all items. Empty sequence sums to zero.
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

pub fn tax(subtotal: f64, tax_rate: f64) -> f64 {
    num(subtotal) * num(tax_rate) / 100.0
}

/// Grand total. Deliberately not floored at zero: a discount larger than
/// subtotal + tax yields a negative total.
pub fn total(subtotal: f64, tax: f64, discount: f64) -> f64 {
    num(subtotal) + num(tax) - num(discount)
}

/// Next sequential number in the `FAC-YEAR-NNNN` scheme. `last` is the most
/// recently issued number, if any. Malformed input falls back to 0001
/// rather than failing.
pub fn next_invoice_number(last: Option<&str>, year: i32) -> String {
    let next = last
        .and_then(|number| number.rsplit('-').next())
        .and_then(|segment| segment.trim().parse::<u32>().ok())
        .unwrap_or(0)
        .wrapping_add(1);
    format!("{NUMBER_PREFIX}-{year}-{next:04}")
}

/// Numeric text-input coercion for the form boundary: both `.` and `,` are
/// accepted as decimal separator, anything unparseable is zero.
pub fn coerce_amount(input: &str) -> f64 {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map(num)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, unit_price: f64) -> LineItem {
        LineItem {
            description: String::new(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn subtotal_of_empty_sequence_is_zero() {
        assert_eq!(subtotal(&[]), 0.0);
    }

    #[test]
    fn subtotal_sums_quantity_times_price() {
        let items = [item(2.0, 500.0), item(0.5, 100.0)];
        assert_eq!(subtotal(&items), 1050.0);
    }

    #[test]
    fn non_finite_fields_count_as_zero() {
        let items = [item(f64::NAN, 500.0), item(2.0, f64::INFINITY), item(3.0, 10.0)];
        assert_eq!(subtotal(&items), 30.0);
    }

    #[test]
    fn tax_at_zero_rate_is_zero() {
        assert_eq!(tax(123_456.78, 0.0), 0.0);
        assert_eq!(tax(1000.0, 20.0), 200.0);
    }

    #[test]
    fn total_is_not_floored() {
        assert_eq!(total(100.0, 0.0, 150.0), -50.0);
    }

    #[test]
    fn single_item_with_zero_rates_equals_line_total() {
        let items = [item(3.0, 40.0)];
        let s = subtotal(&items);
        let t = total(s, tax(s, 0.0), 0.0);
        assert_eq!(s, 120.0);
        assert_eq!(t, 120.0);
    }

    #[test]
    fn end_to_end_scenario() {
        let items = [item(2.0, 500.0)];
        let s = subtotal(&items);
        let tx = tax(s, 20.0);
        let tot = total(s, tx, 50.0);
        assert_eq!(s, 1000.0);
        assert_eq!(tx, 200.0);
        assert_eq!(tot, 1150.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let items = [item(1.7, 333.33), item(4.0, 12.5)];
        let first = (subtotal(&items), tax(subtotal(&items), 18.0));
        let second = (subtotal(&items), tax(subtotal(&items), 18.0));
        assert_eq!(first.0.to_bits(), second.0.to_bits());
        assert_eq!(first.1.to_bits(), second.1.to_bits());
    }

    #[test]
    fn first_number_of_a_year() {
        assert_eq!(next_invoice_number(None, 2025), "FAC-2025-0001");
    }

    #[test]
    fn numbers_increment_within_a_year() {
        assert_eq!(
            next_invoice_number(Some("FAC-2025-0042"), 2025),
            "FAC-2025-0043"
        );
    }

    #[test]
    fn malformed_last_number_restarts_the_sequence() {
        assert_eq!(next_invoice_number(Some("garbage"), 2025), "FAC-2025-0001");
        assert_eq!(next_invoice_number(Some(""), 2025), "FAC-2025-0001");
        assert_eq!(next_invoice_number(Some("FAC--"), 2025), "FAC-2025-0001");
    }

    #[test]
    fn padding_grows_past_four_digits() {
        assert_eq!(
            next_invoice_number(Some("FAC-2025-9999"), 2025),
            "FAC-2025-10000"
        );
    }

    #[test]
    fn coercion_defaults_to_zero() {
        assert_eq!(coerce_amount("12,5"), 12.5);
        assert_eq!(coerce_amount(" 7.25 "), 7.25);
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("inf"), 0.0);
    }
}
