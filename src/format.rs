//! Locale-aware display formatting for amounts, dates and phone numbers.

use chrono::{Datelike, NaiveDate};

use crate::compute;
use crate::i18n::Lang;

pub const CURRENCY: &str = "FCFA";

/// Money display: space-grouped thousands, two decimals, locale decimal
/// separator, currency suffix. Negative amounts keep their sign.
pub fn amount(value: f64, lang: Lang) -> String {
    let value = compute::num(value);
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let separator = match lang {
        Lang::Fr => ',',
        Lang::En => '.',
    };
    format!(
        "{sign}{}{separator}{:02} {CURRENCY}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Bare quantity or rate: no grouping, decimals only when needed, locale
/// decimal separator.
pub fn quantity(value: f64, lang: Lang) -> String {
    let value = compute::num(value);
    let text = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let mut text = format!("{value:.2}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    };
    match lang {
        Lang::Fr => text.replace('.', ","),
        Lang::En => text,
    }
}

/// Long document-body form: day, localized month name, year.
pub fn long_date(date: NaiveDate, lang: Lang) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        lang.month_name(date.month()),
        date.year()
    )
}

/// Compact numeric form for dense layouts and list rows.
pub fn short_date(date: NaiveDate, lang: Lang) -> String {
    match lang {
        Lang::Fr => date.format("%d/%m/%Y").to_string(),
        Lang::En => date.format("%m/%d/%Y").to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Burkina Faso phone display grouping: `+226 XX XX XX XX`.
pub fn phone(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("+226")
        .or_else(|| cleaned.strip_prefix("00226"))
        .unwrap_or(&cleaned);
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        format!(
            "+226 {} {} {} {}",
            &digits[0..2],
            &digits[2..4],
            &digits[4..6],
            &digits[6..8]
        )
    } else {
        raw.to_string()
    }
}

fn group_thousands(mut n: i64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push((n % 1000) as u16);
        n /= 1000;
    }
    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&group.to_string());
        } else {
            out.push(' ');
            out.push_str(&format!("{group:03}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands_with_spaces() {
        assert_eq!(amount(1_234_567.89, Lang::Fr), "1 234 567,89 FCFA");
        assert_eq!(amount(1_234_567.89, Lang::En), "1 234 567.89 FCFA");
    }

    #[test]
    fn small_and_zero_amounts() {
        assert_eq!(amount(0.0, Lang::Fr), "0,00 FCFA");
        assert_eq!(amount(42.5, Lang::En), "42.50 FCFA");
    }

    #[test]
    fn negative_amounts_keep_their_sign() {
        assert_eq!(amount(-50.0, Lang::Fr), "-50,00 FCFA");
        assert_eq!(amount(-1050.25, Lang::En), "-1 050.25 FCFA");
    }

    #[test]
    fn non_finite_amounts_render_as_zero() {
        assert_eq!(amount(f64::NAN, Lang::En), "0.00 FCFA");
    }

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(quantity(2.0, Lang::Fr), "2");
        assert_eq!(quantity(2.5, Lang::Fr), "2,5");
        assert_eq!(quantity(2.5, Lang::En), "2.5");
        assert_eq!(quantity(0.25, Lang::En), "0.25");
        // rounds to two decimals and never leaves a dangling separator
        assert_eq!(quantity(3.004, Lang::En), "3");
    }

    #[test]
    fn long_dates_use_localized_month_names() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(long_date(date, Lang::Fr), "05 août 2026");
        assert_eq!(long_date(date, Lang::En), "05 August 2026");
    }

    #[test]
    fn short_dates_follow_locale_order() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(short_date(date, Lang::Fr), "05/08/2026");
        assert_eq!(short_date(date, Lang::En), "08/05/2026");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("nope"));
        assert!(!is_valid_email("x@y"));
    }

    #[test]
    fn phone_grouping() {
        assert_eq!(phone("70123456"), "+226 70 12 34 56");
        assert_eq!(phone("+22670123456"), "+226 70 12 34 56");
        assert_eq!(phone("not a phone"), "not a phone");
    }
}
