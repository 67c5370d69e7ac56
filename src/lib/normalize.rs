use crate::types::{CanonicalDate, Normalized, PaymentMethod};

pub const FALLBACK_DATE: &str = "2025-01-01";

const CENTURY_PREFIX: &str = "20";

/// Turns `d/m/yy` into `YYYY-MM-DD`.
///
/// The year is always prefixed with `20`, whatever its value or width. Day and month are
/// zero-padded to two digits but otherwise passed through, so `99/13/25` is accepted. Anything
/// that is not three `/`-separated runs of digits yields [`FALLBACK_DATE`].
pub fn normalize_date(text: &str) -> Normalized<CanonicalDate> {
    match split_date(text) {
        Some((day, month, year)) => Normalized::Recognized(CanonicalDate::new(format!(
            "{}{}-{:0>2}-{:0>2}",
            CENTURY_PREFIX, year, month, day
        ))),
        None => Normalized::Fallback(CanonicalDate::new(FALLBACK_DATE)),
    }
}

fn split_date(text: &str) -> Option<(&str, &str, &str)> {
    let mut parts = text.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    [day, month, year]
        .iter()
        .all(|part| is_digits(part))
        .then_some((day, month, year))
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Case- and whitespace-insensitive. Unknown methods become `Efectivo`.
pub fn normalize_payment_method(text: &str) -> Normalized<PaymentMethod> {
    match text.trim().to_uppercase().as_str() {
        "EFECTIVO" | "CASH" => Normalized::Recognized(PaymentMethod::Efectivo),
        "YAPE" => Normalized::Recognized(PaymentMethod::Yape),
        "PLIN" => Normalized::Recognized(PaymentMethod::Plin),
        "TARJETA" | "CARD" => Normalized::Recognized(PaymentMethod::Tarjeta),
        "TRANSFERENCIA" => Normalized::Recognized(PaymentMethod::Transferencia),
        _ => Normalized::Fallback(PaymentMethod::Efectivo),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{CanonicalDate, Normalized, PaymentMethod};

    use super::{normalize_date, normalize_payment_method, FALLBACK_DATE};

    fn date(text: &str) -> String {
        normalize_date(text).value().as_str().to_string()
    }

    #[test]
    fn pads_day_and_month() {
        assert_eq!(date("31/12/24"), "2024-12-31");
        assert_eq!(date("1/1/25"), "2025-01-01");
        assert_eq!(date("5/07/26"), "2026-07-05");
    }

    #[test]
    fn always_prefixes_twenty() {
        assert_eq!(date("1/1/99"), "2099-01-01");
        assert_eq!(date("1/1/00"), "2000-01-01");
        assert_eq!(date("1/1/2025"), "202025-01-01");
    }

    #[test]
    fn out_of_range_numbers_pass_through() {
        assert_eq!(
            normalize_date("99/13/25"),
            Normalized::Recognized(CanonicalDate::new("2025-13-99"))
        );
    }

    #[test]
    fn malformed_dates_fall_back() {
        for text in ["bad", "", "01-01-25", "1/1", "1/1/25/3", "a/1/25", "1//25", "1/1/2x"] {
            let sut = normalize_date(text);
            assert!(sut.is_fallback(), "{text:?} should fall back");
            assert_eq!(sut.value().as_str(), FALLBACK_DATE);
        }
    }

    #[test]
    fn payment_methods_ignore_case_and_padding() {
        assert_eq!(
            normalize_payment_method("  yape "),
            Normalized::Recognized(PaymentMethod::Yape)
        );
        assert_eq!(
            normalize_payment_method("CARD"),
            Normalized::Recognized(PaymentMethod::Tarjeta)
        );
        assert_eq!(
            normalize_payment_method("tarjeta"),
            Normalized::Recognized(PaymentMethod::Tarjeta)
        );
        assert_eq!(
            normalize_payment_method("Cash"),
            Normalized::Recognized(PaymentMethod::Efectivo)
        );
        assert_eq!(
            normalize_payment_method("plin"),
            Normalized::Recognized(PaymentMethod::Plin)
        );
        assert_eq!(
            normalize_payment_method("transferencia"),
            Normalized::Recognized(PaymentMethod::Transferencia)
        );
    }

    #[test]
    fn unknown_payment_method_is_cash() {
        assert_eq!(
            normalize_payment_method("bitcoin"),
            Normalized::Fallback(PaymentMethod::Efectivo)
        );
        assert_eq!(
            normalize_payment_method(""),
            Normalized::Fallback(PaymentMethod::Efectivo)
        );
    }

    #[test]
    fn canonical_labels_renormalize_to_themselves() {
        for method in [
            PaymentMethod::Efectivo,
            PaymentMethod::Yape,
            PaymentMethod::Plin,
            PaymentMethod::Tarjeta,
            PaymentMethod::Transferencia,
        ] {
            assert_eq!(normalize_payment_method(method.label()).into_value(), method);
        }
    }
}
