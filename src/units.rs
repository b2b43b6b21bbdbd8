//! Numeric literals with engineering-unit suffixes.
//!
//! Both the netlist lexer and the expression lexer share these rules:
//!
//! ```text
//! number   = [sign] mantissa [exponent | suffix letter*]
//! mantissa = digit+ ['.' digit*] | '.' digit+
//! exponent = ('e' | 'E') [sign] digit+
//! suffix   = "t" | "g" | "meg" | "mil" | "k" | "m" | "u" | "n" | "p" | "f"
//! ```
//!
//! Suffixes are matched case-insensitively, longest first, so `1meg`, `1mil`
//! and `1m` scale differently. Letters after the suffix are ignored (`10mA`,
//! `1uF`).

use std::fmt;

/// Engineering-unit suffix of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSuffix {
    Tera,
    Giga,
    Mega,
    Mil,
    Kilo,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
}

impl UnitSuffix {
    /// Suffix spellings in match order (multi-letter spellings before `m`).
    const TABLE: [(&'static str, UnitSuffix); 10] = [
        ("meg", UnitSuffix::Mega),
        ("mil", UnitSuffix::Mil),
        ("t", UnitSuffix::Tera),
        ("g", UnitSuffix::Giga),
        ("k", UnitSuffix::Kilo),
        ("m", UnitSuffix::Milli),
        ("u", UnitSuffix::Micro),
        ("n", UnitSuffix::Nano),
        ("p", UnitSuffix::Pico),
        ("f", UnitSuffix::Femto),
    ];

    /// Scale factor applied to the mantissa.
    pub fn scale(&self) -> f64 {
        match self {
            Self::Tera => 1e12,
            Self::Giga => 1e9,
            Self::Mega => 1e6,
            Self::Mil => 25.4e-6,
            Self::Kilo => 1e3,
            Self::Milli => 1e-3,
            Self::Micro => 1e-6,
            Self::Nano => 1e-9,
            Self::Pico => 1e-12,
            Self::Femto => 1e-15,
        }
    }

    /// Canonical lowercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tera => "t",
            Self::Giga => "g",
            Self::Mega => "meg",
            Self::Mil => "mil",
            Self::Kilo => "k",
            Self::Milli => "m",
            Self::Micro => "u",
            Self::Nano => "n",
            Self::Pico => "p",
            Self::Femto => "f",
        }
    }

    /// Match the longest suffix at the start of `text`.
    ///
    /// Returns the suffix and the number of bytes it spans.
    pub fn match_prefix(text: &str) -> Option<(Self, usize)> {
        let folded = text.to_ascii_lowercase();
        Self::TABLE
            .iter()
            .find(|(spelling, _)| folded.starts_with(spelling))
            .map(|(spelling, suffix)| (*suffix, spelling.len()))
    }
}

impl fmt::Display for UnitSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed numeric literal: the unscaled mantissa plus its unit suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    /// Value before suffix scaling (exponent already applied)
    pub mantissa: f64,
    /// Recognized unit suffix, if any
    pub suffix: Option<UnitSuffix>,
}

impl Number {
    /// Scaled value of the literal.
    pub fn value(&self) -> f64 {
        match self.suffix {
            Some(suffix) => self.mantissa * suffix.scale(),
            None => self.mantissa,
        }
    }
}

/// Parse a complete numeric literal.
///
/// Returns `None` unless the whole of `text` matches the literal grammar.
pub fn parse_number(text: &str) -> Option<Number> {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return None;
    }

    let mantissa_end = i;
    let rest = &text[mantissa_end..];
    if rest.is_empty() {
        return text.parse::<f64>().ok().map(|mantissa| Number {
            mantissa,
            suffix: None,
        });
    }

    if is_exponent(rest) {
        return text.parse::<f64>().ok().map(|mantissa| Number {
            mantissa,
            suffix: None,
        });
    }

    let (suffix, len) = UnitSuffix::match_prefix(rest)?;
    if !rest[len..].bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    text[..mantissa_end].parse::<f64>().ok().map(|mantissa| Number {
        mantissa,
        suffix: Some(suffix),
    })
}

/// Parse a numeric literal and return its scaled value.
pub fn parse_value(text: &str) -> Option<f64> {
    parse_number(text.trim()).map(|n| n.value())
}

fn is_exponent(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'e') | Some(b'E')) {
        return false;
    }
    let mut i = 1;
    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    i < bytes.len() && bytes[i..].iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1t", 1e12)]
    #[case("1g", 1e9)]
    #[case("2.5meg", 2_500_000.0)]
    #[case("10mil", 10.0 * 25.4e-6)]
    #[case("4.7k", 4.7 * 1e3)]
    #[case("1m", 1e-3)]
    #[case("1u", 1e-6)]
    #[case("100n", 100.0 * 1e-9)]
    #[case("10p", 10.0 * 1e-12)]
    #[case("3f", 3.0 * 1e-15)]
    fn test_suffix_scaling(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_value(text), Some(expected));
    }

    #[test]
    fn test_suffix_disambiguation() {
        let meg = parse_value("1meg").unwrap();
        let milli = parse_value("1m").unwrap();
        let mil = parse_value("1mil").unwrap();
        assert_eq!(meg, 1e6);
        assert_eq!(milli, 1e-3);
        assert_eq!(mil, 25.4e-6);
        assert_ne!(meg, milli);
        assert_ne!(milli, mil);
    }

    #[test]
    fn test_case_and_trailing_letters() {
        assert_eq!(parse_value("1MEG"), Some(1e6));
        assert_eq!(parse_value("10mA"), Some(10.0 * 1e-3));
        assert_eq!(parse_value("1uF"), Some(1e-6));
        assert_eq!(parse_value("2megohm"), Some(2e6));
    }

    #[test]
    fn test_plain_and_exponent() {
        assert_eq!(parse_value("123"), Some(123.0));
        assert_eq!(parse_value(".5"), Some(0.5));
        assert_eq!(parse_value("12.34"), Some(12.34));
        assert_eq!(parse_value("1e-3"), Some(1e-3));
        assert_eq!(parse_value("-2.5E+2"), Some(-250.0));
        assert_eq!(parse_value("+4"), Some(4.0));
    }

    #[test]
    fn test_number_keeps_unscaled_mantissa() {
        let n = parse_number("2.5meg").unwrap();
        assert_eq!(n.mantissa, 2.5);
        assert_eq!(n.suffix, Some(UnitSuffix::Mega));
        let n = parse_number("1e3").unwrap();
        assert_eq!(n.mantissa, 1000.0);
        assert_eq!(n.suffix, None);
    }

    #[test]
    fn test_rejects_non_literals() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("1e"), None);
        assert_eq!(parse_number("5v"), None);
        assert_eq!(parse_number("1n5"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }
}
