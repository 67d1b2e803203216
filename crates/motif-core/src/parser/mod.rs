//! Token layer shared by the output grammars.
//!
//! Grammars walk a single line with [`Cursor`]. Every read skips leading
//! whitespace, so `label:1.5(sd:0.2)` and `label: 1.5 (sd: 0.2)` read alike.

use crate::domain::Scalar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value),
            Self::Float(_) => None,
        }
    }
}

impl From<Numeric> for Scalar {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Integer(value) => Scalar::Integer(value),
            Numeric::Float(value) => Scalar::Float(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.offset += rest.len() - rest.trim_start().len();
    }

    pub fn is_at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.rest().is_empty()
    }

    /// Consumes `literal` when it comes next. Leaves the cursor in place otherwise.
    pub fn eat(&mut self, literal: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(literal) {
            self.offset += literal.len();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, literal: &str) -> Option<()> {
        self.eat(literal).then_some(())
    }

    /// Reads `[+-]?(nan|inf|digits[.digits][e[+-]digits]|.digits...)`, then an
    /// optional `%` that is dropped.
    pub fn number(&mut self) -> Option<Numeric> {
        self.percent_number().map(|(value, _)| value)
    }

    /// Like [`Cursor::number`], also reporting whether a `%` followed.
    pub fn percent_number(&mut self) -> Option<(Numeric, bool)> {
        self.skip_whitespace();
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut end = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            end += 1;
        }

        let word = &rest[end..];
        for special in ["nan", "inf"] {
            if word
                .get(..special.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(special))
            {
                let sign = if rest.starts_with('-') { -1.0 } else { 1.0 };
                let value = if special == "nan" { f64::NAN } else { sign * f64::INFINITY };
                self.offset += end + special.len();
                return Some((Numeric::Float(value), self.eat_suffix('%')));
            }
        }

        let integer_digits = count_digits(&bytes[end..]);
        end += integer_digits;
        let mut is_float = false;
        if bytes.get(end) == Some(&b'.') {
            let fraction_digits = count_digits(&bytes[end + 1..]);
            if integer_digits == 0 && fraction_digits == 0 {
                return None;
            }
            end += 1 + fraction_digits;
            is_float = true;
        } else if integer_digits == 0 {
            return None;
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exponent_end = end + 1;
            if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
                exponent_end += 1;
            }
            let exponent_digits = count_digits(&bytes[exponent_end..]);
            if exponent_digits > 0 {
                end = exponent_end + exponent_digits;
                is_float = true;
            }
        }

        let token = &rest[..end];
        let value = if is_float {
            Numeric::Float(token.parse().ok()?)
        } else {
            Numeric::Integer(token.parse().ok()?)
        };
        self.offset += end;
        Some((value, self.eat_suffix('%')))
    }

    /// Consumes `suffix` only when it follows immediately, without whitespace.
    fn eat_suffix(&mut self, suffix: char) -> bool {
        if self.rest().starts_with(suffix) {
            self.offset += suffix.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn integer(&mut self) -> Option<i64> {
        let checkpoint = self.offset;
        match self.number() {
            Some(Numeric::Integer(value)) => Some(value),
            _ => {
                self.offset = checkpoint;
                None
            }
        }
    }

    /// A run of `0`/`1` characters.
    pub fn bits(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let width = rest
            .bytes()
            .take_while(|byte| matches!(byte, b'0' | b'1'))
            .count();
        if width == 0 {
            return None;
        }
        self.offset += width;
        Some(&rest[..width])
    }

    /// `label: value`.
    pub fn labeled_number(&mut self, label: &str) -> Option<Numeric> {
        self.expect(label)?;
        self.expect(":")?;
        self.number()
    }

    /// `label: mean (sd: stdev)`, read as one two-component value.
    pub fn grouped_field(&mut self, label: &str) -> Option<(Numeric, Numeric)> {
        let mean = self.labeled_number(label)?;
        self.expect("(")?;
        let deviation = self.labeled_number("sd")?;
        self.expect(")")?;
        Some((mean, deviation))
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Splits a line on `separator` and trims each field.
pub fn split_fields(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::{Cursor, Numeric, split_fields};

    #[test]
    fn numbers_cover_integer_decimal_exponent_and_specials() {
        let mut cursor = Cursor::new("12 -4.5 .25 1e-3 +nan -inf 3.");
        assert_eq!(cursor.number(), Some(Numeric::Integer(12)));
        assert_eq!(cursor.number(), Some(Numeric::Float(-4.5)));
        assert_eq!(cursor.number(), Some(Numeric::Float(0.25)));
        assert_eq!(cursor.number(), Some(Numeric::Float(0.001)));
        assert!(matches!(cursor.number(), Some(Numeric::Float(value)) if value.is_nan()));
        assert_eq!(cursor.number(), Some(Numeric::Float(f64::NEG_INFINITY)));
        assert_eq!(cursor.number(), Some(Numeric::Float(3.0)));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn percent_suffix_is_dropped() {
        let mut cursor = Cursor::new("12.5%,7%");
        assert_eq!(cursor.number(), Some(Numeric::Float(12.5)));
        assert!(cursor.eat(","));
        assert_eq!(cursor.number(), Some(Numeric::Integer(7)));
    }

    #[test]
    fn percent_flag_is_reported() {
        let mut cursor = Cursor::new("50% 3");
        assert_eq!(cursor.percent_number(), Some((Numeric::Integer(50), true)));
        assert_eq!(cursor.percent_number(), Some((Numeric::Integer(3), false)));
    }

    #[test]
    fn non_numbers_leave_cursor_in_place() {
        let mut cursor = Cursor::new("freq:5");
        assert_eq!(cursor.number(), None);
        assert_eq!(cursor.rest(), "freq:5");
        assert_eq!(cursor.labeled_number("freq"), Some(Numeric::Integer(5)));
    }

    #[test]
    fn integer_rejects_decimal_without_consuming() {
        let mut cursor = Cursor::new("4.5");
        assert_eq!(cursor.integer(), None);
        assert_eq!(cursor.rest(), "4.5");
    }

    #[test]
    fn grouped_field_reads_with_or_without_spaces() {
        let mut tight = Cursor::new("ave_rand_freq:4.5(sd:0.3)");
        assert_eq!(
            tight.grouped_field("ave_rand_freq"),
            Some((Numeric::Float(4.5), Numeric::Float(0.3)))
        );
        let mut loose = Cursor::new("ave_rand_freq: 4.50 (sd: 0.300)");
        assert_eq!(
            loose.grouped_field("ave_rand_freq"),
            Some((Numeric::Float(4.5), Numeric::Float(0.3)))
        );
    }

    #[test]
    fn bits_stop_at_first_other_character() {
        let mut cursor = Cursor::new("0110,12");
        assert_eq!(cursor.bits(), Some("0110"));
        assert_eq!(cursor.rest(), ",12");
        assert_eq!(split_fields(" a , b ,", ','), vec!["a", "b", ""]);
    }
}
