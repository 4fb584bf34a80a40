//! pp-number-to-constant subtyping (spec.md §4.6, C23 §6.4.4).
//!
//! The original implements this as a `goto`-driven state forest
//! (`cc_token_convert_radix`); per the Design Notes this is reimplemented
//! here as an explicit state machine over the pp-number lexeme, with no
//! unstructured jumps.
//!
//! Scope: base detection (`0x`/`0b`/`0`/decimal), digit runs with `'`
//! digit-separators (may not begin, end, or double a run), an optional
//! `.`, an optional exponent (`e`/`E` for decimal, `p`/`P` for hex, with an
//! optional sign), and suffixes `u`/`U`, `l`/`L`/`ll`/`LL`, `wb`/`WB`
//! (`_BitInt`), `f`/`F`, and the decimal-float suffixes `df`/`dd`/`dl`
//! (`_Decimal32`/`_Decimal64`/`_Decimal128`, case-insensitively).

use cc_util::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

/// Integer-constant suffix combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntSuffix {
    pub unsigned: bool,
    /// 0 = no `l`/`L`, 1 = `l`/`L`, 2 = `ll`/`LL`.
    pub long_count: u8,
    /// `wb`/`WB`: `_BitInt` literal suffix (C23).
    pub bit_precise: bool,
}

/// Floating-constant suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatSuffix {
    /// No suffix: `double`.
    None,
    /// `f`/`F`: `float`.
    Float,
    /// `l`/`L`: `long double`.
    LongDouble,
    /// `df`/`DF`: `_Decimal32`.
    Decimal32,
    /// `dd`/`DD`: `_Decimal64`.
    Decimal64,
    /// `dl`/`DL`: `_Decimal128`.
    Decimal128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberKind {
    Integer(IntSuffix),
    Floating(FloatSuffix),
}

/// The result of classifying a pp-number lexeme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberConstant {
    pub kind: NumberKind,
    pub radix: Radix,
    /// The digit text with `'` separators and suffix stripped (mantissa
    /// and, for floats, the `.`/exponent), exactly as it appeared.
    pub digits: String,
}

/// Drives the pp-number-to-constant state machine over one lexeme.
pub struct NumberClassifier<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DigitRunState {
    /// Nothing consumed yet in this run; a `'` here would be leading.
    Start,
    /// At least one digit consumed; a `'` is legal if a digit follows.
    AfterDigit,
    /// Just consumed a `'`; the next character must be a digit.
    AfterSeparator,
}

impl<'a> NumberClassifier<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, bytes: text.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes one digit run (hex digits if `hex`, decimal otherwise),
    /// enforcing the `'`-separator placement rule. Returns the number of
    /// digits consumed (excluding separators); zero digits is legal (the
    /// caller decides whether an empty run is an error in context).
    fn consume_digit_run(&mut self, hex: bool) -> Result<usize> {
        let is_digit = |b: u8| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() };
        let mut state = DigitRunState::Start;
        let mut count = 0;
        loop {
            match self.peek() {
                Some(b) if is_digit(b) => {
                    self.bump();
                    count += 1;
                    state = DigitRunState::AfterDigit;
                }
                Some(b'\'') if state == DigitRunState::AfterDigit => {
                    self.bump();
                    state = DigitRunState::AfterSeparator;
                }
                _ => break,
            }
        }
        if state == DigitRunState::AfterSeparator {
            return Err(Error::InvalidLex(format!(
                "pp-number '{}' ends a digit run with a dangling separator",
                self.text
            )));
        }
        Ok(count)
    }

    fn consume_sign(&mut self) -> bool {
        matches!(self.peek(), Some(b'+') | Some(b'-'))
    }

    /// Classify the whole lexeme. Consumes no characters past what it
    /// needs; any leftover text that isn't a recognized suffix is an error.
    pub fn classify(mut self) -> Result<NumberConstant> {
        let start = self.pos;
        let radix = self.detect_radix();
        let is_hex = radix == Radix::Hex;

        if is_hex {
            self.pos += 2; // "0x"/"0X"
        } else if radix == Radix::Binary {
            self.pos += 2; // "0b"/"0B"
        }

        let digit_start = self.pos;
        self.consume_digit_run(is_hex)?;

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.bump();
            self.consume_digit_run(is_hex)?;
        }

        let exponent_marker = if is_hex { [b'p', b'P'] } else { [b'e', b'E'] };
        if matches!(self.peek(), Some(b) if exponent_marker.contains(&b)) {
            is_float = true;
            self.bump();
            if self.consume_sign() {
                self.bump();
            }
            let exp_digits = self.consume_digit_run(false)?;
            if exp_digits == 0 {
                return Err(Error::InvalidLex(format!("pp-number '{}' has an empty exponent", self.text)));
            }
        } else if is_hex && is_float {
            return Err(Error::InvalidLex(format!(
                "hexadecimal floating constant '{}' is missing a binary exponent",
                self.text
            )));
        }

        let digits = self.text[digit_start..self.pos].to_string();
        let suffix_text = &self.text[self.pos..];

        let kind = if is_float {
            NumberKind::Floating(parse_float_suffix(suffix_text)?)
        } else {
            NumberKind::Integer(parse_int_suffix(suffix_text)?)
        };

        debug_assert!(start <= digit_start);
        Ok(NumberConstant { kind, radix, digits })
    }

    fn detect_radix(&self) -> Radix {
        if self.bytes.first() == Some(&b'0') {
            match self.peek_at(1) {
                Some(b'x') | Some(b'X') => return Radix::Hex,
                Some(b'b') | Some(b'B') => return Radix::Binary,
                Some(b'0'..=b'7') => return Radix::Octal,
                _ => return Radix::Octal,
            }
        }
        Radix::Decimal
    }
}

fn parse_int_suffix(s: &str) -> Result<IntSuffix> {
    let mut unsigned = false;
    let mut long_count = 0u8;
    let mut bit_precise = false;
    let mut rest = s;

    loop {
        let lower_pair = rest.get(0..2).map(|p| p.to_ascii_lowercase());
        if !unsigned && (rest.starts_with('u') || rest.starts_with('U')) {
            unsigned = true;
            rest = &rest[1..];
        } else if long_count == 0 && lower_pair.as_deref() == Some("ll") {
            long_count = 2;
            rest = &rest[2..];
        } else if long_count == 0 && (rest.starts_with('l') || rest.starts_with('L')) {
            long_count = 1;
            rest = &rest[1..];
        } else if !bit_precise && lower_pair.as_deref() == Some("wb") {
            bit_precise = true;
            rest = &rest[2..];
        } else {
            break;
        }
    }

    if !rest.is_empty() {
        return Err(Error::InvalidLex(format!("invalid integer-constant suffix '{s}'")));
    }
    Ok(IntSuffix { unsigned, long_count, bit_precise })
}

fn parse_float_suffix(s: &str) -> Result<FloatSuffix> {
    let lower = s.to_ascii_lowercase();
    Ok(match lower.as_str() {
        "" => FloatSuffix::None,
        "f" => FloatSuffix::Float,
        "l" => FloatSuffix::LongDouble,
        "df" => FloatSuffix::Decimal32,
        "dd" => FloatSuffix::Decimal64,
        "dl" => FloatSuffix::Decimal128,
        _ => return Err(Error::InvalidLex(format!("invalid floating-constant suffix '{s}'"))),
    })
}

/// Classify a pp-number lexeme in one call.
pub fn classify(text: &str) -> Result<NumberConstant> {
    NumberClassifier::new(text).classify()
}
