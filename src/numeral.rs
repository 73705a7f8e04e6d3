//! Rendering of unsigned integers as numerals over arbitrary alphabets.
//!
//! Extracted random integers are often needed as short printable strings
//! (identifiers, passwords, tokens). This module converts between integers
//! and positional numerals whose digits are the symbols of an
//! [`Alphabet`]. The first symbol is digit zero, the second digit one, and
//! so on; the base is the number of unique symbols.
//!
//! Integers of any size are handled as big-endian byte strings
//! ([`encode_bytes`], [`decode_bytes`]); [`encode`] and [`decode`] are the
//! `u128` conveniences.
//!
//! # Examples
//!
//! ```
//! use qrand_core::numeral::{self, Alphabet};
//!
//! let hex = Alphabet::new("0123456789abcdef").unwrap();
//! assert_eq!(numeral::encode(255, &hex).unwrap(), "ff");
//! assert_eq!(numeral::decode("ff", &hex).unwrap(), 255);
//!
//! assert_eq!(numeral::encode_base32(32).unwrap(), "BA");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "<>.,:;_-+*=?!|@#$%&/()";

/// Error returned by numeral conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumeralError {
    /// Zero has no numeral
    NotPositive,
    /// The numeral to decode is empty
    Empty,
    /// The numeral contains a symbol outside the alphabet
    UnknownSymbol(char),
    /// The alphabet has fewer than two unique symbols
    TooFewSymbols(usize),
    /// The decoded value does not fit the requested integer type
    Overflow,
}

impl fmt::Display for NumeralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive => write!(f, "only integers >= 1 can be encoded"),
            Self::Empty => write!(f, "empty numeral"),
            Self::UnknownSymbol(c) => write!(f, "symbol {:?} is not in the alphabet", c),
            Self::TooFewSymbols(n) => {
                write!(f, "alphabet needs at least 2 unique symbols, got {}", n)
            }
            Self::Overflow => write!(f, "value does not fit in 128 bits"),
        }
    }
}

impl std::error::Error for NumeralError {}

/// An ordered set of unique digit symbols.
///
/// Duplicate symbols are collapsed to their first occurrence, preserving
/// order, so `"aabcb"` is the three-symbol alphabet `"abc"`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    values: HashMap<char, u32>,
}

impl Alphabet {
    /// Builds an alphabet from the given symbols.
    ///
    /// An empty string selects the default alphabet.
    ///
    /// # Errors
    ///
    /// Returns `TooFewSymbols` if fewer than two unique symbols remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use qrand_core::numeral::Alphabet;
    ///
    /// let alphabet = Alphabet::new("xyxz").unwrap();
    /// assert_eq!(alphabet.as_string(), "xyz");
    /// assert_eq!(alphabet.base(), 3);
    ///
    /// assert!(Alphabet::new("aaaa").is_err());
    /// ```
    pub fn new(symbols: &str) -> Result<Self, NumeralError> {
        if symbols.is_empty() {
            return Ok(Self::default_alphabet().clone());
        }

        let mut unique = Vec::new();
        let mut values = HashMap::new();
        for c in symbols.chars() {
            if !values.contains_key(&c) {
                values.insert(c, unique.len() as u32);
                unique.push(c);
            }
        }

        if unique.len() < 2 {
            return Err(NumeralError::TooFewSymbols(unique.len()));
        }

        Ok(Self {
            symbols: unique,
            values,
        })
    }

    /// Upper and lower case letters, digits and `<>.,:;_-+*=?!|@#$%&/()`.
    pub fn default_alphabet() -> &'static Alphabet {
        static DEFAULT: OnceLock<Alphabet> = OnceLock::new();
        DEFAULT.get_or_init(|| Self::from_static(&[UPPER, LOWER, NUMBERS, SYMBOLS]))
    }

    /// The RFC 4648 base32 alphabet, `A-Z2-7`.
    pub fn base32() -> &'static Alphabet {
        static BASE32: OnceLock<Alphabet> = OnceLock::new();
        BASE32.get_or_init(|| Self::from_static(&[UPPER, "234567"]))
    }

    /// The RFC 4648 base64 alphabet, `A-Za-z0-9+/`.
    pub fn base64() -> &'static Alphabet {
        static BASE64: OnceLock<Alphabet> = OnceLock::new();
        BASE64.get_or_init(|| Self::from_static(&[UPPER, LOWER, NUMBERS, "+/"]))
    }

    fn from_static(parts: &[&str]) -> Alphabet {
        let symbols: Vec<char> = parts.iter().flat_map(|p| p.chars()).collect();
        let values = symbols
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u32))
            .collect();
        Alphabet { symbols, values }
    }

    /// Number of unique symbols, i.e. the numeral base.
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// The symbols in digit order.
    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Returns `true` if `c` is one of the symbols.
    pub fn contains(&self, c: char) -> bool {
        self.values.contains_key(&c)
    }

    fn digit(&self, c: char) -> Result<u32, NumeralError> {
        self.values
            .get(&c)
            .copied()
            .ok_or(NumeralError::UnknownSymbol(c))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::default_alphabet().clone()
    }
}

/// Encodes a big-endian unsigned integer of any length.
///
/// # Errors
///
/// Returns `NotPositive` if the value is zero (including an empty slice).
pub fn encode_bytes(value_be: &[u8], alphabet: &Alphabet) -> Result<String, NumeralError> {
    let start = value_be
        .iter()
        .position(|&b| b != 0)
        .ok_or(NumeralError::NotPositive)?;

    let base = alphabet.base() as u64;
    let mut dividend: Vec<u8> = value_be[start..].to_vec();
    let mut numeral = Vec::new();

    // Schoolbook long division by the base, least significant digit first
    while !dividend.is_empty() {
        let mut remainder: u64 = 0;
        let mut quotient = Vec::with_capacity(dividend.len());
        for &byte in &dividend {
            let acc = (remainder << 8) | u64::from(byte);
            let q = acc / base;
            remainder = acc % base;
            if !quotient.is_empty() || q != 0 {
                // q < 256 because remainder < base
                quotient.push(q as u8);
            }
        }
        numeral.push(alphabet.symbols[remainder as usize]);
        dividend = quotient;
    }

    Ok(numeral.iter().rev().collect())
}

/// Decodes a numeral into a minimal big-endian byte string.
///
/// A numeral whose value is zero decodes to an empty vector.
///
/// # Errors
///
/// Returns `Empty` for an empty numeral and `UnknownSymbol` for a symbol
/// outside the alphabet.
pub fn decode_bytes(numeral: &str, alphabet: &Alphabet) -> Result<Vec<u8>, NumeralError> {
    if numeral.is_empty() {
        return Err(NumeralError::Empty);
    }

    let base = alphabet.base() as u64;
    // Little-endian while accumulating
    let mut value: Vec<u8> = Vec::new();

    for c in numeral.chars() {
        let mut carry = u64::from(alphabet.digit(c)?);
        for byte in value.iter_mut() {
            let acc = u64::from(*byte) * base + carry;
            *byte = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        while carry != 0 {
            value.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    while value.last() == Some(&0) {
        value.pop();
    }
    value.reverse();
    Ok(value)
}

/// Encodes a positive integer.
///
/// # Errors
///
/// Returns `NotPositive` for zero.
pub fn encode(value: u128, alphabet: &Alphabet) -> Result<String, NumeralError> {
    encode_bytes(&value.to_be_bytes(), alphabet)
}

/// Decodes a numeral into a `u128`.
///
/// # Errors
///
/// Returns `Overflow` if the value needs more than 128 bits, plus the
/// errors of [`decode_bytes`].
pub fn decode(numeral: &str, alphabet: &Alphabet) -> Result<u128, NumeralError> {
    let bytes = decode_bytes(numeral, alphabet)?;
    if bytes.len() > 16 {
        return Err(NumeralError::Overflow);
    }
    Ok(bytes.iter().fold(0u128, |acc, &b| (acc << 8) | u128::from(b)))
}

/// Encodes with the base32 alphabet.
pub fn encode_base32(value: u128) -> Result<String, NumeralError> {
    encode(value, Alphabet::base32())
}

/// Decodes a base32 numeral.
pub fn decode_base32(numeral: &str) -> Result<u128, NumeralError> {
    decode(numeral, Alphabet::base32())
}

/// Encodes with the base64 alphabet.
pub fn encode_base64(value: u128) -> Result<String, NumeralError> {
    encode(value, Alphabet::base64())
}

/// Decodes a base64 numeral.
pub fn decode_base64(numeral: &str) -> Result<u128, NumeralError> {
    decode(numeral, Alphabet::base64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_layout() {
        let alphabet = Alphabet::default_alphabet();

        assert_eq!(alphabet.base(), 84);
        assert_eq!(encode(1, alphabet).unwrap(), "B");
        assert_eq!(encode(84, alphabet).unwrap(), "BA");
        assert_eq!(decode(")", alphabet).unwrap(), 83);
    }

    #[test]
    fn empty_alphabet_selects_default() {
        let alphabet = Alphabet::new("").unwrap();
        assert_eq!(alphabet.as_string(), Alphabet::default().as_string());
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let alphabet = Alphabet::new("bab0ab1").unwrap();

        assert_eq!(alphabet.as_string(), "ba01");
        assert_eq!(alphabet.base(), 4);
        assert_eq!(encode(1, &alphabet).unwrap(), "a");
    }

    #[test]
    fn single_symbol_alphabet_rejected() {
        assert_eq!(Alphabet::new("zzz").unwrap_err(), NumeralError::TooFewSymbols(1));
    }

    #[test]
    fn zero_is_not_encodable() {
        let alphabet = Alphabet::default();

        assert_eq!(encode(0, &alphabet).unwrap_err(), NumeralError::NotPositive);
        assert_eq!(encode_bytes(&[], &alphabet).unwrap_err(), NumeralError::NotPositive);
        assert_eq!(encode_bytes(&[0, 0], &alphabet).unwrap_err(), NumeralError::NotPositive);
    }

    #[test]
    fn decode_errors() {
        let alphabet = Alphabet::base32();

        assert_eq!(decode("", alphabet).unwrap_err(), NumeralError::Empty);
        assert_eq!(decode("AB1", alphabet).unwrap_err(), NumeralError::UnknownSymbol('1'));
        assert_eq!(decode("AAAA", alphabet).unwrap(), 0);
    }

    #[test]
    fn decode_overflow() {
        let max = encode(u128::MAX, Alphabet::base64()).unwrap();
        assert_eq!(decode(&max, Alphabet::base64()).unwrap(), u128::MAX);

        let too_big = format!("{}A", max);
        assert_eq!(decode(&too_big, Alphabet::base64()).unwrap_err(), NumeralError::Overflow);
    }

    #[test]
    fn base32_and_base64_known_values() {
        assert_eq!(encode_base32(1).unwrap(), "B");
        assert_eq!(encode_base32(31).unwrap(), "7");
        assert_eq!(decode_base32("BA").unwrap(), 32);

        assert_eq!(encode_base64(63).unwrap(), "/");
        assert_eq!(encode_base64(64).unwrap(), "BA");
        assert_eq!(decode_base64("+").unwrap(), 62);
    }

    #[test]
    fn binary_alphabet_matches_radix_two() {
        let binary = Alphabet::new("01").unwrap();
        assert_eq!(encode(10, &binary).unwrap(), "1010");
        assert_eq!(decode("0001010", &binary).unwrap(), 10);
    }

    #[test]
    fn bytes_beyond_u128() {
        let hex = Alphabet::new("0123456789abcdef").unwrap();
        let value = [0x01u8; 40];

        let numeral = encode_bytes(&value, &hex).unwrap();

        assert_eq!(numeral, "01".repeat(40).trim_start_matches('0'));
        assert_eq!(decode_bytes(&numeral, &hex).unwrap(), value.to_vec());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_alphabet() -> impl Strategy<Value = Alphabet> {
            prop::collection::vec(any::<char>(), 2..120)
                .prop_filter_map("needs two unique symbols", |chars| {
                    let s: String = chars.into_iter().collect();
                    Alphabet::new(&s).ok()
                })
        }

        proptest! {
            /// Property: decode(encode(u)) == u for any alphabet
            #[test]
            fn proptest_round_trip_u128(value in 1u128.., alphabet in arb_alphabet()) {
                let numeral = encode(value, &alphabet).unwrap();
                prop_assert_eq!(decode(&numeral, &alphabet).unwrap(), value);
            }

            /// Property: arbitrary precision round trip through bytes
            #[test]
            fn proptest_round_trip_bytes(
                head in 1u8..,
                tail in prop::collection::vec(any::<u8>(), 0..64),
                alphabet in arb_alphabet()
            ) {
                let mut value = vec![head];
                value.extend(tail);

                let numeral = encode_bytes(&value, &alphabet).unwrap();
                prop_assert_eq!(decode_bytes(&numeral, &alphabet).unwrap(), value);
            }

            /// Property: encoded numerals use only alphabet symbols and never start with digit zero
            #[test]
            fn proptest_numeral_symbols(value in 1u128..) {
                let b32 = encode_base32(value).unwrap();
                let b64 = encode_base64(value).unwrap();

                prop_assert!(b32.chars().all(|c| Alphabet::base32().contains(c)));
                prop_assert!(b64.chars().all(|c| Alphabet::base64().contains(c)));
                prop_assert!(!b32.starts_with('A'));
                prop_assert!(!b64.starts_with('A'));
            }
        }
    }
}
