// Chain Codec
// Copyright (C) 2019 Monadic GmbH <radicle@monadic.xyz>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Token amounts: [SymbolCode], [Symbol], [Asset] and [ExtendedAsset].
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};

use crate::Name;

/// Maximum number of fraction digits a [Symbol] may declare.
pub const MAX_PRECISION: u8 = 16;

/// Maximum number of characters in a currency code.
pub const MAX_SYMBOL_CODE_LENGTH: usize = 7;

/// Currency code of up to seven uppercase ASCII letters.
///
/// Packed little-endian into a 64 bit integer, first character in the lowest byte, unused
/// bytes zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolCode(u64);

impl SymbolCode {
    pub fn from_string(input: &str) -> Result<Self, AssetError> {
        if input.is_empty() || input.len() > MAX_SYMBOL_CODE_LENGTH {
            return Err(AssetError::InvalidSymbolCode(input.to_string()));
        }
        if !input.bytes().all(|c| c.is_ascii_uppercase()) {
            return Err(AssetError::InvalidSymbolCode(input.to_string()));
        }
        let value = input
            .bytes()
            .enumerate()
            .fold(0u64, |value, (index, c)| value | u64::from(c) << (8 * index));
        Ok(SymbolCode(value))
    }

    pub const fn from_u64(value: u64) -> Self {
        SymbolCode(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut value = self.0;
        while value != 0 {
            write!(f, "{}", char::from((value & 0xff) as u8))?;
            value >>= 8;
        }
        Ok(())
    }
}

impl core::str::FromStr for SymbolCode {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for SymbolCode {
    type Error = AssetError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl From<SymbolCode> for String {
    fn from(code: SymbolCode) -> Self {
        code.to_string()
    }
}

impl Encode for SymbolCode {
    fn size_hint(&self) -> usize {
        8
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.0.encode_to(dest)
    }
}

impl Decode for SymbolCode {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        u64::decode(input).map(SymbolCode)
    }
}

/// Precision and currency code of an [Asset].
///
/// The binary form is one byte of precision followed by the seven bytes of the code. The
/// textual form is `<precision>,<code>`, e.g. `4,EOS`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(u64);

impl Symbol {
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self, AssetError> {
        if precision > MAX_PRECISION {
            return Err(AssetError::InvalidPrecision(precision));
        }
        if code.as_u64() >> 56 != 0 {
            return Err(AssetError::InvalidSymbolCode(code.to_string()));
        }
        Ok(Symbol(code.as_u64() << 8 | u64::from(precision)))
    }

    pub fn from_string(input: &str) -> Result<Self, AssetError> {
        let mut parts = input.trim().splitn(2, ',');
        let precision = parts.next().unwrap_or_default();
        let code = parts
            .next()
            .ok_or_else(|| AssetError::InvalidSymbol(input.to_string()))?;
        let precision = precision
            .parse::<u8>()
            .map_err(|_| AssetError::InvalidSymbol(input.to_string()))?;
        Self::new(precision, SymbolCode::from_string(code)?)
    }

    pub fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn code(&self) -> SymbolCode {
        SymbolCode(self.0 >> 8)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

impl core::str::FromStr for Symbol {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = AssetError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl Encode for Symbol {
    fn size_hint(&self) -> usize {
        8
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.0.encode_to(dest)
    }
}

impl Decode for Symbol {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let symbol = Symbol(u64::decode(input)?);
        if symbol.precision() > MAX_PRECISION {
            return Err(CodecError::from("symbol precision out of range"));
        }
        Ok(symbol)
    }
}

/// An amount of a token.
///
/// The amount is kept in the smallest unit of the token: `1.2345 FOO` is stored as `12345`
/// with a precision of four.
///
/// ```rust
/// # use chain_codec_core::Asset;
/// let asset: Asset = "1.2345 FOO".parse().unwrap();
/// assert_eq!(asset.amount(), 12345);
/// assert_eq!(asset.symbol().precision(), 4);
/// assert_eq!(asset.to_string(), "1.2345 FOO");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    amount: i64,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Asset { amount, symbol }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Parse `<amount> <code>`. The precision is the number of fraction digits.
    pub fn from_string(input: &str) -> Result<Self, AssetError> {
        let invalid = || AssetError::InvalidAsset(input.to_string());
        let mut parts = input.trim().splitn(2, ' ');
        let amount = parts.next().unwrap_or_default();
        let code = parts.next().ok_or_else(invalid)?.trim();

        let (negative, digits) = match amount.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, amount),
        };
        let mut digit_parts = digits.splitn(2, '.');
        let integer = digit_parts.next().unwrap_or_default();
        let fraction = digit_parts.next().unwrap_or_default();
        if integer.is_empty() || (digits.contains('.') && fraction.is_empty()) {
            return Err(invalid());
        }
        if !integer.bytes().chain(fraction.bytes()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > usize::from(MAX_PRECISION) {
            return Err(AssetError::InvalidPrecision(
                u8::try_from(fraction.len()).unwrap_or(u8::max_value()),
            ));
        }

        let units = format!("{}{}", integer, fraction)
            .parse::<u128>()
            .map_err(|_| AssetError::AmountOverflow(input.to_string()))?;
        let amount = if negative {
            if units > u128::from(i64::max_value() as u64) + 1 {
                return Err(AssetError::AmountOverflow(input.to_string()));
            }
            (-(units as i128)) as i64
        } else {
            i64::try_from(units).map_err(|_| AssetError::AmountOverflow(input.to_string()))?
        };

        let symbol = Symbol::new(fraction.len() as u8, SymbolCode::from_string(code)?)?;
        Ok(Asset { amount, symbol })
    }

    /// Parse `<amount> <code>` and require it to carry exactly `expected` as its symbol.
    ///
    /// Fails when the number of fraction digits differs from the expected precision, e.g.
    /// `"1.23 FOO"` against `4,FOO`.
    pub fn from_string_with_symbol(input: &str, expected: Symbol) -> Result<Self, AssetError> {
        let asset = Self::from_string(input)?;
        if asset.symbol.precision() != expected.precision() {
            return Err(AssetError::PrecisionMismatch {
                expected: expected.precision(),
                found: asset.symbol.precision(),
            });
        }
        if asset.symbol.code() != expected.code() {
            return Err(AssetError::SymbolMismatch {
                expected: expected.code().to_string(),
                found: asset.symbol.code().to_string(),
            });
        }
        Ok(asset)
    }
}

impl core::fmt::Display for Asset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let digits = self.amount.unsigned_abs().to_string();
        let precision = usize::from(self.symbol.precision());
        if precision == 0 {
            return write!(f, "{}{} {}", sign, digits, self.symbol.code());
        }
        let padded = format!("{:0>width$}", digits, width = precision + 1);
        let (integer, fraction) = padded.split_at(padded.len() - precision);
        write!(
            f,
            "{}{}.{} {}",
            sign,
            integer,
            fraction,
            self.symbol.code()
        )
    }
}

impl core::str::FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for Asset {
    type Error = AssetError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}

impl Encode for Asset {
    fn size_hint(&self) -> usize {
        16
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.amount.encode_to(dest);
        self.symbol.encode_to(dest);
    }
}

impl Decode for Asset {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        Ok(Asset {
            amount: i64::decode(input)?,
            symbol: Symbol::decode(input)?,
        })
    }
}

/// An [Asset] together with the account of the token contract that issued it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ExtendedAsset {
    pub quantity: Asset,
    pub contract: Name,
}

impl Encode for ExtendedAsset {
    fn size_hint(&self) -> usize {
        24
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.quantity.encode_to(dest);
        self.contract.encode_to(dest);
    }
}

impl Decode for ExtendedAsset {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        Ok(ExtendedAsset {
            quantity: Asset::decode(input)?,
            contract: Name::decode(input)?,
        })
    }
}

/// Error returned when the textual form of an asset or symbol is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AssetError {
    #[error("invalid asset {0:?}")]
    InvalidAsset(String),

    #[error("amount of {0:?} does not fit in 64 bits")]
    AmountOverflow(String),

    #[error("invalid symbol {0:?}")]
    InvalidSymbol(String),

    #[error("invalid symbol code {0:?}, expected 1 to 7 uppercase letters")]
    InvalidSymbolCode(String),

    #[error("precision {0} exceeds the maximum of 16")]
    InvalidPrecision(u8),

    #[error("expected precision {expected}, found {found}")]
    PrecisionMismatch { expected: u8, found: u8 },

    #[error("expected symbol {expected}, found {found}")]
    SymbolMismatch { expected: String, found: String },
}
