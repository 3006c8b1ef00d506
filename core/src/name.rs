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

//! `Name` identifies accounts, actions, permissions and tables.
//!
//! A name is a 64 bit integer holding up to 13 characters from [CHARMAP]. The first twelve
//! characters take five bits each, most significant first. A thirteenth character only gets the
//! remaining four bits and is therefore limited to the first 16 symbols of the alphabet.
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};

/// Alphabet of the textual form, indexed by symbol value.
pub const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum number of characters in the textual form.
pub const MAX_NAME_LENGTH: usize = 13;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(u64);

impl Name {
    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Pack the textual form of a name.
    ///
    /// ```rust
    /// # use chain_codec_core::Name;
    /// let name = Name::from_string("foobar").unwrap();
    /// assert_eq!(name.as_u64(), 6712742083569909760);
    /// assert!(Name::from_string("FooBar").is_err());
    /// ```
    pub fn from_string(input: &str) -> Result<Self, NameError> {
        let symbols = input.as_bytes();
        if symbols.len() > MAX_NAME_LENGTH {
            return Err(NameError::TooLong(symbols.len()));
        }

        let mut value: u64 = 0;
        for (position, character) in symbols.iter().enumerate() {
            let symbol = symbol_value(*character).ok_or(NameError::InvalidCharacter {
                character: char::from(*character),
                position,
            })?;
            if position < MAX_NAME_LENGTH - 1 {
                value |= u64::from(symbol) << (64 - 5 * (position + 1));
            } else if symbol > 0x0f {
                return Err(NameError::InvalidLastCharacter(char::from(*character)));
            } else {
                value |= u64::from(symbol);
            }
        }

        Ok(Name(value))
    }
}

fn symbol_value(character: u8) -> Option<u8> {
    match character {
        b'.' => Some(0),
        b'1'..=b'5' => Some(character - b'1' + 1),
        b'a'..=b'z' => Some(character - b'a' + 6),
        _ => None,
    }
}

impl core::fmt::Display for Name {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut characters = [b'.'; MAX_NAME_LENGTH];
        let mut value = self.0;
        for index in 0..MAX_NAME_LENGTH {
            let (mask, shift) = if index == 0 { (0x0f, 4) } else { (0x1f, 5) };
            characters[MAX_NAME_LENGTH - 1 - index] = CHARMAP[(value & mask) as usize];
            value >>= shift;
        }
        let len = characters
            .iter()
            .rposition(|c| *c != b'.')
            .map_or(0, |position| position + 1);
        // Every byte comes from CHARMAP, which is ASCII.
        let text = core::str::from_utf8(&characters[..len]).map_err(|_| core::fmt::Error)?;
        f.write_str(text)
    }
}

impl Encode for Name {
    fn size_hint(&self) -> usize {
        8
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.0.encode_to(dest)
    }
}

impl Decode for Name {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        u64::decode(input).map(Name)
    }
}

impl From<u64> for Name {
    fn from(value: u64) -> Self {
        Name(value)
    }
}

impl From<Name> for u64 {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        Self::from_string(input)
    }
}

impl core::str::FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Error returned when the textual form of a [Name] is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NameError {
    #[error("name has {0} characters, at most 13 are allowed")]
    TooLong(usize),

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("thirteenth character {0:?} must be one of '.', '1'-'5' or 'a'-'j'")]
    InvalidLastCharacter(char),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pack_foobar() {
        let name = Name::from_string("foobar").unwrap();
        assert_eq!(name.as_u64(), 6_712_742_083_569_909_760);
        assert_eq!(
            name.encode(),
            vec![0x00, 0x00, 0x00, 0x00, 0x5c, 0x73, 0x28, 0x5d]
        );
    }

    #[test]
    fn pack_known_names() {
        assert_eq!(Name::from_string("eosio").unwrap().as_u64(), 6_138_663_577_826_885_632);
        assert_eq!(
            Name::from_string("eosio.token").unwrap().as_u64(),
            6_138_663_591_592_764_928
        );
        assert_eq!(Name::from_string("").unwrap().as_u64(), 0);
    }

    #[test]
    fn thirteen_characters() {
        let name = Name::from_string("zzzzzzzzzzzzj").unwrap();
        assert_eq!(name.as_u64(), u64::max_value());
        assert_eq!(name.to_string(), "zzzzzzzzzzzzj");

        let name = Name::from_string("123451234512j").unwrap();
        assert_eq!(name.as_u64(), 614_251_535_012_020_783);
        assert_eq!(name.to_string(), "123451234512j");
    }

    #[test]
    fn thirteenth_character_out_of_range() {
        assert_eq!(
            Name::from_string("aaaaaaaaaaaak"),
            Err(NameError::InvalidLastCharacter('k'))
        );
        assert_eq!(
            Name::from_string("aaaaaaaaaaaaz"),
            Err(NameError::InvalidLastCharacter('z'))
        );
    }

    #[test]
    fn too_long() {
        assert_eq!(
            Name::from_string("aaaaaaaaaaaaaa"),
            Err(NameError::TooLong(14))
        );
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(
            Name::from_string("foo6"),
            Err(NameError::InvalidCharacter {
                character: '6',
                position: 3
            })
        );
        assert!(Name::from_string("Foo").is_err());
        assert!(Name::from_string("foo bar").is_err());
        assert!(Name::from_string("föö").is_err());
    }

    #[test]
    fn trailing_dots_are_dropped() {
        assert_eq!(Name::from_string("foo...").unwrap().to_string(), "foo");
        assert_eq!(Name::from_string("f.oo").unwrap().to_string(), "f.oo");
        assert_eq!(Name::from_u64(0).to_string(), "");
    }

    #[test]
    fn string_form_of_any_value() {
        for _ in 0..100 {
            let name = Name::from_u64(rand::random());
            assert_eq!(Name::from_string(&name.to_string()).unwrap(), name);
        }
    }

    #[test]
    fn decode_after_encode_is_identity() {
        let name = Name::from_string("alice").unwrap();
        let encoded = name.encode();
        let decoded = Name::decode(&mut &encoded[..]).unwrap();
        assert_eq!(name, decoded);
    }

    #[test]
    fn json_form() {
        let name = Name::from_string("foobar").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"foobar\"");
        assert_eq!(serde_json::from_str::<Name>("\"foobar\"").unwrap(), name);
        assert!(serde_json::from_str::<Name>("\"FOOBAR\"").is_err());
    }
}
