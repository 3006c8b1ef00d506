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

//! Fixed width digests: [Checksum160], [Checksum256] and [Checksum512].
//!
//! On the wire a checksum is its raw bytes without any prefix. The textual form is lowercase hex.
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};
use ripemd::{Digest, Ripemd160};

use crate::bytes::BytesError;

macro_rules! checksum_type {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[derive(serde::Deserialize, serde::Serialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub [u8; $size]);

        impl $name {
            pub const SIZE: usize = $size;

            pub fn from_slice(bytes: &[u8]) -> Result<Self, BytesError> {
                if bytes.len() != $size {
                    return Err(BytesError::InvalidLength {
                        expected: $size,
                        found: bytes.len(),
                    });
                }
                let mut inner = [0u8; $size];
                inner.copy_from_slice(bytes);
                Ok($name(inner))
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name([0u8; $size])
            }
        }

        impl Encode for $name {
            fn size_hint(&self) -> usize {
                $size
            }

            fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
                dest.write(&self.0)
            }
        }

        impl Decode for $name {
            fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
                let mut inner = [0u8; $size];
                input.read(&mut inner)?;
                Ok($name(inner))
            }
        }

        impl core::str::FromStr for $name {
            type Err = BytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes =
                    hex::decode(s).map_err(|err| BytesError::InvalidHex(err.to_string()))?;
                Self::from_slice(&bytes)
            }
        }

        impl TryFrom<String> for $name {
            type Error = BytesError;

            fn try_from(input: String) -> Result<Self, Self::Error> {
                input.parse()
            }
        }

        impl From<$name> for String {
            fn from(checksum: $name) -> Self {
                checksum.to_string()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", hex::encode(&self.0[..]))
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

checksum_type!(
    /// 20 byte digest, e.g. a RIPEMD-160 hash.
    Checksum160,
    20
);

checksum_type!(
    /// 32 byte digest, e.g. a SHA-256 hash or a transaction id.
    Checksum256,
    32
);

checksum_type!(
    /// 64 byte digest, e.g. a SHA-512 hash.
    Checksum512,
    64
);

impl Checksum160 {
    /// RIPEMD-160 digest of the concatenation of `parts`.
    pub fn ripemd160(parts: &[&[u8]]) -> Self {
        let mut hasher = Ripemd160::new();
        for part in parts {
            hasher.update(part);
        }
        let mut inner = [0u8; 20];
        inner.copy_from_slice(&hasher.finalize());
        Checksum160(inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ripemd160_of_empty_input() {
        assert_eq!(
            Checksum160::ripemd160(&[]).to_string(),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn ripemd160_concatenates_parts() {
        assert_eq!(
            Checksum160::ripemd160(&[&b"ab"[..], &b"c"[..]]),
            Checksum160::ripemd160(&[&b"abc"[..]])
        );
    }

    #[test]
    fn encode_is_raw() {
        let checksum = Checksum256([7u8; 32]);
        assert_eq!(checksum.encode(), vec![7u8; 32]);
        let decoded = Checksum256::decode(&mut &checksum.encode()[..]).unwrap();
        assert_eq!(decoded, checksum);
    }

    #[test]
    fn decode_truncated_fails() {
        let encoded = [0u8; 63];
        assert!(Checksum512::decode(&mut &encoded[..]).is_err());
    }

    #[test]
    fn hex_form_requires_exact_length() {
        let hex = "00".repeat(20);
        assert!(hex.parse::<Checksum160>().is_ok());
        assert_eq!(
            "00".repeat(19).parse::<Checksum160>(),
            Err(BytesError::InvalidLength {
                expected: 20,
                found: 19
            })
        );
        assert!(hex.parse::<Checksum256>().is_err());
    }
}
