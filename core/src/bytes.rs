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

/// `Bytes` type and the raw byte helpers shared by the other primitives.
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};

use crate::varint::VarUint32;

/// Reads are split into chunks of this size so that a hostile length prefix
/// cannot make us allocate more than the input actually holds.
const READ_CHUNK_SIZE: usize = 4096;

/// Arbitrary length byte string.
///
/// The binary form is a [VarUint32] length followed by the raw bytes. The textual form is
/// lowercase hex.
///
/// ```rust
/// # use chain_codec_core::Bytes;
/// let bytes: Bytes = "deadbeef".parse().unwrap();
/// assert_eq!(bytes.to_string(), "deadbeef");
/// assert_eq!(bytes.len(), 4);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }

    pub fn from_hex(input: &str) -> Result<Self, BytesError> {
        hex::decode(input)
            .map(Bytes)
            .map_err(|err| BytesError::InvalidHex(err.to_string()))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encode for Bytes {
    fn size_hint(&self) -> usize {
        let prefix = VarUint32::from_len(self.0.len())
            .map_or(crate::varint::MAX_VARUINT32_LENGTH, |len| len.size_hint());
        prefix + self.0.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        write_prefixed(&self.0, dest)
    }
}

impl Decode for Bytes {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let len = VarUint32::decode(input)?.0 as usize;
        read_raw(input, len).map(Bytes)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl From<Bytes> for String {
    fn from(bytes: Bytes) -> Self {
        bytes.to_string()
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<String> for Bytes {
    type Error = BytesError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_hex(&input)
    }
}

impl core::str::FromStr for Bytes {
    type Err = BytesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl core::fmt::Display for Bytes {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Error returned when the textual form of a byte string is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BytesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },
}

/// Write `bytes` preceded by their length as a [VarUint32].
///
/// The length must fit in 32 bits. Callers check it with [VarUint32::from_len] first.
pub fn write_prefixed<T: Output + ?Sized>(bytes: &[u8], dest: &mut T) {
    VarUint32(bytes.len() as u32).encode_to(dest);
    dest.write(bytes);
}

/// Read exactly `len` bytes from `input`.
pub fn read_raw<I: Input>(input: &mut I, len: usize) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::with_capacity(len.min(READ_CHUNK_SIZE));
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut remaining = len;
    while remaining > 0 {
        let size = remaining.min(READ_CHUNK_SIZE);
        input.read(&mut chunk[..size])?;
        bytes.extend_from_slice(&chunk[..size]);
        remaining -= size;
    }
    Ok(bytes)
}

/// Read a [VarUint32] length prefix and the bytes it announces, appending both verbatim
/// to `into`.
pub fn read_prefixed_into<I: Input>(input: &mut I, into: &mut Vec<u8>) -> Result<(), CodecError> {
    let len = VarUint32::decode(input)?;
    len.encode_to(into);
    into.extend(read_raw(input, len.0 as usize)?);
    Ok(())
}
