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

//! Provides [Cursor], the byte source of the binary decoder.
use parity_scale_codec::{Decode, Error as CodecError, Input};

use crate::error::DecodeError;

/// Read position in a byte buffer of known length.
///
/// Every read checks the remaining length first. Reads that run past the end are recorded so
/// that failures inside [Decode] implementations surface as
/// [DecodeError::BufferUnderrun] instead of an opaque codec error.
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    underrun: Option<(usize, usize)>,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor {
            data,
            position: 0,
            underrun: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::BufferUnderrun {
                needed: len,
                remaining,
            });
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_slice(1)?[0])
    }

    /// Read exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_slice(N)?);
        Ok(array)
    }

    /// Decode a value through its [Decode] implementation.
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        self.underrun = None;
        T::decode(self).map_err(|err| match self.underrun.take() {
            Some((needed, remaining)) => DecodeError::BufferUnderrun { needed, remaining },
            None => DecodeError::Malformed(err.to_string()),
        })
    }
}

impl<'a> Input for Cursor<'a> {
    fn remaining_len(&mut self) -> Result<Option<usize>, CodecError> {
        Ok(Some(self.remaining()))
    }

    fn read(&mut self, into: &mut [u8]) -> Result<(), CodecError> {
        let remaining = self.remaining();
        if into.len() > remaining {
            self.underrun = Some((into.len(), remaining));
            return Err(CodecError::from("buffer underrun"));
        }
        into.copy_from_slice(&self.data[self.position..self.position + into.len()]);
        self.position += into.len();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chain_codec_core::{Name, VarUint32};

    #[test]
    fn reads_advance() {
        let data = [1, 2, 3, 4];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_array::<2>().unwrap(), [2, 3]);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn underrun_is_reported() {
        let data = [1, 2];
        let mut cursor = Cursor::new(&data);
        assert_eq!(
            cursor.read_slice(3),
            Err(DecodeError::BufferUnderrun {
                needed: 3,
                remaining: 2
            })
        );
        assert_eq!(
            cursor.decode::<Name>(),
            Err(DecodeError::BufferUnderrun {
                needed: 8,
                remaining: 2
            })
        );
    }

    #[test]
    fn malformed_is_not_an_underrun() {
        let data = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let mut cursor = Cursor::new(&data);
        assert!(matches!(
            cursor.decode::<VarUint32>(),
            Err(DecodeError::Malformed(_))
        ));
    }
}
