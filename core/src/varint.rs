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

//! Variable length integers.
//!
//! Every length and count prefix on the wire is a [VarUint32]: seven payload bits per byte,
//! least significant group first, with the high bit set on every byte but the last.
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};

/// Maximum number of bytes a [VarUint32] occupies on the wire.
pub const MAX_VARUINT32_LENGTH: usize = 5;

/// Unsigned 32 bit integer in LEB128 encoding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarUint32(pub u32);

/// Signed 32 bit integer, zig-zag mapped onto a [VarUint32].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarInt32(pub i32);

impl VarUint32 {
    /// Prefix for a length or count. Fails when `len` does not fit in 32 bits.
    pub fn from_len(len: usize) -> Option<Self> {
        u32::try_from(len).ok().map(VarUint32)
    }
}

impl Encode for VarUint32 {
    fn size_hint(&self) -> usize {
        let mut size = 1;
        let mut value = self.0 >> 7;
        while value != 0 {
            size += 1;
            value >>= 7;
        }
        size
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        let mut value = self.0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                dest.push_byte(byte);
                break;
            }
            dest.push_byte(byte | 0x80);
        }
    }
}

impl Decode for VarUint32 {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let mut value: u64 = 0;
        for index in 0..MAX_VARUINT32_LENGTH {
            let byte = input.read_byte()?;
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte & 0x80 == 0 {
                return u32::try_from(value)
                    .map(VarUint32)
                    .map_err(|_| CodecError::from("varuint32 exceeds 32 bits"));
            }
        }
        Err(CodecError::from("varuint32 is longer than 5 bytes"))
    }
}

impl Encode for VarInt32 {
    fn size_hint(&self) -> usize {
        VarUint32::from(*self).size_hint()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        VarUint32::from(*self).encode_to(dest)
    }
}

impl Decode for VarInt32 {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        VarUint32::decode(input).map(VarInt32::from)
    }
}

impl From<VarInt32> for VarUint32 {
    fn from(value: VarInt32) -> Self {
        VarUint32(((value.0 << 1) ^ (value.0 >> 31)) as u32)
    }
}

impl From<VarUint32> for VarInt32 {
    fn from(value: VarUint32) -> Self {
        VarInt32(((value.0 >> 1) as i32) ^ -((value.0 & 1) as i32))
    }
}
