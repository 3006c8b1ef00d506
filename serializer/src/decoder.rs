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

//! Binary decoding into [Value]s.
use chain_codec_core::VarUint32;

use crate::abi::Abi;
use crate::builtin;
use crate::cursor::Cursor;
use crate::error::{DecodeError, Error};
use crate::options::{DecodeOptions, TrailingBytes};
use crate::resolver::{resolve, resolve_field, StructDescriptor, TypeDescriptor, VariantDescriptor};
use crate::value::{StructValue, Value};

/// Decode a value of the type described by `descriptor` from `data`.
///
/// Bytes left over after the value are handled according to `options.trailing_bytes`.
pub fn decode_value(
    abi: Option<&Abi>,
    descriptor: &TypeDescriptor,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Value, Error> {
    let mut decoder = Decoder {
        abi,
        cursor: Cursor::new(data),
        depth: 0,
        max_depth: options.max_depth,
    };
    let value = decoder.read(descriptor)?;

    check_trailing_bytes(decoder.cursor.remaining(), &descriptor.to_string(), options)?;
    Ok(value)
}

/// Apply the trailing byte policy of `options` to `remaining` bytes left after `what`.
pub(crate) fn check_trailing_bytes(
    remaining: usize,
    what: &str,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    if remaining == 0 {
        return Ok(());
    }
    match options.trailing_bytes {
        TrailingBytes::Ignore => log::debug!("ignoring {} trailing bytes after {}", remaining, what),
        TrailingBytes::Warn => log::warn!("{} trailing bytes after {}", remaining, what),
        TrailingBytes::Reject => return Err(DecodeError::TrailingBytes(remaining)),
    }
    Ok(())
}

/// Number of zero width array elements accepted regardless of the input left. Beyond it an
/// array may hold no more zero width elements than there are bytes remaining.
const ZERO_WIDTH_ALLOWANCE: usize = 1024;

struct Decoder<'a, 'b> {
    abi: Option<&'a Abi>,
    cursor: Cursor<'b>,
    depth: usize,
    max_depth: usize,
}

impl<'a, 'b> Decoder<'a, 'b> {
    fn read(&mut self, descriptor: &TypeDescriptor) -> Result<Value, Error> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(DecodeError::DepthExceeded(self.max_depth).into());
        }
        let value = match descriptor {
            TypeDescriptor::Builtin(ty) => Ok(builtin::decode(*ty, &mut self.cursor)?),
            TypeDescriptor::Struct(descriptor) => self.read_struct(descriptor),
            TypeDescriptor::Variant(descriptor) => self.read_variant(descriptor),
            TypeDescriptor::Array(inner) => self.read_array(inner),
            TypeDescriptor::Optional(inner) => match self.cursor.read_u8()? {
                0 => Ok(Value::Null),
                1 => self.read(inner),
                flag => Err(DecodeError::InvalidOptionalFlag(flag).into()),
            },
            TypeDescriptor::Extension(inner) => {
                if self.cursor.is_empty() {
                    Ok(Value::Null)
                } else {
                    self.read(inner)
                }
            }
        };
        self.depth -= 1;
        value
    }

    fn read_struct(&mut self, descriptor: &StructDescriptor) -> Result<Value, Error> {
        let mut fields = StructValue::new();
        for field in &descriptor.fields {
            let field_type = resolve_field(self.abi, &field.type_name)?;
            if field_type.is_extension() && self.cursor.is_empty() {
                continue;
            }
            let value = self.read(&field_type)?;
            fields.insert(field.name.as_str(), value);
        }
        Ok(Value::Struct(fields))
    }

    fn read_variant(&mut self, descriptor: &VariantDescriptor) -> Result<Value, Error> {
        let index = self.cursor.decode::<VarUint32>()?.0;
        let member = descriptor.members.get(index as usize).ok_or_else(|| {
            DecodeError::InvalidVariantIndex {
                variant: descriptor.name.clone(),
                index,
                count: descriptor.members.len(),
            }
        })?;
        let member_type = resolve(self.abi, member)?;
        let value = self.read(&member_type)?;
        Ok(Value::variant(member.as_str(), value))
    }

    fn read_array(&mut self, inner: &TypeDescriptor) -> Result<Value, Error> {
        let count = self.cursor.decode::<VarUint32>()?.0 as usize;
        let available = self.cursor.remaining();
        let mut items = Vec::with_capacity(count.min(available));
        for _ in 0..count {
            let start = self.cursor.position();
            items.push(self.read(inner)?);
            if self.cursor.position() == start && count > available.max(ZERO_WIDTH_ALLOWANCE) {
                return Err(DecodeError::Malformed(format!(
                    "{} zero width elements of {} exceed the {} remaining bytes",
                    count, inner, available
                ))
                .into());
            }
        }
        Ok(Value::Array(items))
    }
}
