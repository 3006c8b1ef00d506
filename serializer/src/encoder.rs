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

//! Binary encoding of [Value]s.
use parity_scale_codec::Encode;

use chain_codec_core::VarUint32;

use crate::abi::Abi;
use crate::builtin;
use crate::error::{EncodeError, Error};
use crate::resolver::{resolve, resolve_field, StructDescriptor, TypeDescriptor, VariantDescriptor};
use crate::value::{Value, NULL};

/// Encode `value` as the type described by `descriptor`.
///
/// Member types of structs and variants are resolved against `abi`.
pub fn encode_value(
    abi: Option<&Abi>,
    descriptor: &TypeDescriptor,
    value: &Value,
) -> Result<Vec<u8>, Error> {
    let mut encoder = Encoder {
        abi,
        out: Vec::new(),
    };
    encoder.write(descriptor, value)?;
    Ok(encoder.out)
}

struct Encoder<'a> {
    abi: Option<&'a Abi>,
    out: Vec<u8>,
}

impl<'a> Encoder<'a> {
    fn write(&mut self, descriptor: &TypeDescriptor, value: &Value) -> Result<(), Error> {
        match descriptor {
            TypeDescriptor::Builtin(ty) => builtin::encode(*ty, value, &mut self.out)?,
            TypeDescriptor::Struct(descriptor) => self.write_struct(descriptor, value)?,
            TypeDescriptor::Variant(descriptor) => self.write_variant(descriptor, value)?,
            TypeDescriptor::Array(inner) => {
                let items = value.as_array().ok_or_else(|| mismatch(descriptor, value))?;
                VarUint32::from_len(items.len())
                    .ok_or(EncodeError::LengthOverflow(items.len()))?
                    .encode_to(&mut self.out);
                for item in items {
                    self.write(inner, item)?;
                }
            }
            TypeDescriptor::Optional(inner) => {
                if value.is_null() {
                    self.out.push(0);
                } else {
                    self.out.push(1);
                    self.write(inner, value)?;
                }
            }
            TypeDescriptor::Extension(inner) => {
                if !value.is_null() {
                    self.write(inner, value)?;
                }
            }
        }
        Ok(())
    }

    fn write_struct(&mut self, descriptor: &StructDescriptor, value: &Value) -> Result<(), Error> {
        let fields = match value {
            Value::Struct(fields) => fields,
            other => return Err(mismatch_named(&descriptor.name, other).into()),
        };

        let mut absent_extension = false;
        for field in &descriptor.fields {
            let field_type = resolve_field(self.abi, &field.type_name)?;
            let field_value = fields.get(&field.name).unwrap_or(&NULL);
            match &field_type {
                TypeDescriptor::Extension(_) if field_value.is_null() => {
                    absent_extension = true;
                }
                TypeDescriptor::Extension(_) if absent_extension => {
                    return Err(EncodeError::ExtensionGap {
                        name: descriptor.name.clone(),
                        field: field.name.clone(),
                    }
                    .into());
                }
                TypeDescriptor::Optional(_) | TypeDescriptor::Extension(_) => {
                    self.write(&field_type, field_value)?
                }
                _ if fields.get(&field.name).is_none() => {
                    return Err(EncodeError::MissingField {
                        name: descriptor.name.clone(),
                        field: field.name.clone(),
                    }
                    .into());
                }
                _ => self.write(&field_type, field_value)?,
            }
        }
        Ok(())
    }

    fn write_variant(&mut self, descriptor: &VariantDescriptor, value: &Value) -> Result<(), Error> {
        let (member, inner) = match value {
            Value::Variant { member, value } => (member, value),
            other => return Err(mismatch_named(&descriptor.name, other).into()),
        };
        let index = descriptor
            .index_of(member)
            .ok_or_else(|| EncodeError::UnknownVariantMember {
                variant: descriptor.name.clone(),
                member: member.clone(),
            })?;
        VarUint32(index as u32).encode_to(&mut self.out);
        let member_type = resolve(self.abi, member)?;
        self.write(&member_type, inner)
    }
}

fn mismatch(descriptor: &TypeDescriptor, value: &Value) -> EncodeError {
    mismatch_named(&descriptor.to_string(), value)
}

fn mismatch_named(expected: &str, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: expected.to_string(),
        found: value.kind().to_string(),
    }
}
