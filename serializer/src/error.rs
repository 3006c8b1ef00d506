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

use chain_codec_core::{AssetError, BytesError, KeyError, NameError};

/// Error that may be returned by any of the encode and decode functions.
///
/// No partial result is ever produced alongside an error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The type could not be resolved against the ABI
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The value does not fit the type it is encoded as
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The input is not a well formed value of the requested type
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors in a type name or in the ABI it is resolved against.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown type {0}")]
    UnknownType(String),

    #[error("alias cycle detected while resolving {0}")]
    AliasCycle(String),

    #[error("struct {name} has unknown base {base}")]
    UnknownBase { name: String, base: String },

    #[error("base chain of struct {0} is cyclic")]
    BaseCycle(String),

    #[error("malformed type name {0:?}")]
    MalformedType(String),

    #[error("binary extension {0} is only allowed on trailing struct fields")]
    MisplacedExtension(String),

    #[error("type {0} is defined more than once")]
    DuplicateType(String),

    #[error("type {0} shadows a built-in type")]
    ShadowsBuiltin(String),

    #[error("no type given and the value does not describe its own type")]
    MissingType,

    #[error("action {0} is not defined in the ABI")]
    UnknownAction(String),

    #[error("invalid ABI definition: {0}")]
    InvalidDefinition(String),
}

/// Errors raised while encoding a value.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("overflow: {value} does not fit in {ty}")]
    Overflow { ty: String, value: String },

    #[error("invalid {ty}: {reason}")]
    Malformed { ty: String, reason: String },

    #[error("missing field {field} of struct {name}")]
    MissingField { name: String, field: String },

    #[error("{member} is not a member of variant {variant}")]
    UnknownVariantMember { variant: String, member: String },

    #[error("extension field {field} of {name} follows an absent extension field")]
    ExtensionGap { name: String, field: String },

    #[error("length {0} does not fit in a varuint32")]
    LengthOverflow(usize),

    #[error("non-finite float {0} has no JSON representation")]
    NonFiniteFloat(String),
}

/// Errors raised while decoding binary or JSON input.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("invalid variant index {index} for {variant} with {count} members")]
    InvalidVariantIndex {
        variant: String,
        index: u32,
        count: usize,
    },

    #[error("{member} is not a member of variant {variant}")]
    UnknownVariantMember { variant: String, member: String },

    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    #[error("invalid optional flag {0:#04x}")]
    InvalidOptionalFlag(u8),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("{0} trailing bytes after the decoded value")]
    TrailingBytes(usize),

    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error("null is not a valid {0}")]
    UnexpectedNull(String),

    #[error("expected {expected}, found {found}")]
    InvalidJson { expected: String, found: String },

    #[error("missing field {field} of struct {name}")]
    MissingField { name: String, field: String },

    #[error("{value} is out of range for {ty}")]
    OutOfRange { ty: String, value: String },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Bytes(#[from] BytesError),

    #[error("malformed data: {0}")]
    Malformed(String),
}
