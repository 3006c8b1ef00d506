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

//! Primitive types of the chain data model and their binary layouts.
//!
//! Every type implements [parity_scale_codec::Encode] and [parity_scale_codec::Decode] by hand
//! so that the produced bytes are exactly the little-endian wire format. Length and count
//! prefixes are [VarUint32] rather than SCALE compact integers, so collections of these types
//! must be encoded through the ABI serializer and not through the SCALE implementations for
//! `Vec` or `String`.

pub mod varint;
pub use varint::{VarInt32, VarUint32};

pub mod bytes;
pub use bytes::{Bytes, BytesError};

mod checksum;
pub use checksum::{Checksum160, Checksum256, Checksum512};

mod name;
pub use name::{Name, NameError};

mod asset;
pub use asset::{Asset, AssetError, ExtendedAsset, Symbol, SymbolCode, MAX_PRECISION};

mod key;
pub use key::{CurveType, KeyError, PublicKey, Signature, LEGACY_PUBLIC_KEY_PREFIX};
