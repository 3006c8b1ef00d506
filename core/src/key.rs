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

//! Curve tagged [PublicKey] and [Signature] values.
//!
//! Both are stored as a [CurveType] and the raw payload bytes of that curve. The binary form
//! is the curve index byte followed by the payload.
//!
//! The textual form is `PUB_<curve>_<base58>` or `SIG_<curve>_<base58>` where the base58 data
//! is the payload followed by the first four bytes of `ripemd160(payload || curve)`. Public keys
//! on the K1 curve also have a legacy textual form `EOS<base58>` whose checksum is computed
//! over the payload alone.
use core::convert::TryFrom;
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};

use crate::bytes::{read_prefixed_into, read_raw};
use crate::Checksum160;

/// Prefix of the legacy textual form of a public key.
pub const LEGACY_PUBLIC_KEY_PREFIX: &str = "EOS";

/// Size of a compressed elliptic curve point.
const COMPRESSED_POINT_SIZE: usize = 33;

/// Size of a compact signature with recovery byte.
const COMPACT_SIGNATURE_SIZE: usize = 65;

const CHECKSUM_SIZE: usize = 4;

/// The elliptic curve family a key or signature belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CurveType {
    /// secp256k1
    K1 = 0,
    /// secp256r1
    R1 = 1,
    /// secp256r1 wrapped in a WebAuthn assertion
    WA = 2,
}

impl CurveType {
    pub fn from_index(index: u8) -> Result<Self, KeyError> {
        match index {
            0 => Ok(CurveType::K1),
            1 => Ok(CurveType::R1),
            2 => Ok(CurveType::WA),
            _ => Err(KeyError::UnknownCurveIndex(index)),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveType::K1 => "K1",
            CurveType::R1 => "R1",
            CurveType::WA => "WA",
        }
    }
}

impl core::str::FromStr for CurveType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "K1" => Ok(CurveType::K1),
            "R1" => Ok(CurveType::R1),
            "WA" => Ok(CurveType::WA),
            _ => Err(KeyError::UnknownCurve(s.to_string())),
        }
    }
}

impl core::fmt::Display for CurveType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A public key.
///
/// ```rust
/// # use chain_codec_core::{CurveType, PublicKey};
/// let key: PublicKey = "PUB_K1_5AHoNnWetuDhKWSDx3WUf8W7Dg5xjHCMc4yHmmSiaJCFvvAgnB"
///     .parse()
///     .unwrap();
/// assert_eq!(key.curve(), CurveType::K1);
/// assert_eq!(key.data().len(), 33);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    curve: CurveType,
    data: Vec<u8>,
}

impl PublicKey {
    /// Build a key from its payload. Fails if the payload does not have the layout of `curve`.
    pub fn from_bytes(curve: CurveType, data: Vec<u8>) -> Result<Self, KeyError> {
        let mut input = &data[..];
        let parsed = read_public_key_payload(curve, &mut input)
            .map_err(|_| KeyError::InvalidPayload { curve, length: data.len() })?;
        if !input.is_empty() {
            return Err(KeyError::InvalidPayload { curve, length: data.len() });
        }
        Ok(PublicKey { curve, data: parsed })
    }

    pub fn from_string(input: &str) -> Result<Self, KeyError> {
        if let Some(rest) = input.strip_prefix("PUB_") {
            let (curve, encoded) = split_curve(rest)?;
            let data = decode_checked(encoded, curve.name().as_bytes())?;
            Self::from_bytes(curve, data)
        } else if let Some(encoded) = input.strip_prefix(LEGACY_PUBLIC_KEY_PREFIX) {
            let data = decode_checked(encoded, &[])?;
            Self::from_bytes(CurveType::K1, data)
        } else {
            Err(KeyError::InvalidPrefix(input.to_string()))
        }
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The legacy `EOS` prefixed textual form. Only K1 keys have one.
    pub fn to_legacy_string(&self) -> Result<String, KeyError> {
        if self.curve != CurveType::K1 {
            return Err(KeyError::NoLegacyForm(self.curve));
        }
        Ok(format!(
            "{}{}",
            LEGACY_PUBLIC_KEY_PREFIX,
            encode_checked(&self.data, &[])
        ))
    }
}

impl core::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "PUB_{}_{}",
            self.curve,
            encode_checked(&self.data, self.curve.name().as_bytes())
        )
    }
}

impl core::str::FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = KeyError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_string()
    }
}

impl Encode for PublicKey {
    fn size_hint(&self) -> usize {
        1 + self.data.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.curve.index());
        dest.write(&self.data);
    }
}

impl Decode for PublicKey {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let curve = decode_curve(input)?;
        let data = read_public_key_payload(curve, input)?;
        Ok(PublicKey { curve, data })
    }
}

/// A signature.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    curve: CurveType,
    data: Vec<u8>,
}

impl Signature {
    /// Build a signature from its payload. Fails if the payload does not have the layout of
    /// `curve`.
    pub fn from_bytes(curve: CurveType, data: Vec<u8>) -> Result<Self, KeyError> {
        let mut input = &data[..];
        let parsed = read_signature_payload(curve, &mut input)
            .map_err(|_| KeyError::InvalidPayload { curve, length: data.len() })?;
        if !input.is_empty() {
            return Err(KeyError::InvalidPayload { curve, length: data.len() });
        }
        Ok(Signature { curve, data: parsed })
    }

    pub fn from_string(input: &str) -> Result<Self, KeyError> {
        let rest = input
            .strip_prefix("SIG_")
            .ok_or_else(|| KeyError::InvalidPrefix(input.to_string()))?;
        let (curve, encoded) = split_curve(rest)?;
        let data = decode_checked(encoded, curve.name().as_bytes())?;
        Self::from_bytes(curve, data)
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "SIG_{}_{}",
            self.curve,
            encode_checked(&self.data, self.curve.name().as_bytes())
        )
    }
}

impl core::str::FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for Signature {
    type Error = KeyError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_string(&input)
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.to_string()
    }
}

impl Encode for Signature {
    fn size_hint(&self) -> usize {
        1 + self.data.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.curve.index());
        dest.write(&self.data);
    }
}

impl Decode for Signature {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let curve = decode_curve(input)?;
        let data = read_signature_payload(curve, input)?;
        Ok(Signature { curve, data })
    }
}

fn decode_curve<I: Input>(input: &mut I) -> Result<CurveType, CodecError> {
    CurveType::from_index(input.read_byte()?).map_err(|_| CodecError::from("unknown curve type"))
}

/// WA keys carry a user presence flag and the relying party id after the point.
fn read_public_key_payload<I: Input>(
    curve: CurveType,
    input: &mut I,
) -> Result<Vec<u8>, CodecError> {
    match curve {
        CurveType::K1 | CurveType::R1 => read_raw(input, COMPRESSED_POINT_SIZE),
        CurveType::WA => {
            let mut data = read_raw(input, COMPRESSED_POINT_SIZE + 1)?;
            read_prefixed_into(input, &mut data)?;
            Ok(data)
        }
    }
}

/// WA signatures carry the authenticator data and the client JSON after the signature.
fn read_signature_payload<I: Input>(
    curve: CurveType,
    input: &mut I,
) -> Result<Vec<u8>, CodecError> {
    match curve {
        CurveType::K1 | CurveType::R1 => read_raw(input, COMPACT_SIGNATURE_SIZE),
        CurveType::WA => {
            let mut data = read_raw(input, COMPACT_SIGNATURE_SIZE)?;
            read_prefixed_into(input, &mut data)?;
            read_prefixed_into(input, &mut data)?;
            Ok(data)
        }
    }
}

fn split_curve(input: &str) -> Result<(CurveType, &str), KeyError> {
    let mut parts = input.splitn(2, '_');
    let curve = parts.next().unwrap_or_default().parse()?;
    let encoded = parts
        .next()
        .ok_or_else(|| KeyError::InvalidPrefix(input.to_string()))?;
    Ok((curve, encoded))
}

fn checksum(data: &[u8], suffix: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let digest = Checksum160::ripemd160(&[data, suffix]);
    let mut checksum = [0u8; CHECKSUM_SIZE];
    checksum.copy_from_slice(&digest.as_bytes()[..CHECKSUM_SIZE]);
    checksum
}

fn encode_checked(data: &[u8], suffix: &[u8]) -> String {
    let mut bytes = data.to_vec();
    bytes.extend_from_slice(&checksum(data, suffix));
    bs58::encode(bytes).into_string()
}

fn decode_checked(encoded: &str, suffix: &[u8]) -> Result<Vec<u8>, KeyError> {
    let mut bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|err| KeyError::Base58(err.to_string()))?;
    if bytes.len() < CHECKSUM_SIZE {
        return Err(KeyError::TooShort(bytes.len()));
    }
    let found = bytes.split_off(bytes.len() - CHECKSUM_SIZE);
    let expected = checksum(&bytes, suffix);
    if found[..] != expected[..] {
        return Err(KeyError::ChecksumMismatch {
            expected: hex::encode(expected),
            found: hex::encode(found),
        });
    }
    Ok(bytes)
}

/// Error returned when the textual or raw form of a key or signature is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum KeyError {
    #[error("unrecognized key prefix in {0:?}")]
    InvalidPrefix(String),

    #[error("unknown curve type {0:?}")]
    UnknownCurve(String),

    #[error("unknown curve type index {0}")]
    UnknownCurveIndex(u8),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("encoded key of {0} bytes is too short to hold a checksum")]
    TooShort(usize),

    #[error("checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("{length} byte payload is not valid for curve {curve}")]
    InvalidPayload { curve: CurveType, length: usize },

    #[error("{0} keys have no legacy textual form")]
    NoLegacyForm(CurveType),
}

#[cfg(test)]
mod test {
    use super::*;

    const PUBLIC_KEY: &str = "PUB_K1_5AHoNnWetuDhKWSDx3WUf8W7Dg5xjHCMc4yHmmSiaJCFvvAgnB";
    const PUBLIC_KEY_HEX: &str =
        "000223e0ae8aacb41b06dc74af1a56b2eb69133f07f7f75bd1d5e53316bff195edf4";
    const LEGACY_PUBLIC_KEY: &str = "EOS5AHoNnWetuDhKWSDx3WUf8W7Dg5xjHCMc4yHmmSiaJCFwFS6uM";
    const R1_PUBLIC_KEY: &str = "PUB_R1_5AHoNnWetuDhKWSDx3WUf8W7Dg5xjHCMc4yHmmSiaJCG16ujmN";
    const SIGNATURE: &str = "SIG_K1_KfPLgpw35iX8nfDzhbcmSBCr7nEGNEYXgmmempQspDJYBCKuAEs5rm3s4ZuLJY428Ca8ZhvR2Dkwu118y3NAoMDxhicRj9";
    const SIGNATURE_HEX: &str = "00205150a67288c3b393fdba9061b05019c54b12bdac295fc83bebad7cd63c7bb67d5cb8cc220564da006240a58419f64d06a5c6e1fc62889816a6c3dfdd231ed389";

    /// Replace the character at `position` with a different base58 character.
    fn corrupt(input: &str, position: usize) -> String {
        let mut characters: Vec<char> = input.chars().collect();
        characters[position] = if characters[position] == 'z' { 'y' } else { 'z' };
        characters.into_iter().collect()
    }

    #[test]
    fn public_key_binary_form() {
        let key = PublicKey::from_string(PUBLIC_KEY).unwrap();
        assert_eq!(hex::encode(key.encode()), PUBLIC_KEY_HEX);
        let encoded = hex::decode(PUBLIC_KEY_HEX).unwrap();
        assert_eq!(PublicKey::decode(&mut &encoded[..]).unwrap(), key);
        assert_eq!(key.to_string(), PUBLIC_KEY);
    }

    #[test]
    fn legacy_public_key() {
        let legacy = PublicKey::from_string(LEGACY_PUBLIC_KEY).unwrap();
        assert_eq!(legacy, PublicKey::from_string(PUBLIC_KEY).unwrap());
        assert_eq!(legacy.to_string(), PUBLIC_KEY);
        assert_eq!(legacy.to_legacy_string().unwrap(), LEGACY_PUBLIC_KEY);
    }

    #[test]
    fn curve_is_part_of_checksum() {
        let r1 = PublicKey::from_string(R1_PUBLIC_KEY).unwrap();
        assert_eq!(r1.curve(), CurveType::R1);
        assert_eq!(r1.data(), PublicKey::from_string(PUBLIC_KEY).unwrap().data());
        assert_eq!(r1.encode()[0], 1);
        assert_eq!(r1.to_legacy_string(), Err(KeyError::NoLegacyForm(CurveType::R1)));

        // The K1 payload under an R1 prefix does not verify.
        let swapped = PUBLIC_KEY.replace("PUB_K1_", "PUB_R1_");
        assert!(matches!(
            PublicKey::from_string(&swapped),
            Err(KeyError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn corrupted_public_key() {
        assert!(matches!(
            PublicKey::from_string(&corrupt(PUBLIC_KEY, 30)),
            Err(KeyError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            PublicKey::from_string(&corrupt(LEGACY_PUBLIC_KEY, 20)),
            Err(KeyError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn signature_forms() {
        let signature = Signature::from_string(SIGNATURE).unwrap();
        assert_eq!(signature.curve(), CurveType::K1);
        assert_eq!(signature.data().len(), 65);
        assert_eq!(hex::encode(signature.encode()), SIGNATURE_HEX);
        let encoded = hex::decode(SIGNATURE_HEX).unwrap();
        assert_eq!(Signature::decode(&mut &encoded[..]).unwrap(), signature);
        assert_eq!(signature.to_string(), SIGNATURE);
    }

    #[test]
    fn corrupted_signature() {
        assert!(matches!(
            Signature::from_string(&corrupt(SIGNATURE, 50)),
            Err(KeyError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn invalid_text() {
        assert!(matches!(
            PublicKey::from_string("PUB_XX_abc"),
            Err(KeyError::UnknownCurve(_))
        ));
        assert!(matches!(
            PublicKey::from_string("KEY_K1_abc"),
            Err(KeyError::InvalidPrefix(_))
        ));
        assert!(matches!(
            PublicKey::from_string("PUB_K1_0OIl"),
            Err(KeyError::Base58(_))
        ));
        assert!(matches!(
            Signature::from_string(PUBLIC_KEY),
            Err(KeyError::InvalidPrefix(_))
        ));
        assert!(matches!(
            PublicKey::from_string("PUB_K1_1"),
            Err(KeyError::TooShort(1))
        ));
    }

    #[test]
    fn payload_size_is_checked() {
        assert!(PublicKey::from_bytes(CurveType::K1, vec![2; 33]).is_ok());
        assert_eq!(
            PublicKey::from_bytes(CurveType::K1, vec![2; 32]),
            Err(KeyError::InvalidPayload {
                curve: CurveType::K1,
                length: 32
            })
        );
        assert!(PublicKey::from_bytes(CurveType::K1, vec![2; 34]).is_err());
        assert!(Signature::from_bytes(CurveType::R1, vec![0; 65]).is_ok());
        assert!(Signature::from_bytes(CurveType::R1, vec![0; 64]).is_err());
    }

    #[test]
    fn webauthn_payloads() {
        let mut key_data = vec![3u8; 33];
        key_data.push(1);
        key_data.push(11);
        key_data.extend_from_slice(b"example.com");
        let key = PublicKey::from_bytes(CurveType::WA, key_data.clone()).unwrap();
        let encoded = key.encode();
        assert_eq!(encoded[0], 2);
        assert_eq!(encoded.len(), 1 + key_data.len());
        assert_eq!(PublicKey::decode(&mut &encoded[..]).unwrap(), key);
        assert_eq!(PublicKey::from_string(&key.to_string()).unwrap(), key);

        let mut signature_data = vec![0x1f; 65];
        signature_data.extend_from_slice(&[2, 0xaa, 0xbb]);
        signature_data.extend_from_slice(&[2, b'{', b'}']);
        let signature = Signature::from_bytes(CurveType::WA, signature_data).unwrap();
        let encoded = signature.encode();
        assert_eq!(Signature::decode(&mut &encoded[..]).unwrap(), signature);
        assert_eq!(Signature::from_string(&signature.to_string()).unwrap(), signature);
    }

    #[test]
    fn truncated_binary_form() {
        let encoded = hex::decode(PUBLIC_KEY_HEX).unwrap();
        assert!(PublicKey::decode(&mut &encoded[..20]).is_err());
        assert!(PublicKey::decode(&mut &[9u8; 34][..]).is_err());
    }

    #[test]
    fn json_form() {
        let key = PublicKey::from_string(PUBLIC_KEY).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", PUBLIC_KEY));
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), key);
    }
}
