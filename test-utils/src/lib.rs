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

//! Miscellaneous helpers used throughout the codec tests.

use rand::distributions::Alphanumeric;
use rand::Rng;

use chain_codec::Abi;
use chain_codec_core::*;

/// Name symbols that may end a name. The dot is left out since trailing dots do not survive
/// the textual form.
const NAME_SYMBOLS: &[u8] = b"12345abcdefghijklmnopqrstuvwxyz";

/// Generate a random name of one to twelve characters.
pub fn random_name() -> Name {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(1, 13);
    let text: String = (0..len)
        .map(|_| NAME_SYMBOLS[rng.gen_range(0, NAME_SYMBOLS.len())] as char)
        .collect();
    Name::from_string(&text).unwrap()
}

/// Generate a random alphanumeric string of the given length.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .collect()
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}

pub fn random_symbol_code() -> SymbolCode {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(1, 8);
    let code: String = (0..len)
        .map(|_| rng.gen_range(b'A', b'Z' + 1) as char)
        .collect();
    SymbolCode::from_string(&code).unwrap()
}

pub fn random_symbol() -> Symbol {
    let precision = rand::thread_rng().gen_range(0, MAX_PRECISION + 1);
    Symbol::new(precision, random_symbol_code()).unwrap()
}

/// Generate a random asset with a random, possibly negative, amount.
pub fn random_asset() -> Asset {
    Asset::new(rand::thread_rng().gen(), random_symbol())
}

/// Generate a public key with a random payload of the layout `curve` requires.
pub fn random_public_key(curve: CurveType) -> PublicKey {
    let mut data = random_bytes(33);
    if curve == CurveType::WA {
        data.push(1);
        let rpid = format!("{}.example", random_string(8).to_lowercase());
        data.push(rpid.len() as u8);
        data.extend_from_slice(rpid.as_bytes());
    }
    PublicKey::from_bytes(curve, data).unwrap()
}

/// Generate a signature with a random payload of the layout `curve` requires.
pub fn random_signature(curve: CurveType) -> Signature {
    let mut data = random_bytes(65);
    if curve == CurveType::WA {
        data.push(37);
        data.extend(random_bytes(37));
        let client_json = format!("{{\"challenge\":\"{}\"}}", random_string(16));
        data.push(client_json.len() as u8);
        data.extend_from_slice(client_json.as_bytes());
    }
    Signature::from_bytes(curve, data).unwrap()
}

/// ABI exercising inheritance, aliases, modifiers, variants and binary extensions.
pub const SAMPLE_ABI: &str = r#"{
    "version": "eosio::abi/1.1",
    "types": [
        {"new_type_name": "account_name", "type": "name"},
        {"new_type_name": "memo_list", "type": "string[]"}
    ],
    "structs": [
        {
            "name": "foo",
            "base": "",
            "fields": [
                {"name": "one", "type": "string"},
                {"name": "two", "type": "int8"}
            ]
        },
        {
            "name": "bar",
            "base": "foo",
            "fields": [
                {"name": "three", "type": "name?"},
                {"name": "four", "type": "string[]?"}
            ]
        },
        {
            "name": "transfer",
            "base": "",
            "fields": [
                {"name": "from", "type": "account_name"},
                {"name": "to", "type": "account_name"},
                {"name": "quantity", "type": "asset"},
                {"name": "memo", "type": "string"}
            ]
        },
        {
            "name": "with_optional",
            "base": "",
            "fields": [
                {"name": "id", "type": "uint32"},
                {"name": "note", "type": "string?"}
            ]
        },
        {
            "name": "with_extension",
            "base": "",
            "fields": [
                {"name": "id", "type": "uint32"},
                {"name": "note", "type": "string$"}
            ]
        },
        {
            "name": "account",
            "base": "",
            "fields": [{"name": "balance", "type": "asset"}]
        },
        {
            "name": "keyed",
            "base": "",
            "fields": [
                {"name": "key", "type": "public_key"},
                {"name": "choice", "type": "key_or_name"},
                {"name": "memos", "type": "memo_list"}
            ]
        }
    ],
    "actions": [
        {"name": "transfer", "type": "transfer", "ricardian_contract": ""},
        {"name": "setfoo", "type": "bar", "ricardian_contract": ""}
    ],
    "tables": [
        {
            "name": "accounts",
            "index_type": "i64",
            "key_names": [],
            "key_types": [],
            "type": "account"
        }
    ],
    "variants": [
        {"name": "key_or_name", "types": ["public_key", "name", "foo"]}
    ]
}"#;

/// The indexed form of [SAMPLE_ABI].
pub fn sample_abi() -> Abi {
    Abi::from_json_str(SAMPLE_ABI).unwrap()
}
