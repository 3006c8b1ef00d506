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

use serde::{Deserialize, Serialize};

/// Default bound on the nesting depth of a decoded value.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do with bytes left over after a top-level binary decode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBytes {
    /// Log the leftover byte count at debug level.
    Ignore,
    /// Log the leftover byte count at warn level.
    Warn,
    /// Fail with [crate::DecodeError::TrailingBytes].
    Reject,
}

impl Default for TrailingBytes {
    fn default() -> Self {
        TrailingBytes::Ignore
    }
}

/// Options for binary decoding.
///
/// ```rust
/// # use chain_codec::{DecodeOptions, TrailingBytes};
/// let options: DecodeOptions = serde_json::from_str(r#"{"trailing_bytes": "reject"}"#).unwrap();
/// assert_eq!(options.trailing_bytes, TrailingBytes::Reject);
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub trailing_bytes: TrailingBytes,
    pub max_depth: usize,
}

impl DecodeOptions {
    /// Options that require the whole input to be consumed.
    pub fn strict() -> Self {
        DecodeOptions {
            trailing_bytes: TrailingBytes::Reject,
            ..Self::default()
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            trailing_bytes: TrailingBytes::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
