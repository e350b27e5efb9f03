// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwineTlvError {
    #[error("Buffer was too short to begin decoding")]
    BufferDecodeTooShort,

    #[error("Unexpected length when parsing a TLV. Expected {0}; Found {1}")]
    BufferDecodeUnexpectedTlvLength(usize, usize),

    #[error("Buffer was too short to begin encoding")]
    BufferEncodeTooShort,

    #[error("Number of bytes exceeds buffer maximum length")]
    BufferMaxLength,

    #[error("TLV type mismatch")]
    BufferWrongType,

    #[error("Hex error: {0}")]
    HexError(#[from] faster_hex::Error),
}

impl PartialEq for TwineTlvError {
    fn eq(&self, other: &Self) -> bool {
        use TwineTlvError::*;
        match (self, other) {
            (BufferDecodeTooShort, BufferDecodeTooShort) => true,
            (BufferDecodeUnexpectedTlvLength(a, b), BufferDecodeUnexpectedTlvLength(c, d)) => {
                a == c && b == d
            }
            (BufferEncodeTooShort, BufferEncodeTooShort) => true,
            (BufferMaxLength, BufferMaxLength) => true,
            (BufferWrongType, BufferWrongType) => true,
            (HexError(_), HexError(_)) => true,
            _ => false,
        }
    }
}

impl Eq for TwineTlvError {}
