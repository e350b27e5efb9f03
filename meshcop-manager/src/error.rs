// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::ports::TransportError;

/// The error kinds of §7, as a single flat enum per the teacher's `TwineCodecError`/
/// `TwineTlvError` pattern. The codec crate's own error is wrapped rather than
/// flattened, so a caller can distinguish a codec-level parse failure from a
/// manager-level state conflict while `?` still composes across the boundary.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("codec error: {0}")]
    Codec(#[from] meshcop_codec::error::TwineCodecError),

    #[error("malformed TLV stream or duplicate/invalid TLV")]
    Parse,

    #[error("payload exceeds the dataset buffer capacity, or contains a forbidden TLV")]
    InvalidArgs,

    #[error("dataset buffer or transport buffer is full")]
    NoBufs,

    #[error("requested field is absent")]
    NotFound,

    #[error("another operation is already in flight")]
    Busy,

    #[error("requested state already matches")]
    Already,

    #[error("device is disabled or has no Active Dataset")]
    InvalidState,

    #[error("leader rejected the request")]
    Rejected,

    #[error("settings store is not available on this platform")]
    NotImplemented,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
