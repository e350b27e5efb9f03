// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wire helpers for the MGMT envelope TLVs (Get, State, CommissionerSessionId)
//! that wrap a Dataset rather than living inside one. §3.2 lists these as
//! request/response-only types that never persist in a stored Active or
//! Pending Dataset, so they are kept out of `OperationalDataset`'s own
//! validated-buffer machinery and parsed here with the same linear scan C1
//! uses internally (`find(buffer, type) -> optional<TLV*>`).

use meshcop_codec::dataset::OperationalDataset;

const GET_TLV_TYPE: u8 = 0x0d;
const STATE_TLV_TYPE: u8 = 0x10;
const COMMISSIONER_SESSION_ID_TLV_TYPE: u8 = 0x0b;

/// The outcome carried by a State TLV in a MGMT_SET/REPLACE response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MgmtState {
    Accept,
    Reject,
}

impl MgmtState {
    fn wire_value(self) -> u8 {
        match self {
            MgmtState::Accept => 0x01,
            MgmtState::Reject => 0xff,
        }
    }

    /// Encode as a standalone 3-byte TLV (type, length, value).
    pub fn encode_tlv(self) -> [u8; 3] {
        [STATE_TLV_TYPE, 1, self.wire_value()]
    }
}

/// Scan a flat TLV byte stream for the first occurrence of `tlv_type`,
/// returning its value bytes. Stops at the first malformed (truncated)
/// header or length it encounters rather than panicking.
fn find_tlv_value(buffer: &[u8], tlv_type: u8) -> Option<&[u8]> {
    let mut offset = 0usize;
    while offset + 2 <= buffer.len() {
        let ty = buffer[offset];
        let len = buffer[offset + 1] as usize;
        let value_start = offset + 2;
        let value_end = value_start.checked_add(len)?;
        if value_end > buffer.len() {
            return None;
        }
        if ty == tlv_type {
            return Some(&buffer[value_start..value_end]);
        }
        offset = value_end;
    }
    None
}

/// Parse the Get TLV, if present: a list of TLV type tags the requester wants
/// echoed back. An absent Get TLV means "return everything" (§4.4.5 step 1).
pub fn parse_get_tlv(buffer: &[u8]) -> Option<Vec<u8>> {
    find_tlv_value(buffer, GET_TLV_TYPE).map(|value| value.to_vec())
}

/// Parse the State TLV from a MGMT_SET/REPLACE response.
pub fn parse_state_tlv(buffer: &[u8]) -> Option<MgmtState> {
    let value = find_tlv_value(buffer, STATE_TLV_TYPE)?;
    match value.first()? {
        0x01 => Some(MgmtState::Accept),
        _ => Some(MgmtState::Reject),
    }
}

/// Parse an optional CommissionerSessionId carried alongside a MGMT_SET/REPLACE
/// request body (it is never stored in the Dataset proper).
pub fn parse_commissioner_session_id(buffer: &[u8]) -> Option<u16> {
    let value = find_tlv_value(buffer, COMMISSIONER_SESSION_ID_TLV_TYPE)?;
    let bytes: [u8; 2] = value.try_into().ok()?;
    Some(u16::from_be_bytes(bytes))
}

/// Filter the raw TLV records of `buffer`, keeping only those whose type is in
/// `requested_types` (an absent or empty list means "keep everything") and
/// dropping any type listed in `exclude_types`. Used to build MGMT_GET
/// responses (§4.4.5): a requested-types list selects a subset of the stored
/// Dataset, and NetworkKey is additionally dropped when the caller's Security
/// Policy check disallows it.
pub fn filter_tlv_records(buffer: &[u8], requested_types: Option<&[u8]>, exclude_types: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset + 2 <= buffer.len() {
        let ty = buffer[offset];
        let len = buffer[offset + 1] as usize;
        let record_end = match offset.checked_add(2 + len) {
            Some(end) if end <= buffer.len() => end,
            _ => break,
        };

        let included = requested_types
            .map(|types| types.is_empty() || types.contains(&ty))
            .unwrap_or(true);
        let excluded = exclude_types.contains(&ty);
        if included && !excluded {
            out.extend_from_slice(&buffer[offset..record_end]);
        }
        offset = record_end;
    }
    out
}

/// Append a Get TLV carrying the given list of requested types. Callers build
/// MGMT_GET request bodies with this when the caller wants a subset rather
/// than the default "everything".
pub fn encode_get_tlv(requested_types: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + requested_types.len());
    out.push(GET_TLV_TYPE);
    out.push(requested_types.len() as u8);
    out.extend_from_slice(requested_types);
    out
}

/// Whether a requested change, relative to `current`, would disturb
/// connectivity and/or rotate the network key (§4.4.3 step 3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChangeClass {
    pub affects_connectivity: bool,
    pub affects_network_key: bool,
}

/// Classify `requested` against `current`. Only TLVs actually present in
/// `requested` are compared — an absent field never counts as a change.
pub fn classify_change(current: &OperationalDataset, requested: &OperationalDataset) -> ChangeClass {
    let affects_network_key = match requested.network_key() {
        Some(key) => current.network_key() != Some(key),
        None => false,
    };

    let channel_changed = requested.channel().map_or(false, |c| Some(c) != current.channel());
    let pan_id_changed = requested.pan_id().map_or(false, |p| Some(p) != current.pan_id());
    let mesh_local_prefix_changed = requested
        .mesh_local_prefix()
        .map_or(false, |p| Some(p) != current.mesh_local_prefix());

    ChangeClass {
        affects_connectivity: affects_network_key || channel_changed || pan_id_changed || mesh_local_prefix_changed,
        affects_network_key,
    }
}
