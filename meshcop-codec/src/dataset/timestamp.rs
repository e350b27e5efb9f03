// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bytes::Buf;

use meshcop_macros::Tlv;
use meshcop_tlv::{
    write_tlv, DecodeTlvUnchecked, DecodeTlvValueUnchecked, GetTlvLength, TlvConstantMetadata,
    TlvLength, TlvMetadata, TlvType, TryEncodeTlv, TwineTlvError,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Authoritative(pub bool);

impl Authoritative {
    pub(crate) fn is_authoritative(&self) -> bool {
        self.0
    }
}

/// Maximum tick value (15 bits) plus one, i.e. the carry boundary into `seconds`.
const TICKS_PER_SECOND: u16 = 0x8000;

#[derive(Copy, Clone, Default, Eq, PartialEq, PartialOrd, Ord, Tlv)]
#[tlv(
    variants = [("Active", tlv_type = 0x0e), ("Pending", tlv_type = 0x33)],
    tlv_length = 8,
    derive_inner
)]
pub struct Timestamp(u64);

impl Timestamp {
    #[cfg(any(test, feature = "std"))]
    pub fn now(auth: Authoritative) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = SystemTime::now();
        let seconds = now.duration_since(UNIX_EPOCH).unwrap().as_secs();

        Self::from((seconds, 0, auth))
    }

    /// The "invalid"/unset Timestamp: sorts below every other Timestamp.
    pub const fn clear() -> Self {
        Self(0)
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    pub fn seconds(&self) -> u64 {
        self.0 >> 16
    }

    pub fn ticks(&self) -> u16 {
        ((self.0 >> 1) & 0x7fff) as u16
    }

    pub fn is_authoritative(&self) -> bool {
        (self.0 & 0x1) != 0
    }

    /// Advance this Timestamp by a random number of ticks in `[1, max_increase]`,
    /// carrying into `seconds` on tick overflow. The authoritative bit is left unchanged.
    pub fn advance_random_ticks(&self, max_increase: u16) -> Self {
        let increase = crate::random_range_u16(1..=max_increase.max(1)) as u32;
        let mut seconds = self.seconds();
        let mut ticks = self.ticks() as u32 + increase;

        while ticks >= TICKS_PER_SECOND as u32 {
            ticks -= TICKS_PER_SECOND as u32;
            seconds += 1;
        }

        let auth = if self.is_authoritative() { 1u64 } else { 0u64 };
        Self((seconds << 16) | ((ticks as u64) << 1) | auth)
    }
}
impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.seconds(),)
    }
}

impl core::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Timestamp {{ seconds: {}, ticks: {}, authoritative: {} }}",
            self.seconds(),
            self.ticks(),
            self.is_authoritative()
        )
    }
}

impl From<(u64, u16, Authoritative)> for Timestamp {
    fn from(parts: (u64, u16, Authoritative)) -> Self {
        let (seconds, ticks, auth) = parts;
        let seconds = seconds << 16;
        let ticks = (ticks as u64) & 0xfffe;
        let auth = if auth.is_authoritative() { 1u64 } else { 0u64 };

        Self(seconds | ticks | auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use meshcop_tlv::TryEncodeTlv;

    #[test]
    fn success_from_parts() {
        let timestamp = Timestamp::from((0x1234_5678, 0x9abc, Authoritative(true)));
        assert_eq!(timestamp.0, 0x1234_5678_9abd_u64);

        assert_eq!(timestamp.seconds(), 0x1234_5678);
        assert_eq!(timestamp.ticks(), 0x9abc >> 1);
        assert_eq!(timestamp.is_authoritative(), true);
    }

    #[test]
    fn success_active_timestamp_to_tlv() {
        let timestamp = Timestamp::from((0x1234_5678, 0x9abc, Authoritative(true)));
        let timestamp = ActiveTimestamp::from(timestamp);

        let mut buffer = [0u8; 2 + 8];
        let written = timestamp.try_encode_tlv(&mut buffer).unwrap();

        assert_eq!(written, 10);
        assert_eq!(buffer[0], 0x0e); // TLV Type
        assert_eq!(buffer[1], 0x08); // TLV Length
        assert_eq!(&buffer[2..], &0x1234_5678_9abd_u64.to_be_bytes()[..]);
    }

    #[test]
    fn success_pending_timestamp_to_tlv() {
        let timestamp = Timestamp::from((0x1234_5678, 0x9abc, Authoritative(true)));
        let timestamp = PendingTimestamp::from(timestamp);

        let mut buffer = [0u8; 2 + 8];
        let written = timestamp.try_encode_tlv(&mut buffer).unwrap();

        assert_eq!(written, 10);
        assert_eq!(buffer[0], 0x33); // TLV Type
        assert_eq!(buffer[1], 0x08); // TLV Length
        assert_eq!(&buffer[2..], &0x1234_5678_9abd_u64.to_be_bytes()[..]);
    }

    #[test]
    fn clear_sorts_below_every_valid_timestamp() {
        let clear = Timestamp::clear();
        assert!(!clear.is_valid());

        let valid = Timestamp::from((1, 0, Authoritative(false)));
        assert!(clear < valid);
    }

    #[test]
    fn ordering_is_seconds_then_ticks_then_authoritative() {
        let earlier = Timestamp::from((10, 0, Authoritative(false)));
        let later = Timestamp::from((11, 0, Authoritative(false)));
        assert!(earlier < later);

        let non_auth = Timestamp::from((10, 4, Authoritative(false)));
        let auth = Timestamp::from((10, 4, Authoritative(true)));
        assert!(non_auth < auth);
    }

    #[test]
    fn advance_random_ticks_always_increases() {
        let start = Timestamp::from((5, 0, Authoritative(true)));
        for _ in 0..100 {
            let advanced = start.advance_random_ticks(10);
            assert!(advanced > start);
            assert_eq!(advanced.is_authoritative(), start.is_authoritative());
        }
    }

    #[test]
    fn advance_random_ticks_carries_into_seconds() {
        let start = Timestamp::from((5, 0x7ffe, Authoritative(false)));
        let advanced = start.advance_random_ticks(10);
        assert!(advanced.seconds() > start.seconds());
    }
}
