// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use core::str::FromStr;

use meshcop_tlv::{DecodeTlvValueUnchecked, TlvCollection, TlvMetadata, TlvType, TryEncodeTlv};

use crate::{
    commissioner::CommissionerSessionId,
    dataset::{
        timestamp::{ActiveTimestamp, PendingTimestamp},
        Components, DatasetKind, DelayTimer, ExtendedPanId, MeshLocalPrefix, NetworkKey,
        NetworkName, Pskc, SecurityPolicy, Timestamp,
    },
    radio::{Channel, ChannelMask, PanId, WakeUpChannel},
    TwineCodecError,
};

mod iter;
pub use iter::{OperationalDatasetItem, OperationalDatasetIter};

const OPERATIONAL_DATASET_MAX_SIZE: usize = 254;

const ACTIVE_REQUIRED_TLVS: [u8; 10] = [
    ActiveTimestamp::TLV_TYPE,
    Channel::TLV_TYPE,
    ChannelMask::TLV_TYPE,
    ExtendedPanId::TLV_TYPE,
    MeshLocalPrefix::TLV_TYPE,
    NetworkKey::TLV_TYPE,
    NetworkName::TLV_TYPE,
    PanId::TLV_TYPE,
    Pskc::TLV_TYPE,
    SecurityPolicy::TLV_TYPE,
];

const PENDING_REQUIRED_TLVS: [u8; 12] = [
    ActiveTimestamp::TLV_TYPE,
    PendingTimestamp::TLV_TYPE,
    DelayTimer::TLV_TYPE,
    Channel::TLV_TYPE,
    ChannelMask::TLV_TYPE,
    ExtendedPanId::TLV_TYPE,
    MeshLocalPrefix::TLV_TYPE,
    NetworkKey::TLV_TYPE,
    NetworkName::TLV_TYPE,
    PanId::TLV_TYPE,
    Pskc::TLV_TYPE,
    SecurityPolicy::TLV_TYPE,
];

macro_rules! decode_type {
    ($name:ident, $decode_type:ty) => {
        pub fn $name(&self) -> Option<$decode_type> {
            self.collection.decode_type_unchecked::<$decode_type>()
        }
    };
}

/// A structured, presence-annotated view of an [`OperationalDataset`]'s thirteen
/// components. Dataset -> Info is total (unknown TLVs are dropped); Info -> Dataset
/// can fail if the materialized TLVs would not fit in [`OPERATIONAL_DATASET_MAX_SIZE`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DatasetInfo {
    pub active_timestamp: Option<Timestamp>,
    pub pending_timestamp: Option<Timestamp>,
    pub delay_timer: Option<DelayTimer>,
    pub channel: Option<Channel>,
    pub wakeup_channel: Option<Channel>,
    pub channel_mask: Option<ChannelMask>,
    pub extended_pan_id: Option<ExtendedPanId>,
    pub mesh_local_prefix: Option<MeshLocalPrefix>,
    pub network_key: Option<NetworkKey>,
    pub network_name: Option<NetworkName>,
    pub pan_id: Option<PanId>,
    pub pskc: Option<Pskc>,
    pub security_policy: Option<SecurityPolicy>,
}

impl DatasetInfo {
    /// The presence bitmap implied by which fields are set.
    pub fn components(&self) -> Components {
        let mut components = Components::empty();

        if self.active_timestamp.is_some() {
            components |= Components::ACTIVE;
        }
        if self.pending_timestamp.is_some() {
            components |= Components::PENDING;
        }
        if self.delay_timer.is_some() {
            components |= Components::DELAY;
        }
        if self.channel.is_some() {
            components |= Components::CHANNEL;
        }
        if self.wakeup_channel.is_some() {
            components |= Components::WAKEUP_CHANNEL;
        }
        if self.channel_mask.is_some() {
            components |= Components::CHANNEL_MASK;
        }
        if self.extended_pan_id.is_some() {
            components |= Components::EXTENDED_PAN_ID;
        }
        if self.mesh_local_prefix.is_some() {
            components |= Components::MESH_LOCAL_PREFIX;
        }
        if self.network_key.is_some() {
            components |= Components::NETWORK_KEY;
        }
        if self.network_name.is_some() {
            components |= Components::NETWORK_NAME;
        }
        if self.pan_id.is_some() {
            components |= Components::PAN_ID;
        }
        if self.pskc.is_some() {
            components |= Components::PSKC;
        }
        if self.security_policy.is_some() {
            components |= Components::SECURITY_POLICY;
        }

        components
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OperationalDataset {
    collection: TlvCollection<OPERATIONAL_DATASET_MAX_SIZE>,
    update_time_ms: u64,
}

impl OperationalDataset {
    pub fn new() -> Self {
        Self {
            collection: TlvCollection::default(),
            update_time_ms: 0,
        }
    }

    /// Milliseconds-since-epoch timestamp of the last mutation made through
    /// [`set_from_info`](Self::set_from_info), [`set_from_bytes`](Self::set_from_bytes), or
    /// [`write_tlv`](Self::write_tlv). Callers that own an injected clock (e.g. a
    /// `DatasetLocal` loading a Dataset from settings storage) should overwrite this with
    /// [`set_update_time_ms`](Self::set_update_time_ms) right after mutating, so that later
    /// Delay Timer aging math runs against that clock rather than wall time.
    pub fn update_time_ms(&self) -> u64 {
        self.update_time_ms
    }

    pub fn set_update_time_ms(&mut self, update_time_ms: u64) {
        self.update_time_ms = update_time_ms;
    }

    #[cfg(any(test, feature = "std"))]
    fn touch(&mut self) {
        use std::time::{SystemTime, UNIX_EPOCH};

        self.update_time_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
    }

    #[cfg(not(any(test, feature = "std")))]
    fn touch(&mut self) {}

    /// Generate a new random Active Operational Dataset.
    ///
    /// Mirrors `Info::GenerateRandom`: the supported channel mask is assumed to be
    /// 11-26 (the crate's only `ChannelMask` default today; a caller wanting a
    /// different supported set should build the `Info` by hand and call
    /// [`OperationalDataset::set_from_info`]).
    #[cfg(any(test, feature = "std"))]
    pub fn random() -> Result<Self, TwineCodecError> {
        use crate::dataset::timestamp::Authoritative;

        let channel_mask = ChannelMask::default();
        let channel = Channel::new(
            0,
            channel_mask
                .random_channel()
                .ok_or(TwineCodecError::Internal("channel mask has no channels"))?,
        );
        let wakeup_channel = Channel::new(
            0,
            channel_mask
                .random_channel()
                .ok_or(TwineCodecError::Internal("channel mask has no channels"))?,
        );

        let pan_id = PanId::random();
        let network_name = alloc::format!("Twine-{:x}", pan_id.get());

        let info = DatasetInfo {
            active_timestamp: Some(Timestamp::now(Authoritative(false))),
            pending_timestamp: None,
            delay_timer: None,
            channel: Some(channel),
            wakeup_channel: Some(wakeup_channel),
            channel_mask: Some(channel_mask),
            extended_pan_id: Some(ExtendedPanId::random()),
            mesh_local_prefix: Some(MeshLocalPrefix::random_ula()),
            network_key: Some(NetworkKey::random()),
            network_name: Some(NetworkName::from_str(&network_name)?),
            pan_id: Some(pan_id),
            pskc: Some(Pskc::random()),
            security_policy: Some(SecurityPolicy::default()),
        };

        let mut dataset = Self::new();
        dataset.set_from_info(&info)?;
        Ok(dataset)
    }

    pub fn active_timestamp(&self) -> Option<Timestamp> {
        self.collection
            .decode_type_unchecked::<ActiveTimestamp>()
            .map(Timestamp::from)
    }

    pub fn set_active_timestamp(&mut self, timestamp: Timestamp) -> Result<(), TwineCodecError> {
        let active_timestamp = ActiveTimestamp::from(timestamp);
        self.collection.replace_or_push(active_timestamp)?;
        Ok(())
    }

    pub fn pending_timestamp(&self) -> Option<Timestamp> {
        self.collection
            .decode_type_unchecked::<PendingTimestamp>()
            .map(Timestamp::from)
    }

    pub fn wake_up_channel(&self) -> Option<Channel> {
        self.collection
            .decode_type_unchecked::<WakeUpChannel>()
            .map(Channel::from)
    }

    decode_type!(delay_timer, DelayTimer);
    decode_type!(channel, Channel);
    decode_type!(pan_id, PanId);
    decode_type!(channel_mask, ChannelMask);
    decode_type!(extended_pan_id, ExtendedPanId);
    decode_type!(network_name, NetworkName);
    decode_type!(pskc, Pskc);
    decode_type!(network_key, NetworkKey);
    decode_type!(mesh_local_prefix, MeshLocalPrefix);
    decode_type!(security_policy, SecurityPolicy);
    decode_type!(commissioner_session_id, CommissionerSessionId);

    /// Full invariant check: bounded length, non-extended TLVs entirely in-bounds,
    /// every Dataset-known TLV obeys its per-type rule, and no Dataset-known type
    /// appears more than once.
    pub fn validate_tlvs(&self) -> Result<(), TwineCodecError> {
        let mut seen = [false; 256];

        for record in &self.collection {
            if record.len() < 2 {
                return Err(TwineCodecError::MalformedDataset(
                    "TLV record too short to hold a type and length",
                ));
            }

            let tlv_type = record[0];
            let length = record[1];

            if length == 0xFF {
                return Err(TwineCodecError::MalformedDataset(
                    "extended-length TLVs are not permitted inside a Dataset",
                ));
            }

            let value = &record[2..];
            if value.len() != length as usize {
                return Err(TwineCodecError::MalformedDataset(
                    "TLV length byte does not match the encoded value size",
                ));
            }

            if is_known_dataset_tlv_type(tlv_type) {
                if seen[tlv_type as usize] {
                    return Err(TwineCodecError::DuplicateTlv(tlv_type));
                }
                seen[tlv_type as usize] = true;
                validate_known_tlv_value(tlv_type, value)?;
            }
        }

        Ok(())
    }

    /// Populate a presence-annotated structured view of this Dataset. Always succeeds;
    /// unknown TLVs are silently dropped.
    pub fn convert_to(&self) -> DatasetInfo {
        DatasetInfo {
            active_timestamp: self.active_timestamp(),
            pending_timestamp: self.pending_timestamp(),
            delay_timer: self.delay_timer(),
            channel: self.channel(),
            wakeup_channel: self.wake_up_channel(),
            channel_mask: self.channel_mask(),
            extended_pan_id: self.extended_pan_id(),
            mesh_local_prefix: self.mesh_local_prefix(),
            network_key: self.network_key(),
            network_name: self.network_name(),
            pan_id: self.pan_id(),
            pskc: self.pskc(),
            security_policy: self.security_policy(),
        }
    }

    /// Replace the contents of this Dataset with the TLVs implied by `info`'s
    /// presence set, written in the canonical wire-interop order.
    pub fn set_from_info(&mut self, info: &DatasetInfo) -> Result<(), TwineCodecError> {
        let mut collection = TlvCollection::default();

        if let Some(v) = info.active_timestamp {
            collection.push(ActiveTimestamp::from(v))?;
        }
        if let Some(v) = info.pending_timestamp {
            collection.push(PendingTimestamp::from(v))?;
        }
        if let Some(v) = info.delay_timer {
            collection.push(v)?;
        }
        if let Some(v) = info.channel {
            collection.push(v)?;
        }
        if let Some(v) = info.wakeup_channel {
            collection.push(WakeUpChannel::from(v))?;
        }
        if let Some(v) = info.channel_mask {
            collection.push(v)?;
        }
        if let Some(v) = info.extended_pan_id {
            collection.push(v)?;
        }
        if let Some(v) = info.mesh_local_prefix {
            collection.push(v)?;
        }
        if let Some(v) = info.network_key {
            collection.push(v)?;
        }
        if let Some(v) = info.network_name {
            collection.push(v)?;
        }
        if let Some(v) = info.pan_id {
            collection.push(v)?;
        }
        if let Some(v) = info.pskc {
            collection.push(v)?;
        }
        if let Some(v) = info.security_policy {
            collection.push(v)?;
        }

        self.collection = collection;
        self.touch();
        Ok(())
    }

    /// Replace the contents of this Dataset with a raw TLV byte image.
    pub fn set_from_bytes(&mut self, bytes: &[u8]) -> Result<(), TwineCodecError> {
        if bytes.len() > OPERATIONAL_DATASET_MAX_SIZE {
            return Err(TwineCodecError::BufferMaxLength(
                "OperationalDataset",
                OPERATIONAL_DATASET_MAX_SIZE,
                bytes.len(),
            ));
        }

        let mut buffer = [0_u8; OPERATIONAL_DATASET_MAX_SIZE];
        buffer[..bytes.len()].copy_from_slice(bytes);

        self.collection = TlvCollection::new_from_static(buffer);
        self.touch();
        Ok(())
    }

    /// Replace or append a single typed TLV.
    pub fn write_tlv<T>(&mut self, value: T) -> Result<(), TwineCodecError>
    where
        T: TryEncodeTlv + TlvMetadata,
    {
        self.collection.replace_or_push(value)?;
        self.touch();
        Ok(())
    }

    /// Remove the first TLV of type `T`, if present. A no-op if `T` is absent.
    pub fn remove_tlv<T>(&mut self)
    where
        T: TlvMetadata,
    {
        self.collection.remove::<T>();
    }

    /// Copy each TLV of `other` on top of this Dataset's contents. `other` is
    /// validated first; its records overlay (replace, or append if absent) this
    /// Dataset's matching types.
    pub fn write_tlvs_from(&mut self, other: &OperationalDataset) -> Result<(), TwineCodecError> {
        other.validate_tlvs()?;

        for record in &other.collection {
            self.collection.replace_or_push_raw(record)?;
        }

        Ok(())
    }

    /// Append raw TLV bytes to the end of this Dataset without deduplicating
    /// against existing types. The caller is responsible for re-validating.
    pub fn append_tlvs_from(&mut self, bytes: &[u8]) -> Result<(), TwineCodecError> {
        self.collection.push_raw(bytes)?;
        Ok(())
    }

    pub fn read_timestamp(&self, kind: DatasetKind) -> Option<Timestamp> {
        match kind {
            DatasetKind::Active => self.active_timestamp(),
            DatasetKind::Pending => self.pending_timestamp(),
        }
    }

    /// True iff every TLV of `self`, except ActiveTimestamp/PendingTimestamp/DelayTimer,
    /// appears bytewise-identically (type, length, and value) somewhere in `other`.
    pub fn is_subset_of(&self, other: &OperationalDataset) -> bool {
        let excluded = [
            ActiveTimestamp::TLV_TYPE,
            PendingTimestamp::TLV_TYPE,
            DelayTimer::TLV_TYPE,
        ];

        for record in &self.collection {
            if excluded.contains(&record[0]) {
                continue;
            }

            let found = (&other.collection).into_iter().any(|other_record| other_record == record);
            if !found {
                return false;
            }
        }

        true
    }

    /// Active requires the ten core TLVs; Pending additionally requires
    /// PendingTimestamp and DelayTimer.
    pub fn contains_all_required_for(&self, kind: DatasetKind) -> bool {
        let required: &[u8] = match kind {
            DatasetKind::Active => &ACTIVE_REQUIRED_TLVS,
            DatasetKind::Pending => &PENDING_REQUIRED_TLVS,
        };

        required.iter().all(|t| self.collection.contains_tlv(*t))
    }

    #[cfg(any(test, feature = "std"))]
    pub fn pretty_fmt(&self) {
        std::println!("Operational Dataset: {:?}", self);
        self.iter().for_each(|item| std::println!("{item:?}"));
    }

    pub fn iter(&self) -> OperationalDatasetIter<'_> {
        OperationalDatasetIter {
            inner: (&self.collection).into_iter(),
        }
    }

    #[cfg(any(test, feature = "alloc"))]
    pub fn as_hex_string(&self) -> alloc::string::String {
        let mut hex_string = alloc::string::String::new();
        for tlv in &self.collection {
            hex_string.push_str(&hex::encode(tlv));
        }
        hex_string
    }

    /// The raw TLV byte image, for callers (e.g. a settings store adapter) that
    /// need to persist or transmit the Dataset rather than inspect it.
    #[cfg(any(test, feature = "alloc"))]
    pub fn as_bytes(&self) -> alloc::vec::Vec<u8> {
        let mut bytes = alloc::vec::Vec::new();
        for tlv in &self.collection {
            bytes.extend_from_slice(tlv);
        }
        bytes
    }
}

impl Default for OperationalDataset {
    fn default() -> Self {
        Self::new()
    }
}

fn is_known_dataset_tlv_type(tlv_type: u8) -> bool {
    tlv_type == ActiveTimestamp::TLV_TYPE
        || tlv_type == PendingTimestamp::TLV_TYPE
        || tlv_type == DelayTimer::TLV_TYPE
        || tlv_type == Channel::TLV_TYPE
        || tlv_type == WakeUpChannel::TLV_TYPE
        || tlv_type == ChannelMask::TLV_TYPE
        || tlv_type == ExtendedPanId::TLV_TYPE
        || tlv_type == MeshLocalPrefix::TLV_TYPE
        || tlv_type == NetworkKey::TLV_TYPE
        || tlv_type == NetworkName::TLV_TYPE
        || tlv_type == PanId::TLV_TYPE
        || tlv_type == Pskc::TLV_TYPE
        || tlv_type == SecurityPolicy::TLV_TYPE
        || tlv_type == CommissionerSessionId::TLV_TYPE
}

/// Per-type validity rule from `Dataset::IsTlvValid`: min-length checks for the
/// fixed-size secret/identity TLVs, decode-and-range checks for Channel/WakeupChannel,
/// and type-specific `IsValid()` for NetworkName/SecurityPolicy/ChannelMask. All other
/// known types (ActiveTimestamp, PendingTimestamp, DelayTimer, CommissionerSessionId)
/// fall through unconditionally, matching the original's asymmetric validator.
fn validate_known_tlv_value(tlv_type: u8, value: &[u8]) -> Result<(), TwineCodecError> {
    if tlv_type == PanId::TLV_TYPE {
        if value.len() < 2 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == ExtendedPanId::TLV_TYPE {
        if value.len() < 8 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == Pskc::TLV_TYPE {
        if value.len() < 16 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == NetworkKey::TLV_TYPE {
        if value.len() < 16 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == MeshLocalPrefix::TLV_TYPE {
        if value.len() < 8 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == Channel::TLV_TYPE || tlv_type == WakeUpChannel::TLV_TYPE {
        if value.len() < 3 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
        let channel = Channel::decode_tlv_value_unchecked(value);
        if !channel.is_valid() {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == NetworkName::TLV_TYPE {
        if value.is_empty() || value.len() > 16 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == SecurityPolicy::TLV_TYPE {
        if value.len() < 2 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    } else if tlv_type == ChannelMask::TLV_TYPE {
        // A single page-0 entry is exactly 6 bytes (page + mask-length + 4-byte
        // mask). `ChannelMask` only ever decodes that first entry, so a buffer
        // of any other length -- truncated, or a legal multi-entry sequence --
        // is rejected here rather than silently decoded down to one entry.
        if value.len() != 6 || value[1] != 4 {
            return Err(TwineCodecError::InvalidTlvValue(tlv_type));
        }
    }

    Ok(())
}

impl FromStr for OperationalDataset {
    type Err = TwineCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Ensure even number of characters
        if (s.len() & 1) != 0 {
            return Err(TwineCodecError::HexDecodeError);
        }

        let n = s.len() / 2;
        let mut buffer = [0_u8; OPERATIONAL_DATASET_MAX_SIZE];

        // Ensure buffer is large enough
        if n > buffer.len() {
            return Err(TwineCodecError::HexDecodeError);
        }

        hex::decode_to_slice(s, &mut buffer[..n]).map_err(|_| TwineCodecError::HexDecodeError)?;
        let collection = TlvCollection::new_from_static(buffer);

        Ok(Self {
            collection,
            update_time_ms: 0,
        })
    }
}

impl core::fmt::Display for OperationalDataset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.iter()
            .fold(Ok(()), |res, item| res.and_then(|_| writeln!(f, "{item}")))
    }
}
