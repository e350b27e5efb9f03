// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persistence adapter (C3): load/save a [`OperationalDataset`] to a settings
//! store, migrating `NetworkKey`/`Pskc` through a secure key store when one is
//! available. Grounded in `dataset_manager.cpp::Read/LocalSave/Clear`.

use meshcop_codec::dataset::{DatasetKind, DelayTimer, NetworkKey, PendingTimestamp, Pskc};
use meshcop_codec::dataset::OperationalDataset;

use crate::error::ManagerError;
use crate::ports::{MillisecondClock, SecureKeyRef, SecureKeyStore, SettingsStore};
use crate::ports::SecureKeyKind;

fn network_key_bytes(key: NetworkKey) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(key.as_ref());
    out
}

/// Width of the trailing `updateTime` stamp this crate appends to every
/// persisted byte image. The wire TLV format has no slot for it (§3.4's
/// `updateTime` is local bookkeeping, not a Dataset TLV), and `OperationalDataset`
/// re-stamps it from wall-clock time on every `set_from_bytes` call rather than
/// the injected clock — so the only way to recover the *actual* save-time value
/// deterministically across a read is to persist it alongside the TLV bytes.
const UPDATE_TIME_STAMP_LEN: usize = 8;

/// Owns the persistence contract for a single Dataset `kind`.
pub struct DatasetLocal<P> {
    kind: DatasetKind,
    ports: P,
}

impl<P> DatasetLocal<P>
where
    P: SettingsStore + SecureKeyStore + MillisecondClock,
{
    pub fn new(kind: DatasetKind, ports: P) -> Self {
        Self { kind, ports }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    fn network_key_ref(&self) -> SecureKeyRef {
        SecureKeyRef::new(self.kind, SecureKeyKind::NetworkKey)
    }

    fn pskc_ref(&self) -> SecureKeyRef {
        SecureKeyRef::new(self.kind, SecureKeyKind::Pskc)
    }

    /// Load the stored Dataset, applying the Active-only TLV strip, the
    /// Pending-only Delay Timer aging, and the secure-key re-embedding (or
    /// first-boot migration) described in §4.3.
    pub async fn read(&self) -> Result<OperationalDataset, ManagerError> {
        let stored = self
            .ports
            .read_dataset(self.kind)
            .await
            .ok_or(ManagerError::NotFound)?;

        if stored.len() < UPDATE_TIME_STAMP_LEN {
            return Err(ManagerError::Parse);
        }
        let (tlv_bytes, stamp_bytes) = stored.split_at(stored.len() - UPDATE_TIME_STAMP_LEN);
        let saved_at_ms = u64::from_be_bytes(stamp_bytes.try_into().unwrap());

        let mut dataset = OperationalDataset::new();
        dataset.set_from_bytes(tlv_bytes)?;
        dataset.set_update_time_ms(saved_at_ms);

        if self.kind == DatasetKind::Active {
            dataset.remove_tlv::<PendingTimestamp>();
            dataset.remove_tlv::<DelayTimer>();
        } else if let Some(delay) = dataset.delay_timer() {
            let now_ms = self.ports.now_ms().await;
            let elapsed_ms = now_ms.saturating_sub(dataset.update_time_ms());
            let remaining_ms = (delay.milliseconds() as u64).saturating_sub(elapsed_ms);
            dataset.write_tlv(DelayTimer::from(remaining_ms as u32))?;
            dataset.set_update_time_ms(saved_at_ms);
        }

        let exported_key = self.ports.export(self.network_key_ref()).await;
        let exported_pskc = self.ports.export(self.pskc_ref()).await;

        match (exported_key, exported_pskc) {
            (Some(key_bytes), Some(pskc_bytes)) => {
                dataset.write_tlv(NetworkKey::from(u128::from_be_bytes(key_bytes)))?;
                dataset.write_tlv(Pskc::from(pskc_bytes))?;
            }
            _ => {
                // Either slot is empty: first boot after secure storage became
                // available, or a platform without one at all. Migrate both
                // keys from the in-buffer plaintext copy, or neither.
                if let (Some(key), Some(pskc)) = (dataset.network_key(), dataset.pskc()) {
                    self.ports
                        .import(self.network_key_ref(), &network_key_bytes(key))
                        .await;
                    self.ports.import(self.pskc_ref(), &pskc.into()).await;
                }
            }
        }

        Ok(dataset)
    }

    /// Persist `dataset`. An empty Dataset deletes the stored entry instead.
    /// Secure-storage platforms get the NetworkKey/Pskc TLV values zeroed out
    /// of the persisted byte image, migrated into secure storage instead.
    pub async fn save(&self, dataset: &OperationalDataset) -> Result<(), ManagerError> {
        if dataset.iter().next().is_none() {
            return self.clear().await;
        }

        let mut to_persist = *dataset;

        if let Some(key) = dataset.network_key() {
            self.ports
                .import(self.network_key_ref(), &network_key_bytes(key))
                .await;
            to_persist.write_tlv(NetworkKey::from(0u128))?;
        }
        if let Some(pskc) = dataset.pskc() {
            self.ports.import(self.pskc_ref(), &pskc.into()).await;
            to_persist.write_tlv(Pskc::from(0u128))?;
        }

        let mut bytes = to_persist.as_bytes();
        let saved_at_ms = self.ports.now_ms().await;
        bytes.extend_from_slice(&saved_at_ms.to_be_bytes());

        log::info!("dataset {:?} saved ({} bytes)", self.kind, bytes.len());
        self.ports.save_dataset(self.kind, &bytes).await;
        Ok(())
    }

    /// Delete the settings entry and any secure-store keys for this `kind`.
    pub async fn clear(&self) -> Result<(), ManagerError> {
        self.ports.delete_dataset(self.kind).await;
        self.ports.destroy(self.network_key_ref()).await;
        self.ports.destroy(self.pskc_ref()).await;
        log::info!("dataset {:?} cleared", self.kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakePorts;
    use meshcop_codec::dataset::Timestamp;
    use meshcop_codec::dataset::Authoritative;

    fn sample_active() -> OperationalDataset {
        let mut dataset = OperationalDataset::new();
        dataset
            .set_active_timestamp(Timestamp::from((10, 0, Authoritative(false))))
            .unwrap();
        dataset.write_tlv(NetworkKey::random()).unwrap();
        dataset.write_tlv(Pskc::random()).unwrap();
        dataset
    }

    #[tokio::test]
    async fn save_then_read_round_trips_and_migrates_keys() {
        let ports = FakePorts::new();
        let local = DatasetLocal::new(DatasetKind::Active, ports.clone());

        let original = sample_active();
        local.save(&original).await.unwrap();

        assert!(ports
            .secure_keys
            .contains(SecureKeyRef::new(DatasetKind::Active, SecureKeyKind::NetworkKey)));
        assert!(ports
            .secure_keys
            .contains(SecureKeyRef::new(DatasetKind::Active, SecureKeyKind::Pskc)));

        let restored = local.read().await.unwrap();
        assert_eq!(restored.network_key(), original.network_key());
        assert_eq!(restored.pskc(), original.pskc());
        assert_eq!(restored.active_timestamp(), original.active_timestamp());
    }

    #[tokio::test]
    async fn read_active_strips_pending_only_tlvs() {
        let ports = FakePorts::new();
        let local = DatasetLocal::new(DatasetKind::Active, ports.clone());

        let mut dataset = sample_active();
        dataset
            .write_tlv(PendingTimestamp::from(Timestamp::from((1, 0, Authoritative(false)))))
            .unwrap();
        dataset.write_tlv(DelayTimer::from(1000u32)).unwrap();
        local.save(&dataset).await.unwrap();

        let restored = local.read().await.unwrap();
        assert!(restored.pending_timestamp().is_none());
        assert!(restored.delay_timer().is_none());
    }

    #[tokio::test]
    async fn read_pending_ages_delay_timer_by_elapsed_time() {
        let ports = FakePorts::new();
        ports.clock.set(1_000);
        let local = DatasetLocal::new(DatasetKind::Pending, ports.clone());

        let mut dataset = OperationalDataset::new();
        dataset.write_tlv(DelayTimer::from(5_000u32)).unwrap();
        local.save(&dataset).await.unwrap();

        ports.clock.advance(2_000);
        let restored = local.read().await.unwrap();
        assert_eq!(restored.delay_timer().unwrap().milliseconds(), 3_000);
    }

    #[tokio::test]
    async fn clear_removes_settings_entry_and_secure_keys() {
        let ports = FakePorts::new();
        let local = DatasetLocal::new(DatasetKind::Active, ports.clone());

        local.save(&sample_active()).await.unwrap();
        local.clear().await.unwrap();

        assert!(local.read().await.is_err());
        assert!(!ports
            .secure_keys
            .contains(SecureKeyRef::new(DatasetKind::Active, SecureKeyKind::NetworkKey)));
    }
}
