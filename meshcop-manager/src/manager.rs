// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shared per-instance (Active or Pending) state machine (C4): local and
//! network timestamps, radio apply, MGMT_GET serving, and MGMT_SET initiation
//! when the local copy is ahead of the network. Grounded in
//! `dataset_manager.cpp::Save/LocalSave/SyncLocalWithLeader/HandleMgmtSetResponse`.

use meshcop_codec::dataset::{DatasetKind, DelayTimer, NetworkKey, OperationalDataset, Timestamp};
use meshcop_codec::thread::DeviceRole;
use meshcop_tlv::TlvType;

use crate::config::ManagerConfig;
use crate::dataset_local::DatasetLocal;
use crate::error::ManagerError;
use crate::mgmt::MgmtState;
use crate::ports::Ports;

/// The shared state machine underlying both `ActiveDatasetManager` and
/// `PendingDatasetManager`. Generic over the port bundle so tests substitute
/// in-memory fakes without touching the state machine itself.
pub struct DatasetManager<P> {
    kind: DatasetKind,
    config: ManagerConfig,
    local: DatasetLocal<P>,
    ports: P,
    uri: &'static str,

    network_timestamp: Timestamp,
    local_timestamp: Timestamp,
    local_saved: bool,
    mgmt_pending: bool,
    retry_deadline_ms: Option<u64>,
}

impl<P> DatasetManager<P>
where
    P: Ports + Clone,
{
    pub fn new(kind: DatasetKind, uri: &'static str, config: ManagerConfig, ports: P) -> Self {
        Self {
            kind,
            config,
            local: DatasetLocal::new(kind, ports.clone()),
            ports,
            uri,
            network_timestamp: Timestamp::clear(),
            local_timestamp: Timestamp::clear(),
            local_saved: false,
            mgmt_pending: false,
            retry_deadline_ms: None,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    /// A query-only view onto the MLE role, for callers above this layer that
    /// need to gate on role without reaching into the port bundle directly.
    pub async fn role(&self) -> DeviceRole {
        self.ports.role().await
    }

    pub(crate) fn ports(&self) -> &P {
        &self.ports
    }

    pub fn network_timestamp(&self) -> Timestamp {
        self.network_timestamp
    }

    pub fn local_timestamp(&self) -> Timestamp {
        self.local_timestamp
    }

    pub fn is_local_saved(&self) -> bool {
        self.local_saved
    }

    pub fn is_mgmt_pending(&self) -> bool {
        self.mgmt_pending
    }

    /// True iff the local copy is fully reconciled with what the rest of the
    /// partition believes is canonical (§3.6).
    pub fn is_current_with_network(&self) -> bool {
        self.local_timestamp.is_valid() && self.local_timestamp == self.network_timestamp
    }

    /// On boot: load from settings; cache the timestamp; apply to radio if this
    /// is the Active manager.
    pub async fn restore(&mut self) -> Result<Option<OperationalDataset>, ManagerError> {
        match self.local.read().await {
            Ok(dataset) => {
                self.local_saved = true;
                self.local_timestamp = dataset.read_timestamp(self.kind).unwrap_or(Timestamp::clear());
                self.network_timestamp = self.local_timestamp;
                if self.kind == DatasetKind::Active {
                    self.apply_configuration(&dataset).await;
                }
                log::info!("{:?} dataset restored from settings", self.kind);
                Ok(Some(dataset))
            }
            Err(ManagerError::NotFound) => {
                log::info!("no stored {:?} dataset on restore", self.kind);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn read(&self) -> Result<OperationalDataset, ManagerError> {
        self.local.read().await
    }

    /// The leader/arbiter entry point (§4.4.2, supplement): `network_timestamp` is
    /// unconditionally overwritten with `dataset`'s timestamp and applied-if-Active,
    /// then the three-way branch is exactly `Timestamp::Compare(network_timestamp,
    /// local_timestamp)`: ahead (or `allow_older_timestamp`) local-saves, behind
    /// arms the retry timer, equal does neither.
    pub async fn save(
        &mut self,
        dataset: &OperationalDataset,
        allow_older_timestamp: bool,
    ) -> Result<(), ManagerError> {
        let incoming = dataset
            .read_timestamp(self.kind)
            .unwrap_or(Timestamp::clear());

        self.network_timestamp = incoming;
        if self.kind == DatasetKind::Active {
            self.apply_configuration(dataset).await;
        }

        if allow_older_timestamp || self.network_timestamp > self.local_timestamp {
            self.local_save(dataset).await?;
        } else if self.network_timestamp < self.local_timestamp {
            self.retry_deadline_ms = Some(
                self.ports.now_ms().await + self.config.send_set_delay_ms,
            );
        }

        Ok(())
    }

    async fn local_save(&mut self, dataset: &OperationalDataset) -> Result<(), ManagerError> {
        self.local.save(dataset).await?;
        self.local_saved = true;
        self.local_timestamp = dataset
            .read_timestamp(self.kind)
            .unwrap_or(Timestamp::clear());
        log::info!("{:?} dataset locally saved", self.kind);
        Ok(())
    }

    /// The local/user entry point: local-save unconditionally, then dispatch by
    /// MLE role. Disabled/Leader re-apply via the restore path; Child/Router
    /// attempt to sync with the partition leader.
    pub async fn save_local(&mut self, dataset: &OperationalDataset) -> Result<(), ManagerError> {
        self.local_save(dataset).await?;

        match self.ports.role().await {
            DeviceRole::Disabled => {
                if self.kind == DatasetKind::Active {
                    self.apply_configuration(dataset).await;
                }
            }
            DeviceRole::Leader => {
                if self.kind == DatasetKind::Active {
                    self.apply_configuration(dataset).await;
                }
                self.network_timestamp = self.local_timestamp;
            }
            DeviceRole::Child | DeviceRole::Router => {
                self.sync_local_with_leader(dataset).await?;
            }
            DeviceRole::Detached => {}
        }

        Ok(())
    }

    /// Send a MGMT_SET for `dataset` to the leader, if no MGMT is already
    /// in-flight and the local copy is genuinely ahead of the network.
    pub async fn sync_local_with_leader(
        &mut self,
        dataset: &OperationalDataset,
    ) -> Result<(), ManagerError> {
        if self.mgmt_pending {
            return Err(ManagerError::Busy);
        }
        match self.ports.role().await {
            DeviceRole::Child | DeviceRole::Router => {}
            _ => return Ok(()),
        }
        if self.network_timestamp >= self.local_timestamp {
            return Ok(());
        }

        self.mgmt_pending = true;
        let mut request = self.ports.new_confirmable_post(self.uri);
        self.ports.append_bytes(&mut request, &dataset.as_bytes());

        match self.ports.send(request, "leader").await {
            Ok(response) => {
                let outcome = crate::mgmt::parse_state_tlv(&response.payload);
                self.handle_mgmt_set_response(outcome).await
            }
            Err(_) => self.handle_mgmt_set_response(None).await,
        }
    }

    /// Clear `mgmt_pending`, translate a rejected State TLV into `Rejected`, and
    /// always re-arm the 5s retry tick, win or lose — it is the steady heartbeat
    /// that re-evaluates `sync_local_with_leader` after every MGMT round-trip.
    pub async fn handle_mgmt_set_response(
        &mut self,
        state: Option<MgmtState>,
    ) -> Result<(), ManagerError> {
        self.mgmt_pending = false;
        self.retry_deadline_ms = Some(self.ports.now_ms().await + self.config.send_set_delay_ms);

        match state {
            Some(MgmtState::Accept) => {
                log::info!("{:?} MGMT_SET accepted by leader", self.kind);
                Ok(())
            }
            Some(MgmtState::Reject) => {
                log::warn!("{:?} MGMT_SET rejected by leader", self.kind);
                Err(ManagerError::Rejected)
            }
            None => {
                log::warn!("{:?} MGMT_SET send failed or timed out", self.kind);
                Err(ManagerError::Transport(crate::ports::TransportError::Timeout))
            }
        }
    }

    /// Delete the stored Dataset and reset all cached state. Used by the
    /// Pending manager's post-promotion and stale-discard cleanup (§4.6 step 5).
    pub async fn clear(&mut self) {
        self.ports.delete_dataset(self.kind).await;
        self.local_saved = false;
        self.local_timestamp = Timestamp::clear();
        self.network_timestamp = Timestamp::clear();
        self.mgmt_pending = false;
        self.retry_deadline_ms = None;
    }

    /// Advance the single-threaded clock: if a retry deadline has passed,
    /// re-attempt `sync_local_with_leader`.
    pub async fn tick(&mut self, now_ms: u64, dataset: &OperationalDataset) -> Result<(), ManagerError> {
        if let Some(deadline) = self.retry_deadline_ms {
            if now_ms >= deadline && !self.mgmt_pending {
                self.retry_deadline_ms = None;
                self.sync_local_with_leader(dataset).await?;
            }
        }
        Ok(())
    }

    /// Apply each known TLV to the radio port (§4.4.4). Individual failures are
    /// logged and do not abort the remaining TLVs.
    pub async fn apply_configuration(&self, dataset: &OperationalDataset) {
        if let Some(channel) = dataset.channel() {
            if self.ports.set_channel(channel).await.is_err() {
                log::error!("failed to apply Channel");
            }
        }
        if let Some(wakeup) = dataset.wake_up_channel() {
            // §9: always accepted and preserved, tolerated as a no-op by a
            // platform that cannot act on it.
            let _ = self.ports.set_wakeup_channel(wakeup).await;
        }
        if let Some(pan_id) = dataset.pan_id() {
            if self.ports.set_pan_id(pan_id).await.is_err() {
                log::error!("failed to apply PanId");
            }
        }
        if let Some(xpan) = dataset.extended_pan_id() {
            if self.ports.set_extended_pan_id(xpan).await.is_err() {
                log::error!("failed to apply ExtendedPanId");
            }
        }
        if let Some(name) = dataset.network_name() {
            if self.ports.set_network_name(name).await.is_err() {
                log::error!("failed to apply NetworkName");
            }
        }
        if let Some(key) = dataset.network_key() {
            if self.ports.set_network_key(key).await.is_err() {
                log::error!("failed to apply NetworkKey");
            }
        }
        if let Some(pskc) = dataset.pskc() {
            if self.ports.set_pskc(pskc).await.is_err() {
                log::error!("failed to apply Pskc");
            }
        }
        if let Some(prefix) = dataset.mesh_local_prefix() {
            if self.ports.set_mesh_local_prefix(prefix).await.is_err() {
                log::error!("failed to apply MeshLocalPrefix");
            }
        }
        if let Some(policy) = dataset.security_policy() {
            if self.ports.set_security_policy(policy).await.is_err() {
                log::error!("failed to apply SecurityPolicy");
            }
        }
    }

    /// Serve a MGMT_GET request (§4.4.5): parse an optional Get-TLV, load the
    /// stored Dataset (empty if none), and build the raw TLV response.
    pub async fn handle_get(&self, request: &[u8], check_security_policy: bool) -> Vec<u8> {
        let mut requested_types = crate::mgmt::parse_get_tlv(request);
        if self.kind == DatasetKind::Pending {
            if let Some(types) = requested_types.as_mut() {
                if !types.is_empty() && !types.contains(&DelayTimer::TLV_TYPE) {
                    types.push(DelayTimer::TLV_TYPE);
                }
            }
        }

        let dataset = self.local.read().await.unwrap_or_default();
        let network_key_allowed = !check_security_policy
            || dataset
                .security_policy()
                .map(|policy| policy.obtain_network_key_enabled())
                .unwrap_or(true);

        let mut exclude_types = Vec::new();
        if !network_key_allowed {
            exclude_types.push(NetworkKey::TLV_TYPE);
        }

        crate::mgmt::filter_tlv_records(&dataset.as_bytes(), requested_types.as_deref(), &exclude_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakePorts;
    use meshcop_codec::dataset::Authoritative;
    use meshcop_codec::radio::PanId;

    fn config() -> ManagerConfig {
        ManagerConfig::builder()
            .send_set_delay_ms(5_000)
            .build()
    }

    #[tokio::test]
    async fn save_with_newer_network_timestamp_applies_and_saves() {
        let ports = FakePorts::new();
        let mut manager = DatasetManager::new(DatasetKind::Active, "/c/as", config(), ports.clone());

        let mut dataset = OperationalDataset::new();
        dataset
            .set_active_timestamp(Timestamp::from((10, 0, Authoritative(false))))
            .unwrap();
        dataset.write_tlv(PanId::from(0x1234)).unwrap();

        manager.save(&dataset, false).await.unwrap();

        assert_eq!(manager.network_timestamp(), dataset.active_timestamp().unwrap());
        assert!(manager.is_local_saved());
        assert_eq!(ports.radio.last_pan_id(), Some(PanId::from(0x1234)));
    }

    #[tokio::test]
    async fn save_with_older_timestamp_schedules_retry_instead_of_saving() {
        let ports = FakePorts::new();
        let mut manager = DatasetManager::new(DatasetKind::Active, "/c/as", config(), ports.clone());

        let mut newer = OperationalDataset::new();
        newer
            .set_active_timestamp(Timestamp::from((10, 0, Authoritative(false))))
            .unwrap();
        manager.save(&newer, false).await.unwrap();

        let mut older = OperationalDataset::new();
        older
            .set_active_timestamp(Timestamp::from((5, 0, Authoritative(false))))
            .unwrap();
        manager.save(&older, false).await.unwrap();

        assert_eq!(manager.local_timestamp(), newer.active_timestamp().unwrap());
    }

    #[tokio::test]
    async fn save_local_as_leader_reapplies_and_advances_network_timestamp() {
        let ports = FakePorts::new();
        ports.mle_role.set(DeviceRole::Leader);
        let mut manager = DatasetManager::new(DatasetKind::Active, "/c/as", config(), ports.clone());

        let mut dataset = OperationalDataset::new();
        dataset
            .set_active_timestamp(Timestamp::from((1, 0, Authoritative(false))))
            .unwrap();

        manager.save_local(&dataset).await.unwrap();
        assert!(manager.is_current_with_network());
    }
}
