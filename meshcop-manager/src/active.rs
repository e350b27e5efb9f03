// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Active Dataset manager (C5): network-bootstrap helpers plus the
//! leader-side MGMT_ACTIVE_SET/REPLACE/GET arbitration of §4.4.3. Layered on
//! top of the shared state machine of C4 (`DatasetManager`). Grounded in
//! `dataset_manager_ftd.cpp::{GenerateLocal,ProcessSetOrReplaceRequest,HandleSetOrReplace}`.

use core::ops::{Deref, DerefMut};
use core::str::FromStr;

use meshcop_codec::dataset::{
    Authoritative, DatasetInfo, DatasetKind, ExtendedPanId, MeshLocalPrefix, NetworkKey, NetworkName,
    OperationalDataset, PendingTimestamp, Pskc, SecurityPolicy, Timestamp,
};
use meshcop_codec::radio::{Channel, ChannelMask, PanId};

use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::manager::DatasetManager;
use crate::mgmt::{self, MgmtState};
use crate::pending::PendingDatasetManager;
use crate::ports::Ports;

pub const ACTIVE_GET_URI: &str = "/c/ag";
pub const ACTIVE_SET_URI: &str = "/c/as";
pub const ACTIVE_REPLACE_URI: &str = "/c/ar";

/// Which MGMT_ACTIVE command produced a leader-side set/replace request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MgmtCommand {
    Set,
    Replace,
}

/// C5: network-bootstrap helpers and MGMT_ACTIVE_GET/SET/REPLACE arbitration.
pub struct ActiveDatasetManager<P> {
    manager: DatasetManager<P>,
    auto_init: bool,
}

impl<P> Deref for ActiveDatasetManager<P> {
    type Target = DatasetManager<P>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl<P> DerefMut for ActiveDatasetManager<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.manager
    }
}

impl<P> ActiveDatasetManager<P>
where
    P: Ports + Clone,
{
    pub fn new(config: ManagerConfig, ports: P) -> Self {
        Self::with_auto_init(config, ports, true)
    }

    /// §4.5's supplement: models `OPENTHREAD_CONFIG_OPERATIONAL_DATASET_AUTO_INIT`
    /// as a constructor flag rather than a cargo feature, since both behaviors are
    /// legal runtime configurations of the same binary in this domain.
    pub fn with_auto_init(config: ManagerConfig, ports: P, auto_init: bool) -> Self {
        Self {
            manager: DatasetManager::new(DatasetKind::Active, ACTIVE_SET_URI, config, ports),
            auto_init,
        }
    }

    /// True iff the Active Dataset exists and carries the five TLVs a device
    /// needs to join or operate a network.
    pub async fn is_commissioned(&self) -> bool {
        let Ok(dataset) = self.manager.read().await else {
            return false;
        };
        dataset.network_key().is_some()
            && dataset.network_name().is_some()
            && dataset.extended_pan_id().is_some()
            && dataset.pan_id().is_some()
            && dataset.channel().is_some()
    }

    /// Saved locally but without a valid ActiveTimestamp yet (§4.5): the device
    /// has been field-provisioned but not yet formally commissioned.
    pub fn is_partially_complete(&self) -> bool {
        self.manager.is_local_saved() && !self.manager.local_timestamp().is_valid()
    }

    pub fn is_complete(&self) -> bool {
        self.manager.is_local_saved() && self.manager.local_timestamp().is_valid()
    }

    /// Produce a fresh random Dataset (§4.5): `ActiveTimestamp = (1, 0, non-auth)`,
    /// Channel/WakeupChannel drawn from `supported` (narrowed by `preferred` when
    /// the two masks intersect), and cryptographically random keys/identifiers.
    pub async fn create_new_network(
        &self,
        supported: ChannelMask,
        preferred: Option<ChannelMask>,
    ) -> Result<DatasetInfo, ManagerError> {
        let channel = pick_channel(supported, preferred).ok_or(ManagerError::InvalidState)?;
        let wakeup_channel = supported.random_channel().ok_or(ManagerError::InvalidState)?;
        let pan_id = PanId::random();
        let network_name = NetworkName::from_str(&format!(
            "{}-{:04x}",
            self.manager.config().network_name_prefix,
            pan_id.get()
        ))?;

        Ok(DatasetInfo {
            active_timestamp: Some(Timestamp::from((1, 0, Authoritative(false)))),
            pending_timestamp: None,
            delay_timer: None,
            channel: Some(Channel::new(0, channel)),
            wakeup_channel: Some(Channel::new(0, wakeup_channel)),
            channel_mask: Some(supported),
            extended_pan_id: Some(ExtendedPanId::random()),
            mesh_local_prefix: Some(MeshLocalPrefix::random_ula()),
            network_key: Some(NetworkKey::random()),
            network_name: Some(network_name),
            pan_id: Some(pan_id),
            pskc: Some(Pskc::random()),
            security_policy: Some(SecurityPolicy::default()),
        })
    }

    /// If no valid ActiveTimestamp exists locally, synthesize the missing TLVs
    /// field-by-field from current per-subsystem state (never overwriting a TLV
    /// already present), stamp the gap-filled result with a zero ActiveTimestamp,
    /// and save+apply it. A no-op if `auto_init` is false or a valid ActiveTimestamp
    /// is already on file.
    pub async fn start_leader(&mut self) -> Result<(), ManagerError> {
        if !self.auto_init || self.manager.local_timestamp().is_valid() {
            return Ok(());
        }

        let mut dataset = self.manager.read().await.unwrap_or_default();

        if dataset.channel().is_none() {
            if let Some(channel) = self.manager.ports().current_channel().await {
                dataset.write_tlv(channel)?;
            }
        }
        if dataset.extended_pan_id().is_none() {
            if let Some(xpan) = self.manager.ports().current_extended_pan_id().await {
                dataset.write_tlv(xpan)?;
            }
        }
        if dataset.network_name().is_none() {
            if let Some(name) = self.manager.ports().current_network_name().await {
                dataset.write_tlv(name)?;
            }
        }
        if dataset.pan_id().is_none() {
            if let Some(pan_id) = self.manager.ports().current_pan_id().await {
                dataset.write_tlv(pan_id)?;
            }
        }
        if dataset.network_key().is_none() {
            let key = match self.manager.ports().current_network_key().await {
                Some(key) => key,
                None => NetworkKey::random(),
            };
            dataset.write_tlv(key)?;
        }
        if dataset.pskc().is_none() {
            let pskc = match self.manager.ports().current_pskc().await {
                Some(pskc) => pskc,
                None => Pskc::random(),
            };
            dataset.write_tlv(pskc)?;
        }
        if dataset.security_policy().is_none() {
            let policy = self
                .manager
                .ports()
                .current_security_policy()
                .await
                .unwrap_or_default();
            dataset.write_tlv(policy)?;
        }
        if dataset.channel_mask().is_none() {
            dataset.write_tlv(ChannelMask::default())?;
        }
        if dataset.mesh_local_prefix().is_none() {
            dataset.write_tlv(MeshLocalPrefix::random_ula())?;
        }

        dataset.set_active_timestamp(Timestamp::clear())?;
        self.manager.save_local(&dataset).await
    }

    /// Serve a MGMT_ACTIVE_GET request: NetworkKey is filtered by Security Policy.
    pub async fn handle_get(&self, request: &[u8]) -> Vec<u8> {
        self.manager.handle_get(request, true).await
    }

    /// Leader-side decision for a MGMT_ACTIVE_SET or MGMT_ACTIVE_REPLACE request
    /// (§4.4.3). Returns the State TLV bytes to send back, and defers to `pending`
    /// when the requested change would disturb connectivity.
    pub async fn process_set_or_replace_request(
        &mut self,
        pending: &mut PendingDatasetManager<P>,
        command: MgmtCommand,
        payload: &[u8],
        leader_session_id: Option<u16>,
    ) -> Vec<u8> {
        match self
            .decide_set_or_replace(pending, command, payload, leader_session_id)
            .await
        {
            Ok(from_commissioner) => {
                if !from_commissioner {
                    log::info!("dataset changed: notifying registered commissioner ALOC");
                }
                MgmtState::Accept.encode_tlv().to_vec()
            }
            Err(_) => MgmtState::Reject.encode_tlv().to_vec(),
        }
    }

    async fn decide_set_or_replace(
        &mut self,
        pending: &mut PendingDatasetManager<P>,
        command: MgmtCommand,
        payload: &[u8],
        leader_session_id: Option<u16>,
    ) -> Result<bool, ManagerError> {
        let mut requested = OperationalDataset::new();
        requested.set_from_bytes(payload).map_err(|_| ManagerError::Parse)?;
        requested.validate_tlvs().map_err(|_| ManagerError::Parse)?;

        let active_timestamp = requested.active_timestamp().ok_or(ManagerError::Parse)?;
        if active_timestamp <= self.manager.local_timestamp() {
            return Err(ManagerError::Rejected);
        }

        let current = self.manager.read().await.unwrap_or_default();
        let change = mgmt::classify_change(&current, &requested);

        let session_id = requested.commissioner_session_id();
        if let Some(session_id) = session_id {
            if Some(session_id.get()) != leader_session_id {
                return Err(ManagerError::Rejected);
            }
            requested.remove_tlv::<meshcop_codec::commissioner::CommissionerSessionId>();
        }
        let from_commissioner = session_id.is_some();

        let resulting = match command {
            MgmtCommand::Replace => {
                if !from_commissioner {
                    return Err(ManagerError::Rejected);
                }
                if !requested.contains_all_required_for(DatasetKind::Active) {
                    return Err(ManagerError::Rejected);
                }
                requested
            }
            MgmtCommand::Set => {
                if from_commissioner {
                    if change.affects_connectivity {
                        return Err(ManagerError::Rejected);
                    }
                    let mut overlay = current;
                    overlay.write_tlvs_from(&requested)?;
                    overlay
                } else {
                    requested
                }
            }
        };

        if change.affects_connectivity {
            let mut deferred = resulting;
            deferred.write_tlv(PendingTimestamp::from(active_timestamp))?;
            pending
                .apply_active_dataset(&deferred, self.manager.config().delay_timer_minimal_ms)
                .await?;
        } else {
            self.manager.save(&resulting, false).await?;
        }

        Ok(from_commissioner)
    }
}

/// Pick a channel uniformly at random from `preferred ∩ supported`, falling
/// back to `supported` when the two masks don't intersect (or no preference
/// was given).
fn pick_channel(supported: ChannelMask, preferred: Option<ChannelMask>) -> Option<u16> {
    if let Some(preferred) = preferred {
        let combined = supported.mask() & preferred.mask();
        if combined != 0 {
            if let Ok(combined) = ChannelMask::from_str(&format!("0x{:08x}", combined)) {
                if let Some(channel) = combined.random_channel() {
                    return Some(channel);
                }
            }
        }
    }
    supported.random_channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakePorts;
    use meshcop_codec::thread::DeviceRole;

    fn config() -> ManagerConfig {
        ManagerConfig::builder()
            .delay_timer_minimal_ms(1_000)
            .build()
    }

    fn dataset_with(timestamp: (u64, u16), name: &str) -> OperationalDataset {
        let mut dataset = OperationalDataset::new();
        dataset
            .set_active_timestamp(Timestamp::from((timestamp.0, timestamp.1, Authoritative(false))))
            .unwrap();
        dataset.write_tlv(NetworkName::from_str(name).unwrap()).unwrap();
        dataset.write_tlv(PanId::from(0x1234)).unwrap();
        dataset.write_tlv(Channel::new(0, 15)).unwrap();
        dataset.write_tlv(NetworkKey::random()).unwrap();
        dataset
    }

    #[tokio::test]
    async fn create_new_network_draws_from_supported_mask() {
        let ports = FakePorts::new();
        let manager = ActiveDatasetManager::new(config(), ports);
        let info = manager
            .create_new_network(ChannelMask::default(), None)
            .await
            .unwrap();

        let channel = info.channel.unwrap().channel();
        assert!((11..=26).contains(&channel));
        assert_eq!(info.active_timestamp.unwrap(), Timestamp::from((1, 0, Authoritative(false))));
        assert!(info.network_name.unwrap().to_string().starts_with("Twine-"));
    }

    #[tokio::test]
    async fn leader_accepts_non_connectivity_set_from_commissioner() {
        let ports = FakePorts::new();
        ports.mle_role.set(DeviceRole::Leader);
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pend = PendingDatasetManager::new(config(), ports.clone());

        let current = dataset_with((10, 0), "Alpha");
        active.save_local(&current).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested
            .set_active_timestamp(Timestamp::from((11, 0, Authoritative(false))))
            .unwrap();
        requested
            .write_tlv(meshcop_codec::commissioner::CommissionerSessionId::new(7))
            .unwrap();
        requested.write_tlv(NetworkName::from_str("Beta").unwrap()).unwrap();

        let response = active
            .process_set_or_replace_request(&mut pend, MgmtCommand::Set, &requested.as_bytes(), Some(7))
            .await;
        assert_eq!(mgmt::parse_state_tlv(&response), Some(MgmtState::Accept));

        let saved = active.read().await.unwrap();
        assert_eq!(saved.network_name().unwrap().to_string(), "Beta");
        assert_eq!(saved.pan_id(), current.pan_id());
    }

    #[tokio::test]
    async fn leader_defers_connectivity_affecting_set_from_thread_node() {
        let ports = FakePorts::new();
        ports.mle_role.set(DeviceRole::Leader);
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pend = PendingDatasetManager::new(config(), ports.clone());

        let current = dataset_with((20, 0), "Alpha");
        active.save_local(&current).await.unwrap();

        let mut requested = current;
        requested
            .set_active_timestamp(Timestamp::from((21, 0, Authoritative(false))))
            .unwrap();
        requested.write_tlv(Channel::new(0, 20)).unwrap();

        let response = active
            .process_set_or_replace_request(&mut pend, MgmtCommand::Set, &requested.as_bytes(), None)
            .await;
        assert_eq!(mgmt::parse_state_tlv(&response), Some(MgmtState::Accept));

        let active_unchanged = active.read().await.unwrap();
        assert_eq!(active_unchanged.channel(), current.channel());

        let scheduled = pend.read().await.unwrap();
        assert_eq!(scheduled.channel(), Some(Channel::new(0, 20)));
        assert_eq!(scheduled.pending_timestamp(), Some(Timestamp::from((21, 0, Authoritative(false)))));
        assert_eq!(scheduled.delay_timer().unwrap().milliseconds(), 1_000);
    }
}
