// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The user-facing update orchestrator (C7): stamp a partial change into a
//! correctly-ordered Pending Dataset, submit it, and report the outcome once
//! the resulting Active or Pending change is observed. Grounded in
//! `dataset_updater.cpp::{RequestUpdate,HandleDatasetChanged}`.

use tokio::sync::oneshot;

use meshcop_codec::dataset::{DelayTimer, OperationalDataset, PendingTimestamp, Timestamp};
use meshcop_codec::thread::DeviceRole;

use crate::active::ActiveDatasetManager;
use crate::error::ManagerError;
use crate::pending::PendingDatasetManager;
use crate::ports::Ports;

/// What `request_update`'s caller eventually learns via its callback.
#[derive(Debug, Eq, PartialEq)]
pub enum UpdateOutcome {
    Ok,
    Already,
}

struct InFlight {
    requested: OperationalDataset,
    requested_active_timestamp: Timestamp,
    requested_pending_timestamp: Timestamp,
    callback: oneshot::Sender<UpdateOutcome>,
}

/// C7: one in-flight update slot, no internal timeout — driven entirely by
/// the Active/Pending change events the owning subsystem forwards to it.
#[derive(Default)]
pub struct DatasetUpdater {
    in_flight: Option<InFlight>,
}

impl DatasetUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_update_ongoing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Drop the in-flight slot without invoking its callback.
    pub fn cancel_update(&mut self) {
        self.in_flight = None;
    }

    /// Stamp, overlay, and schedule `requested` as a new Pending Dataset
    /// (§4.7 steps 1-10). All checks run before any state change.
    pub async fn request_update<P>(
        &mut self,
        active: &ActiveDatasetManager<P>,
        pending: &mut PendingDatasetManager<P>,
        requested: &OperationalDataset,
        callback: oneshot::Sender<UpdateOutcome>,
    ) -> Result<(), ManagerError>
    where
        P: Ports + Clone,
    {
        if active.role().await == DeviceRole::Disabled {
            return Err(ManagerError::InvalidState);
        }
        if !active.local_timestamp().is_valid() {
            return Err(ManagerError::InvalidState);
        }

        requested.validate_tlvs().map_err(|_| ManagerError::InvalidArgs)?;
        if requested.active_timestamp().is_some() || requested.pending_timestamp().is_some() {
            return Err(ManagerError::InvalidArgs);
        }

        if self.in_flight.is_some() {
            return Err(ManagerError::Busy);
        }

        let current_active = active.read().await.unwrap_or_default();
        if requested.is_subset_of(&current_active) {
            return Err(ManagerError::Already);
        }

        let max_increase = active.config().max_timestamp_increase_ticks;
        let new_active_timestamp = active.local_timestamp().advance_random_ticks(max_increase);
        let new_pending_timestamp = pending.local_timestamp().advance_random_ticks(max_increase);

        let mut stamped = *requested;
        stamped
            .set_active_timestamp(new_active_timestamp)
            .map_err(|_| ManagerError::NoBufs)?;
        stamped
            .write_tlv(PendingTimestamp::from(new_pending_timestamp))
            .map_err(|_| ManagerError::NoBufs)?;
        if stamped.delay_timer().is_none() {
            stamped
                .write_tlv(DelayTimer::from(active.config().default_delay_ms))
                .map_err(|_| ManagerError::NoBufs)?;
        }

        let mut overlaid = current_active;
        overlaid
            .write_tlvs_from(&stamped)
            .map_err(|_| ManagerError::NoBufs)?;
        pending.save_local(&overlaid).await?;

        self.in_flight = Some(InFlight {
            requested: stamped,
            requested_active_timestamp: new_active_timestamp,
            requested_pending_timestamp: new_pending_timestamp,
            callback,
        });

        Ok(())
    }

    /// Subscribed to Active-Dataset-Changed. Only ever resolves the update
    /// (`Ok` on a match, `Already` on a detected conflict) — never leaves it
    /// waiting, per §4.7's supplement.
    pub fn on_active_changed(&mut self, active: &OperationalDataset) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        if in_flight.requested.is_subset_of(active) {
            let _ = in_flight.callback.send(UpdateOutcome::Ok);
            return;
        }

        let new_timestamp = active.active_timestamp().unwrap_or(Timestamp::clear());
        if new_timestamp >= in_flight.requested_active_timestamp {
            let _ = in_flight.callback.send(UpdateOutcome::Already);
        } else {
            self.in_flight = Some(in_flight);
        }
    }

    /// Subscribed to Pending-Dataset-Changed. Can only keep waiting or fail
    /// with `Already` — completion only ever arrives through the matching
    /// Active-Dataset-Changed event once the promotion lands.
    pub fn on_pending_changed(&mut self, pending: &OperationalDataset) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        if in_flight.requested.is_subset_of(pending) {
            self.in_flight = Some(in_flight);
            return;
        }

        let new_timestamp = pending.pending_timestamp().unwrap_or(Timestamp::clear());
        if new_timestamp >= in_flight.requested_pending_timestamp {
            let _ = in_flight.callback.send(UpdateOutcome::Already);
        } else {
            self.in_flight = Some(in_flight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagerConfig;
    use crate::fakes::FakePorts;
    use meshcop_codec::dataset::Authoritative;
    use meshcop_codec::radio::{Channel, PanId};

    fn config() -> ManagerConfig {
        ManagerConfig::builder().default_delay_ms(5_000).build()
    }

    fn active_dataset(seconds: u64, channel: u16) -> OperationalDataset {
        let mut dataset = OperationalDataset::new();
        dataset
            .set_active_timestamp(Timestamp::from((seconds, 0, Authoritative(false))))
            .unwrap();
        dataset.write_tlv(Channel::new(0, channel)).unwrap();
        dataset.write_tlv(PanId::from(0x1234)).unwrap();
        dataset
    }

    #[tokio::test]
    async fn request_update_schedules_pending_and_completes_on_matching_active_change() {
        let ports = FakePorts::new();
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pending = PendingDatasetManager::new(config(), ports.clone());
        active.save_local(&active_dataset(50, 11)).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested.write_tlv(Channel::new(0, 15)).unwrap();

        let mut updater = DatasetUpdater::new();
        let (tx, rx) = oneshot::channel();
        updater
            .request_update(&active, &mut pending, &requested, tx)
            .await
            .unwrap();
        assert!(updater.is_update_ongoing());

        let scheduled = pending.read().await.unwrap();
        assert_eq!(scheduled.channel(), Some(Channel::new(0, 15)));

        let mut newly_active = active_dataset(51, 11);
        newly_active.write_tlv(Channel::new(0, 15)).unwrap();
        updater.on_active_changed(&newly_active);

        assert!(!updater.is_update_ongoing());
        assert_eq!(rx.await.unwrap(), UpdateOutcome::Ok);
    }

    #[tokio::test]
    async fn detects_conflict_from_superseding_external_update() {
        let ports = FakePorts::new();
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pending = PendingDatasetManager::new(config(), ports.clone());
        active.save_local(&active_dataset(50, 11)).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested.write_tlv(Channel::new(0, 15)).unwrap();

        let mut updater = DatasetUpdater::new();
        let (tx, rx) = oneshot::channel();
        updater
            .request_update(&active, &mut pending, &requested, tx)
            .await
            .unwrap();

        let conflicting = active_dataset(60, 20);
        updater.on_active_changed(&conflicting);

        assert!(!updater.is_update_ongoing());
        assert_eq!(rx.await.unwrap(), UpdateOutcome::Already);
    }

    #[tokio::test]
    async fn rejects_concurrent_request_while_one_is_ongoing() {
        let ports = FakePorts::new();
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pending = PendingDatasetManager::new(config(), ports.clone());
        active.save_local(&active_dataset(50, 11)).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested.write_tlv(Channel::new(0, 15)).unwrap();

        let mut updater = DatasetUpdater::new();
        let (tx1, _rx1) = oneshot::channel();
        updater
            .request_update(&active, &mut pending, &requested, tx1)
            .await
            .unwrap();

        let (tx2, _rx2) = oneshot::channel();
        let err = updater
            .request_update(&active, &mut pending, &requested, tx2)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Busy));
    }

    #[tokio::test]
    async fn rejects_request_already_satisfied_by_current_active() {
        let ports = FakePorts::new();
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pending = PendingDatasetManager::new(config(), ports.clone());
        active.save_local(&active_dataset(50, 11)).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested.write_tlv(Channel::new(0, 11)).unwrap();

        let mut updater = DatasetUpdater::new();
        let (tx, _rx) = oneshot::channel();
        let err = updater
            .request_update(&active, &mut pending, &requested, tx)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Already));
    }

    #[tokio::test]
    async fn scheduled_update_promotes_through_the_real_delay_timer() {
        let ports = FakePorts::new();
        ports.mle_role.set(DeviceRole::Leader);
        let mut active = ActiveDatasetManager::new(config(), ports.clone());
        let mut pending = PendingDatasetManager::new(config(), ports.clone());
        active.save_local(&active_dataset(50, 11)).await.unwrap();

        let mut requested = OperationalDataset::new();
        requested.write_tlv(Channel::new(0, 15)).unwrap();

        let mut updater = DatasetUpdater::new();
        let (tx, rx) = oneshot::channel();
        updater
            .request_update(&active, &mut pending, &requested, tx)
            .await
            .unwrap();

        // request_update never sets a Delay Timer on `requested`, so the
        // scheduled dataset is armed against `default_delay_ms`.
        ports.clock.advance(config().default_delay_ms as u64 + 1);
        pending.tick(ports.clock.now(), &mut active).await.unwrap();

        let promoted = active.read().await.unwrap();
        assert_eq!(promoted.channel(), Some(Channel::new(0, 15)));

        updater.on_active_changed(&promoted);
        assert_eq!(rx.await.unwrap(), UpdateOutcome::Ok);
    }
}
