// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Pending Dataset manager (C6): delay-timer bookkeeping and the
//! timer-expiry promotion into Active. Grounded in
//! `dataset_manager_ftd.cpp::{HandleTimer,ApplyActiveDataset}`.

use core::ops::{Deref, DerefMut};

use meshcop_codec::dataset::{Authoritative, DatasetKind, DelayTimer, OperationalDataset, Timestamp};

use crate::active::ActiveDatasetManager;
use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::manager::DatasetManager;
use crate::ports::Ports;

pub const PENDING_GET_URI: &str = "/c/pg";
pub const PENDING_SET_URI: &str = "/c/ps";

/// C6: the delay-timer-driven Pending -> Active promotion.
pub struct PendingDatasetManager<P> {
    manager: DatasetManager<P>,
    delay_deadline_ms: Option<u64>,
}

impl<P> Deref for PendingDatasetManager<P> {
    type Target = DatasetManager<P>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl<P> DerefMut for PendingDatasetManager<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.manager
    }
}

impl<P> PendingDatasetManager<P>
where
    P: Ports + Clone,
{
    pub fn new(config: ManagerConfig, ports: P) -> Self {
        Self {
            manager: DatasetManager::new(DatasetKind::Pending, PENDING_SET_URI, config, ports),
            delay_deadline_ms: None,
        }
    }

    /// Persist a Pending Dataset and (re)arm the delay timer from whatever
    /// DelayTimer it carries. Every path that hands this manager a new
    /// Pending Dataset -- a local requester, `MGMT_PENDING_SET`, a deferred
    /// `MGMT_ACTIVE_SET` -- ultimately needs its own promotion countdown
    /// running, so this is the single place that guarantees one is armed
    /// rather than leaving `tick` holding a stale deadline.
    pub async fn save_local(&mut self, dataset: &OperationalDataset) -> Result<(), ManagerError> {
        self.manager.save_local(dataset).await?;
        let now_ms = self.manager.ports().now_ms().await;
        self.start_delay_timer(now_ms, None).await
    }

    /// The ActiveTimestamp the Pending Dataset was stamped with at save time,
    /// used to detect whether an Active promotion has already superseded it.
    pub async fn read_active_timestamp(&self) -> Option<Timestamp> {
        self.manager.read().await.ok()?.active_timestamp()
    }

    /// Milliseconds remaining before the stored Delay Timer fires, relative to
    /// `now_ms`. `None` if there is no Pending Dataset or its timer already elapsed.
    pub async fn read_remaining_delay(&self, now_ms: u64) -> Option<u32> {
        let dataset = self.manager.read().await.ok()?;
        let deadline = self.delay_deadline_ms?;
        let delay_ms = dataset.delay_timer()?.milliseconds();
        if now_ms >= deadline {
            return Some(0);
        }
        Some((deadline - now_ms).min(delay_ms as u64) as u32)
    }

    /// Arm (or re-arm) the delay timer against `now_ms`. When `dataset` is
    /// given, it replaces the stored Pending Dataset first (clamped to
    /// `max_delay_ms`); otherwise the currently-stored Dataset's own Delay
    /// Timer value is used as-is.
    pub async fn start_delay_timer(
        &mut self,
        now_ms: u64,
        dataset: Option<&OperationalDataset>,
    ) -> Result<(), ManagerError> {
        let mut effective = match dataset {
            Some(dataset) => dataset.clone(),
            None => self.manager.read().await?,
        };

        let delay_ms = effective
            .delay_timer()
            .map(|d| d.milliseconds())
            .unwrap_or(self.manager.config().default_delay_ms)
            .min(self.manager.config().max_delay_ms);
        effective.write_tlv(DelayTimer::from(delay_ms))?;

        if dataset.is_some() {
            self.manager.save_local(&effective).await?;
        }

        self.delay_deadline_ms = Some(now_ms + delay_ms as u64);
        Ok(())
    }

    /// §4.6's 5-step timer-expiry algorithm: if the Delay Timer has elapsed and
    /// the Pending Dataset's ActiveTimestamp is still ahead of Active's, promote
    /// it (Active's ActiveTimestamp is overwritten unconditionally via `allow_older_timestamp`)
    /// and clear the Pending slot. A no-op otherwise.
    pub async fn tick(
        &mut self,
        now_ms: u64,
        active: &mut ActiveDatasetManager<P>,
    ) -> Result<(), ManagerError> {
        let current = self.manager.read().await.unwrap_or_default();
        self.manager.tick(now_ms, &current).await?;

        let Some(deadline) = self.delay_deadline_ms else {
            return Ok(());
        };
        if now_ms < deadline {
            return Ok(());
        }

        let Ok(pending) = self.manager.read().await else {
            self.delay_deadline_ms = None;
            return Ok(());
        };

        let current_active = active.read().await.unwrap_or_default();
        let pending_active_timestamp = pending.active_timestamp().unwrap_or(Timestamp::clear());
        let timestamp_advances = pending_active_timestamp > active.local_timestamp();
        let network_key_differs = pending.network_key() != current_active.network_key();

        if !timestamp_advances && !network_key_differs {
            log::info!("pending delay timer expired but dataset is stale, discarding");
            self.clear().await;
            return Ok(());
        }

        let mut promoted = pending;
        promoted.remove_tlv::<meshcop_codec::dataset::PendingTimestamp>();
        promoted.remove_tlv::<DelayTimer>();

        active.save(&promoted, true).await?;
        self.clear().await;
        log::info!("pending dataset promoted to active on delay timer expiry");
        Ok(())
    }

    async fn clear(&mut self) {
        self.manager.clear().await;
        self.delay_deadline_ms = None;
    }

    /// Called from Active's leader-side decision pipeline (§4.4.3) when a
    /// requested change must be deferred rather than applied immediately: the
    /// deferred Dataset's ActiveTimestamp has already been copied into a
    /// PendingTimestamp by the caller. Clamps/fills the Delay Timer to at
    /// least `leader_minimum_ms` and arms the timer against the port clock.
    pub async fn apply_active_dataset(
        &mut self,
        dataset: &OperationalDataset,
        leader_minimum_ms: u32,
    ) -> Result<(), ManagerError> {
        let mut dataset = dataset.clone();
        let requested_delay = dataset.delay_timer().map(|d| d.milliseconds()).unwrap_or(leader_minimum_ms);
        let delay_ms = requested_delay.max(leader_minimum_ms).min(self.manager.config().max_delay_ms);
        dataset.write_tlv(DelayTimer::from(delay_ms))?;

        self.manager.save_local(&dataset).await?;
        let now_ms = self.manager.ports().now_ms().await;
        self.delay_deadline_ms = Some(now_ms + delay_ms as u64);
        Ok(())
    }

    /// If no valid local Pending Dataset exists, this is a no-op: unlike
    /// Active, a freshly-commissioned leader starts with no Pending Dataset
    /// at all rather than synthesizing one (§4.6).
    pub async fn start_leader(&mut self) -> Result<(), ManagerError> {
        if self.manager.is_local_saved() && self.manager.read().await.is_ok() {
            let now_ms = self.manager.ports().now_ms().await;
            self.start_delay_timer(now_ms, None).await?;
        }
        Ok(())
    }

    /// Serve a MGMT_PENDING_GET request: NetworkKey is never filtered on the
    /// Pending slot (§4.4.5: Security Policy gating only applies to Active).
    pub async fn handle_get(&self, request: &[u8]) -> Vec<u8> {
        self.manager.handle_get(request, false).await
    }

    /// Leader-side decision for a MGMT_PENDING_SET request (§4.4.3 adapted for
    /// kind=Pending): an ordinary `save` once the rollback guard and delay
    /// normalization of steps 4 and 6 have been applied, since a Pending
    /// update can never itself trigger a further deferral.
    pub async fn process_set_request(
        &mut self,
        active: &ActiveDatasetManager<P>,
        payload: &[u8],
    ) -> Vec<u8> {
        match self.decide_set(active, payload).await {
            Ok(()) => crate::mgmt::MgmtState::Accept.encode_tlv().to_vec(),
            Err(_) => crate::mgmt::MgmtState::Reject.encode_tlv().to_vec(),
        }
    }

    async fn decide_set(
        &mut self,
        active: &ActiveDatasetManager<P>,
        payload: &[u8],
    ) -> Result<(), ManagerError> {
        let mut requested = OperationalDataset::new();
        requested.set_from_bytes(payload).map_err(|_| ManagerError::Parse)?;
        requested.validate_tlvs().map_err(|_| ManagerError::Parse)?;

        let pending_timestamp = requested.pending_timestamp().ok_or(ManagerError::Parse)?;
        if pending_timestamp <= self.manager.local_timestamp() {
            return Err(ManagerError::Rejected);
        }

        let active_timestamp = requested.active_timestamp().ok_or(ManagerError::Parse)?;
        let current_active = active.read().await.unwrap_or_default();
        let change = crate::mgmt::classify_change(&current_active, &requested);

        // §4.4.3 step 4: a key-rotation-only transition is exempt from the
        // rollback guard (it is legitimately re-stamping the same generation);
        // any other Pending change must still advance the Active timestamp.
        if !change.affects_network_key && active_timestamp <= active.local_timestamp() {
            return Err(ManagerError::Rejected);
        }

        let leader_minimum_ms = self.manager.config().delay_timer_minimal_ms;
        let default_delay_ms = self.manager.config().default_delay_ms;
        let requested_delay_ms = requested.delay_timer().map(|d| d.milliseconds());
        let normalized_delay_ms = if change.affects_network_key {
            requested_delay_ms.unwrap_or(default_delay_ms).max(default_delay_ms)
        } else {
            requested_delay_ms.unwrap_or(leader_minimum_ms).max(leader_minimum_ms)
        };
        requested.write_tlv(DelayTimer::from(normalized_delay_ms))?;

        let now_ms = self.manager.ports().now_ms().await;
        self.start_delay_timer(now_ms, Some(&requested)).await
    }
}
