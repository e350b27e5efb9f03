// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The top-level facade that owns one Active manager (C5), one Pending
//! manager (C6), and the Updater (C7), and wires them together the way §2's
//! control-flow diagram describes: a `tick(now_ms)` drives both managers'
//! retry/delay timers, every local mutation re-checks the Updater's in-flight
//! slot against the freshly-saved Dataset, and incoming CoAP requests are
//! dispatched to the manager named by the wire URI of §6.1.
//!
//! This module has no direct precedent in the teacher's codec/TLV crates
//! (those don't have a stateful runtime layer at all); it is grounded instead
//! in the instance-locator guidance of §9 ("model the instance as a struct
//! held behind a handle") and the control-flow paragraph of §2.

use tokio::sync::oneshot;

use meshcop_codec::dataset::{DatasetInfo, OperationalDataset};
use meshcop_codec::radio::ChannelMask;

use crate::active::{ActiveDatasetManager, MgmtCommand};
use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::pending::PendingDatasetManager;
use crate::ports::Ports;
use crate::updater::{DatasetUpdater, UpdateOutcome};

/// The five Mesh Commissioning CoAP URIs of §6.1, as the single point that
/// knows how an incoming request maps onto a manager method.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MgmtUri {
    ActiveGet,
    ActiveSet,
    ActiveReplace,
    PendingGet,
    PendingSet,
}

impl MgmtUri {
    pub fn from_path(uri: &str) -> Option<Self> {
        match uri {
            crate::active::ACTIVE_GET_URI => Some(Self::ActiveGet),
            crate::active::ACTIVE_SET_URI => Some(Self::ActiveSet),
            crate::active::ACTIVE_REPLACE_URI => Some(Self::ActiveReplace),
            crate::pending::PENDING_GET_URI => Some(Self::PendingGet),
            crate::pending::PENDING_SET_URI => Some(Self::PendingSet),
            _ => None,
        }
    }
}

/// Owns the Active/Pending managers and the Updater, and is the single
/// object a caller above this crate needs to hold. Generic over the port
/// bundle, same as every manager it wraps.
pub struct ThreadDatasetSubsystem<P> {
    active: ActiveDatasetManager<P>,
    pending: PendingDatasetManager<P>,
    updater: DatasetUpdater,
    commissioner_session_id: Option<u16>,
}

impl<P> ThreadDatasetSubsystem<P>
where
    P: Ports + Clone,
{
    pub fn new(config: ManagerConfig, ports: P) -> Self {
        Self {
            active: ActiveDatasetManager::new(config, ports.clone()),
            pending: PendingDatasetManager::new(config, ports),
            updater: DatasetUpdater::new(),
            commissioner_session_id: None,
        }
    }

    pub fn active(&self) -> &ActiveDatasetManager<P> {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveDatasetManager<P> {
        &mut self.active
    }

    pub fn pending(&self) -> &PendingDatasetManager<P> {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingDatasetManager<P> {
        &mut self.pending
    }

    /// The session a commissioner must present for its requests to be
    /// honored as "from commissioner" (§4.4.3 step 5). `None` means no
    /// commissioner is currently registered, so every CommissionerSessionId
    /// fails the match and the request is treated as an ordinary Thread node.
    pub fn set_commissioner_session_id(&mut self, session_id: Option<u16>) {
        self.commissioner_session_id = session_id;
    }

    /// On boot: restore both Datasets from settings, apply the Active one to
    /// the radio, and arm the Pending manager's delay timer from whatever was
    /// already on file (§4.4.2, §4.6).
    pub async fn restore(&mut self, now_ms: u64) -> Result<(), ManagerError> {
        self.active.restore().await?;
        self.pending.restore().await?;
        self.pending.start_delay_timer(now_ms, None).await.ok();
        self.notify_updater().await;
        Ok(())
    }

    /// Called once this device becomes the partition leader: auto-generate a
    /// default Active Dataset if none exists (C5), and re-arm any in-flight
    /// Pending delay timer (C6).
    pub async fn start_leader(&mut self) -> Result<(), ManagerError> {
        self.active.start_leader().await?;
        self.pending.start_leader().await?;
        self.notify_updater().await;
        Ok(())
    }

    /// Advance the single-threaded clock: re-evaluate both managers' retry
    /// and delay timers, promoting Pending -> Active if its timer has fired.
    pub async fn tick(&mut self, now_ms: u64) -> Result<(), ManagerError> {
        let active_dataset = self.active.read().await.unwrap_or_default();
        self.active.tick(now_ms, &active_dataset).await?;
        self.pending.tick(now_ms, &mut self.active).await?;
        self.notify_updater().await;
        Ok(())
    }

    /// Dispatch an incoming Confirmable POST to the manager its URI names,
    /// returning the raw response payload to send back (§6.1).
    pub async fn dispatch_request(&mut self, uri: &str, payload: &[u8]) -> Option<Vec<u8>> {
        let route = MgmtUri::from_path(uri)?;
        let response = match route {
            MgmtUri::ActiveGet => self.active.handle_get(payload).await,
            MgmtUri::ActiveSet => {
                self.active
                    .process_set_or_replace_request(
                        &mut self.pending,
                        MgmtCommand::Set,
                        payload,
                        self.commissioner_session_id,
                    )
                    .await
            }
            MgmtUri::ActiveReplace => {
                self.active
                    .process_set_or_replace_request(
                        &mut self.pending,
                        MgmtCommand::Replace,
                        payload,
                        self.commissioner_session_id,
                    )
                    .await
            }
            MgmtUri::PendingGet => self.pending.handle_get(payload).await,
            MgmtUri::PendingSet => self.pending.process_set_request(&self.active, payload).await,
        };

        self.notify_updater().await;
        Some(response)
    }

    /// Produce a fresh random Active Dataset without saving it, for a caller
    /// that wants to inspect it before committing (§4.5).
    pub async fn create_new_network(
        &self,
        supported: ChannelMask,
        preferred: Option<ChannelMask>,
    ) -> Result<DatasetInfo, ManagerError> {
        self.active.create_new_network(supported, preferred).await
    }

    /// Forward to the Updater (C7): stamp `requested` into a correctly-ordered
    /// Pending Dataset and report the outcome via `callback` once the
    /// resulting Active or Pending change is observed.
    pub async fn request_update(
        &mut self,
        requested: &OperationalDataset,
        callback: oneshot::Sender<UpdateOutcome>,
    ) -> Result<(), ManagerError> {
        self.updater
            .request_update(&self.active, &mut self.pending, requested, callback)
            .await
    }

    pub fn cancel_update(&mut self) {
        self.updater.cancel_update();
    }

    pub fn is_update_ongoing(&self) -> bool {
        self.updater.is_update_ongoing()
    }

    /// Re-check the Updater's in-flight slot against the current Active and
    /// Pending Datasets. Called after every operation that might have
    /// mutated either one, standing in for the original's
    /// Active/Pending-Dataset-Changed event subscriptions (§4.7).
    async fn notify_updater(&mut self) {
        if !self.updater.is_update_ongoing() {
            return;
        }
        if let Ok(active_dataset) = self.active.read().await {
            self.updater.on_active_changed(&active_dataset);
        }
        if !self.updater.is_update_ongoing() {
            return;
        }
        if let Ok(pending_dataset) = self.pending.read().await {
            self.updater.on_pending_changed(&pending_dataset);
        }
    }
}
