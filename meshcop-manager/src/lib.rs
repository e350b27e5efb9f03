// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runtime state machines for the MeshCoP Active and Pending Operational
//! Datasets: local storage reconciliation, leader-side MGMT_SET/GET/REPLACE
//! arbitration, delayed Pending-to-Active promotion, and the updater used to
//! request a configuration change across the mesh. Built on top of
//! `meshcop-codec`'s TLV-level `OperationalDataset`; this crate owns the
//! stateful, timer-driven behavior around it.
//!
//! Runs on an ordinary OS thread with `std`, driven by an explicit
//! caller-supplied `tick(now_ms)` rather than spawning its own timers; see
//! [`subsystem`] for the top-level facade.

pub mod active;
pub mod config;
pub mod dataset_local;
pub mod error;
pub mod fakes;
pub mod manager;
pub mod mgmt;
pub mod pending;
pub mod ports;
pub mod subsystem;
pub mod updater;

pub use config::ManagerConfig;
pub use error::ManagerError;
pub use ports::Ports;
pub use subsystem::ThreadDatasetSubsystem;
