// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use typed_builder::TypedBuilder;

/// Tunables the original hardcodes as compile-time constants (`kSendSetDelay`,
/// `kDefaultDelay`, `kMaxDelay`, and the leader's configured minimum delay).
/// Defaulted to the original's production values but overridable so tests can
/// run the §8 scenarios with short, deterministic delays.
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct ManagerConfig {
    /// Backoff before retrying a `sync_local_with_leader` MGMT_SET, in ms. §4.4.2.
    #[builder(default = 5_000)]
    pub send_set_delay_ms: u64,

    /// Delay timer value the Updater writes when the caller did not supply one. §4.7.
    #[builder(default = 300_000)]
    pub default_delay_ms: u32,

    /// Upper clamp applied to any Delay Timer value. §4.6, §4.4.3 step 6.
    #[builder(default = 1_209_600_000)]
    pub max_delay_ms: u32,

    /// The leader's configured minimum delay, used when normalizing an incoming
    /// MGMT_SET's Delay Timer (§4.4.3 step 6) and when deferring as Pending.
    #[builder(default = 30_000)]
    pub delay_timer_minimal_ms: u32,

    /// Upper bound on the random tick advance the Updater applies to a timestamp
    /// it is about to schedule (`kMaxTimestampIncrease`), §4.7 steps 6-7.
    #[builder(default = 32_000)]
    pub max_timestamp_increase_ticks: u16,

    /// Prefix used by `create_new_network`'s synthesized NetworkName,
    /// `"<prefix>-<panid-in-hex>"`. §4.5.
    #[builder(default = "Twine")]
    pub network_name_prefix: &'static str,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig::builder().build()
    }
}
