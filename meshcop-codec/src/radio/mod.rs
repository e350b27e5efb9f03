// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod channel;
mod channel_mask;
mod pan_id;

pub use channel::{Channel, WakeUpChannel};
pub use channel_mask::{ChannelMask, ChannelMaskBits, ChannelPageMask};
pub use pan_id::PanId;
