// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Trait boundaries for the process-wide collaborators this crate treats as
//! interface-only: the CoAP/TMF transport, the MLE role machine, the settings
//! store, the secure key store, and the millisecond clock. Every manager is
//! generic over these traits rather than holding a back-pointer to a shared
//! instance, so tests substitute the in-memory fakes in [`crate::fakes`].

use async_trait::async_trait;

use meshcop_codec::dataset::{
    DatasetKind, ExtendedPanId, MeshLocalPrefix, NetworkKey, NetworkName, Pskc, SecurityPolicy,
};
use meshcop_codec::radio::{Channel, PanId};
use meshcop_codec::thread::DeviceRole;

/// Which secret a [`SecureKeyStore`] slot holds. The original migrates exactly these
/// two TLV types between settings storage and secure storage; see DESIGN.md.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SecureKeyKind {
    NetworkKey,
    Pskc,
}

/// A secure-store slot, partitioned by `(kind, SecureKeyKind)` per §6.3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SecureKeyRef {
    pub dataset_kind: DatasetKind,
    pub key_kind: SecureKeyKind,
}

impl SecureKeyRef {
    pub fn new(dataset_kind: DatasetKind, key_kind: SecureKeyKind) -> Self {
        Self {
            dataset_kind,
            key_kind,
        }
    }
}

/// An in-flight or completed CoAP request, as built by [`CoapTransport::new_confirmable_post`].
#[derive(Clone, Debug, Default)]
pub struct CoapRequest {
    pub uri: &'static str,
    pub payload: Vec<u8>,
}

/// A CoAP response: 2.04 Changed on the happy path, carrying a raw TLV payload.
#[derive(Clone, Debug, Default)]
pub struct CoapResponse {
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum TransportError {
    #[error("no buffers available to allocate the outgoing message")]
    NoBufs,
    #[error("the request timed out waiting for a response")]
    Timeout,
}

/// Allocate, fill, and send a CoAP request over the Mesh Commissioning URIs of §6.1.
#[async_trait]
pub trait CoapTransport {
    fn new_confirmable_post(&self, uri: &'static str) -> CoapRequest;

    fn append_bytes(&self, request: &mut CoapRequest, bytes: &[u8]);

    async fn send(
        &self,
        request: CoapRequest,
        destination: &str,
    ) -> Result<CoapResponse, TransportError>;

    fn new_response(&self, request: &CoapRequest) -> CoapResponse;
}

/// A query-only view onto the MLE role state machine.
#[async_trait]
pub trait MleRoleQuery {
    async fn role(&self) -> DeviceRole;
}

/// The non-volatile settings store, partitioned by [`DatasetKind`] (§6.3).
#[async_trait]
pub trait SettingsStore {
    async fn read_dataset(&self, kind: DatasetKind) -> Option<Vec<u8>>;

    async fn save_dataset(&self, kind: DatasetKind, bytes: &[u8]);

    async fn delete_dataset(&self, kind: DatasetKind);
}

/// The secure key store, partitioned by `(kind, tlv-type)` pairs (§6.3, §4.3).
#[async_trait]
pub trait SecureKeyStore {
    async fn export(&self, key_ref: SecureKeyRef) -> Option<[u8; 16]>;

    async fn import(&self, key_ref: SecureKeyRef, value: &[u8; 16]);

    async fn destroy(&self, key_ref: SecureKeyRef);
}

/// Injected so tests can advance time deterministically instead of sleeping.
#[async_trait]
pub trait MillisecondClock {
    async fn now_ms(&self) -> u64;
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("radio parameter apply failed")]
pub struct RadioApplyError;

/// The radio/subsystem side of `apply_configuration` (§4.4.4): Channel, WakeupChannel,
/// PanId, ExtendedPanId, NetworkName, NetworkKey, Pskc, MeshLocalPrefix, SecurityPolicy.
/// Not one of the five named ports of §6.5, but grounded in the same section's
/// `apply_configuration` description; see DESIGN.md.
///
/// The `current_*` getters stand in for the original's per-subsystem queries (MAC,
/// `ExtendedPanIdManager`, `NetworkNameManager`, `KeyManager`) that `start_leader`'s
/// gap-filling synthesis reads from (§4.5); a real platform answers each with
/// whatever it already has configured, or `None` if nothing has been provisioned yet.
#[async_trait]
pub trait RadioController {
    async fn set_channel(&self, channel: Channel) -> Result<(), RadioApplyError>;

    /// A no-op is always an acceptable outcome here: §9's resolved Open Question on
    /// WakeupChannel says this crate always accepts and preserves the TLV but tolerates
    /// a platform that cannot actually act on it.
    async fn set_wakeup_channel(&self, channel: Channel) -> Result<(), RadioApplyError>;

    async fn set_pan_id(&self, pan_id: PanId) -> Result<(), RadioApplyError>;

    async fn set_extended_pan_id(&self, xpan: ExtendedPanId) -> Result<(), RadioApplyError>;

    async fn set_network_name(&self, name: NetworkName) -> Result<(), RadioApplyError>;

    async fn set_network_key(&self, key: NetworkKey) -> Result<(), RadioApplyError>;

    async fn set_pskc(&self, pskc: Pskc) -> Result<(), RadioApplyError>;

    async fn set_mesh_local_prefix(&self, prefix: MeshLocalPrefix) -> Result<(), RadioApplyError>;

    async fn set_security_policy(&self, policy: SecurityPolicy) -> Result<(), RadioApplyError>;

    async fn current_channel(&self) -> Option<Channel>;

    async fn current_pan_id(&self) -> Option<PanId>;

    async fn current_extended_pan_id(&self) -> Option<ExtendedPanId>;

    async fn current_network_name(&self) -> Option<NetworkName>;

    async fn current_network_key(&self) -> Option<NetworkKey>;

    async fn current_pskc(&self) -> Option<Pskc>;

    async fn current_security_policy(&self) -> Option<SecurityPolicy>;
}

/// The bundle of ports a manager needs. Implemented once for any type that implements all
/// five (six, counting [`RadioController`]) individual traits, so call sites can write
/// `P: Ports` instead of repeating the whole bound list.
pub trait Ports:
    CoapTransport + MleRoleQuery + SettingsStore + SecureKeyStore + MillisecondClock + RadioController
{
}

impl<T> Ports for T where
    T: CoapTransport
        + MleRoleQuery
        + SettingsStore
        + SecureKeyStore
        + MillisecondClock
        + RadioController
{
}
