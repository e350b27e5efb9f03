// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for the ports of [`crate::ports`], for use in the scenario
//! tests of `tests/scenarios.rs`. Every fake is `Clone` and shares its interior
//! state via `Rc`, so cloning one to hand out to two separate managers (e.g. an
//! Active manager and a Pending manager that must observe the same settings
//! store) keeps them in sync rather than forking the state.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use meshcop_codec::dataset::{
    DatasetKind, ExtendedPanId, MeshLocalPrefix, NetworkKey, NetworkName, Pskc, SecurityPolicy,
};
use meshcop_codec::radio::{Channel, PanId};
use meshcop_codec::thread::DeviceRole;

use crate::ports::{
    CoapRequest, CoapResponse, CoapTransport, MillisecondClock, MleRoleQuery, RadioApplyError,
    RadioController, SecureKeyRef, SecureKeyStore, SettingsStore, TransportError,
};

/// A millisecond clock the test drives by hand via [`FakeClock::advance`], per
/// the testing guidance of §8.1 ("no real sleeping").
#[derive(Clone, Default)]
pub struct FakeClock(Rc<Cell<u64>>);

impl FakeClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, delta_ms: u64) {
        self.0.set(self.0.get() + delta_ms);
    }

    pub fn set(&self, now_ms: u64) {
        self.0.set(now_ms);
    }

    pub fn now(&self) -> u64 {
        self.0.get()
    }
}

#[async_trait]
impl MillisecondClock for FakeClock {
    async fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// A flat, in-memory replacement for non-volatile storage.
#[derive(Clone, Default)]
pub struct FakeSettingsStore(Rc<RefCell<HashMap<DatasetKind, Vec<u8>>>>);

impl FakeSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot directly, bypassing `save_dataset`, for tests that want to
    /// start from an already-persisted dataset.
    pub fn seed(&self, kind: DatasetKind, bytes: Vec<u8>) {
        self.0.borrow_mut().insert(kind, bytes);
    }
}

#[async_trait]
impl SettingsStore for FakeSettingsStore {
    async fn read_dataset(&self, kind: DatasetKind) -> Option<Vec<u8>> {
        self.0.borrow().get(&kind).cloned()
    }

    async fn save_dataset(&self, kind: DatasetKind, bytes: &[u8]) {
        self.0.borrow_mut().insert(kind, bytes.to_vec());
    }

    async fn delete_dataset(&self, kind: DatasetKind) {
        self.0.borrow_mut().remove(&kind);
    }
}

/// A flat, in-memory replacement for a hardware-backed secure element.
#[derive(Clone, Default)]
pub struct FakeSecureKeyStore(Rc<RefCell<HashMap<SecureKeyRef, [u8; 16]>>>);

impl FakeSecureKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key_ref: SecureKeyRef) -> bool {
        self.0.borrow().contains_key(&key_ref)
    }
}

#[async_trait]
impl SecureKeyStore for FakeSecureKeyStore {
    async fn export(&self, key_ref: SecureKeyRef) -> Option<[u8; 16]> {
        self.0.borrow().get(&key_ref).copied()
    }

    async fn import(&self, key_ref: SecureKeyRef, value: &[u8; 16]) {
        self.0.borrow_mut().insert(key_ref, *value);
    }

    async fn destroy(&self, key_ref: SecureKeyRef) {
        self.0.borrow_mut().remove(&key_ref);
    }
}

/// A settable MLE role, standing in for the real role state machine.
#[derive(Clone)]
pub struct FakeMleRole(Rc<Cell<DeviceRole>>);

impl FakeMleRole {
    pub fn new(role: DeviceRole) -> Self {
        Self(Rc::new(Cell::new(role)))
    }

    pub fn set(&self, role: DeviceRole) {
        self.0.set(role);
    }
}

impl Default for FakeMleRole {
    fn default() -> Self {
        Self::new(DeviceRole::Disabled)
    }
}

#[async_trait]
impl MleRoleQuery for FakeMleRole {
    async fn role(&self) -> DeviceRole {
        self.0.get()
    }
}

/// A scripted CoAP transport: the test arranges a canned response for a URI (or
/// leaves none, for a timeout) and can later inspect every request that was sent.
#[derive(Clone, Default)]
pub struct FakeCoapTransport {
    responses: Rc<RefCell<HashMap<&'static str, CoapResponse>>>,
    sent: Rc<RefCell<Vec<CoapRequest>>>,
}

impl FakeCoapTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange the response the next `send()` to `uri` should return.
    pub fn respond(&self, uri: &'static str, response: CoapResponse) {
        self.responses.borrow_mut().insert(uri, response);
    }

    pub fn sent_requests(&self) -> Vec<CoapRequest> {
        self.sent.borrow().clone()
    }
}

#[async_trait]
impl CoapTransport for FakeCoapTransport {
    fn new_confirmable_post(&self, uri: &'static str) -> CoapRequest {
        CoapRequest {
            uri,
            payload: Vec::new(),
        }
    }

    fn append_bytes(&self, request: &mut CoapRequest, bytes: &[u8]) {
        request.payload.extend_from_slice(bytes);
    }

    async fn send(
        &self,
        request: CoapRequest,
        _destination: &str,
    ) -> Result<CoapResponse, TransportError> {
        let uri = request.uri;
        self.sent.borrow_mut().push(request);
        self.responses
            .borrow()
            .get(uri)
            .cloned()
            .ok_or(TransportError::Timeout)
    }

    fn new_response(&self, _request: &CoapRequest) -> CoapResponse {
        CoapResponse::default()
    }
}

/// Records the most recent value passed to each `set_*` call, and always succeeds
/// unless told to fail. A real radio has no meaningful "read back" path for most
/// of these, so the test assertions read the recorded values instead.
#[derive(Clone, Default)]
pub struct FakeRadioController {
    fail: Rc<Cell<bool>>,
    channel: Rc<Cell<Option<Channel>>>,
    wakeup_channel: Rc<Cell<Option<Channel>>>,
    pan_id: Rc<Cell<Option<PanId>>>,
    extended_pan_id: Rc<Cell<Option<ExtendedPanId>>>,
    network_name: Rc<RefCell<Option<NetworkName>>>,
    network_key: Rc<Cell<Option<NetworkKey>>>,
    pskc: Rc<Cell<Option<Pskc>>>,
    mesh_local_prefix: Rc<Cell<Option<MeshLocalPrefix>>>,
    security_policy: Rc<Cell<Option<SecurityPolicy>>>,
}

impl FakeRadioController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn last_channel(&self) -> Option<Channel> {
        self.channel.get()
    }

    pub fn last_pan_id(&self) -> Option<PanId> {
        self.pan_id.get()
    }

    pub fn last_network_key(&self) -> Option<NetworkKey> {
        self.network_key.get()
    }
}

#[async_trait]
impl RadioController for FakeRadioController {
    async fn set_channel(&self, channel: Channel) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.channel.set(Some(channel));
        Ok(())
    }

    async fn set_wakeup_channel(&self, channel: Channel) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.wakeup_channel.set(Some(channel));
        Ok(())
    }

    async fn set_pan_id(&self, pan_id: PanId) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.pan_id.set(Some(pan_id));
        Ok(())
    }

    async fn set_extended_pan_id(&self, xpan: ExtendedPanId) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.extended_pan_id.set(Some(xpan));
        Ok(())
    }

    async fn set_network_name(&self, name: NetworkName) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        *self.network_name.borrow_mut() = Some(name);
        Ok(())
    }

    async fn set_network_key(&self, key: NetworkKey) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.network_key.set(Some(key));
        Ok(())
    }

    async fn set_pskc(&self, pskc: Pskc) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.pskc.set(Some(pskc));
        Ok(())
    }

    async fn set_mesh_local_prefix(&self, prefix: MeshLocalPrefix) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.mesh_local_prefix.set(Some(prefix));
        Ok(())
    }

    async fn set_security_policy(&self, policy: SecurityPolicy) -> Result<(), RadioApplyError> {
        if self.fail.get() {
            return Err(RadioApplyError);
        }
        self.security_policy.set(Some(policy));
        Ok(())
    }

    async fn current_channel(&self) -> Option<Channel> {
        self.channel.get()
    }

    async fn current_pan_id(&self) -> Option<PanId> {
        self.pan_id.get()
    }

    async fn current_extended_pan_id(&self) -> Option<ExtendedPanId> {
        self.extended_pan_id.get()
    }

    async fn current_network_name(&self) -> Option<NetworkName> {
        self.network_name.borrow().clone()
    }

    async fn current_network_key(&self) -> Option<NetworkKey> {
        self.network_key.get()
    }

    async fn current_pskc(&self) -> Option<Pskc> {
        self.pskc.get()
    }

    async fn current_security_policy(&self) -> Option<SecurityPolicy> {
        self.security_policy.get()
    }
}

/// Bundles one of each fake behind a single `Clone` handle, so a test can write
/// `let ports = FakePorts::new();` once and pass `ports.clone()` to every manager.
#[derive(Clone, Default)]
pub struct FakePorts {
    pub clock: FakeClock,
    pub settings: FakeSettingsStore,
    pub secure_keys: FakeSecureKeyStore,
    pub mle_role: FakeMleRole,
    pub coap: FakeCoapTransport,
    pub radio: FakeRadioController,
}

impl FakePorts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MillisecondClock for FakePorts {
    async fn now_ms(&self) -> u64 {
        self.clock.now_ms().await
    }
}

#[async_trait]
impl SettingsStore for FakePorts {
    async fn read_dataset(&self, kind: DatasetKind) -> Option<Vec<u8>> {
        self.settings.read_dataset(kind).await
    }

    async fn save_dataset(&self, kind: DatasetKind, bytes: &[u8]) {
        self.settings.save_dataset(kind, bytes).await
    }

    async fn delete_dataset(&self, kind: DatasetKind) {
        self.settings.delete_dataset(kind).await
    }
}

#[async_trait]
impl SecureKeyStore for FakePorts {
    async fn export(&self, key_ref: SecureKeyRef) -> Option<[u8; 16]> {
        self.secure_keys.export(key_ref).await
    }

    async fn import(&self, key_ref: SecureKeyRef, value: &[u8; 16]) {
        self.secure_keys.import(key_ref, value).await
    }

    async fn destroy(&self, key_ref: SecureKeyRef) {
        self.secure_keys.destroy(key_ref).await
    }
}

#[async_trait]
impl MleRoleQuery for FakePorts {
    async fn role(&self) -> DeviceRole {
        self.mle_role.role().await
    }
}

#[async_trait]
impl CoapTransport for FakePorts {
    fn new_confirmable_post(&self, uri: &'static str) -> CoapRequest {
        self.coap.new_confirmable_post(uri)
    }

    fn append_bytes(&self, request: &mut CoapRequest, bytes: &[u8]) {
        self.coap.append_bytes(request, bytes)
    }

    async fn send(
        &self,
        request: CoapRequest,
        destination: &str,
    ) -> Result<CoapResponse, TransportError> {
        self.coap.send(request, destination).await
    }

    fn new_response(&self, request: &CoapRequest) -> CoapResponse {
        self.coap.new_response(request)
    }
}

#[async_trait]
impl RadioController for FakePorts {
    async fn set_channel(&self, channel: Channel) -> Result<(), RadioApplyError> {
        self.radio.set_channel(channel).await
    }

    async fn set_wakeup_channel(&self, channel: Channel) -> Result<(), RadioApplyError> {
        self.radio.set_wakeup_channel(channel).await
    }

    async fn set_pan_id(&self, pan_id: PanId) -> Result<(), RadioApplyError> {
        self.radio.set_pan_id(pan_id).await
    }

    async fn set_extended_pan_id(&self, xpan: ExtendedPanId) -> Result<(), RadioApplyError> {
        self.radio.set_extended_pan_id(xpan).await
    }

    async fn set_network_name(&self, name: NetworkName) -> Result<(), RadioApplyError> {
        self.radio.set_network_name(name).await
    }

    async fn set_network_key(&self, key: NetworkKey) -> Result<(), RadioApplyError> {
        self.radio.set_network_key(key).await
    }

    async fn set_pskc(&self, pskc: Pskc) -> Result<(), RadioApplyError> {
        self.radio.set_pskc(pskc).await
    }

    async fn set_mesh_local_prefix(&self, prefix: MeshLocalPrefix) -> Result<(), RadioApplyError> {
        self.radio.set_mesh_local_prefix(prefix).await
    }

    async fn set_security_policy(&self, policy: SecurityPolicy) -> Result<(), RadioApplyError> {
        self.radio.set_security_policy(policy).await
    }

    async fn current_channel(&self) -> Option<Channel> {
        self.radio.current_channel().await
    }

    async fn current_pan_id(&self) -> Option<PanId> {
        self.radio.current_pan_id().await
    }

    async fn current_extended_pan_id(&self) -> Option<ExtendedPanId> {
        self.radio.current_extended_pan_id().await
    }

    async fn current_network_name(&self) -> Option<NetworkName> {
        self.radio.current_network_name().await
    }

    async fn current_network_key(&self) -> Option<NetworkKey> {
        self.radio.current_network_key().await
    }

    async fn current_pskc(&self) -> Option<Pskc> {
        self.radio.current_pskc().await
    }

    async fn current_security_policy(&self) -> Option<SecurityPolicy> {
        self.radio.current_security_policy().await
    }
}
