#[cfg(any(test, feature = "alloc"))]
use alloc::vec::Vec;

use core::num::ParseIntError;
use core::str::FromStr;

use meshcop_macros::Tlv;

const NETWORK_KEY_SIZE: usize = 16;

/// A Thread Network Key
#[derive(Copy, Clone, Debug, Eq, PartialEq, Tlv)]
#[tlv(tlv_type = 0x05, tlv_length = 16, derive_inner)]
pub struct NetworkKey([u8; NETWORK_KEY_SIZE]);

impl NetworkKey {
    pub fn random() -> Self {
        let mut bytes = [0_u8; NETWORK_KEY_SIZE];
        crate::fill_random_bytes(&mut bytes);
        Self(bytes)
    }
}

#[cfg(any(test, feature = "alloc"))]
impl From<NetworkKey> for Vec<u8> {
    fn from(value: NetworkKey) -> Self {
        value.0.to_vec()
    }
}

impl From<u128> for NetworkKey {
    fn from(key: u128) -> Self {
        Self(key.to_be_bytes())
    }
}

impl AsRef<[u8]> for NetworkKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for NetworkKey {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl FromStr for NetworkKey {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = u128::from_str_radix(s, 16)?;
        Ok(Self::from(key))
    }
}
