#[cfg(any(test, feature = "alloc"))]
use alloc::vec::Vec;

use meshcop_macros::Tlv;

const PSKC_MAX_SIZE: usize = 16;

/// A Thread PSKc
#[derive(Copy, Clone, Debug, Eq, PartialEq, Tlv)]
#[tlv(tlv_type = 0x04, tlv_length = 16, derive_inner)]
pub struct Pskc([u8; PSKC_MAX_SIZE]);

impl Pskc {
    pub fn random() -> Self {
        let mut bytes = [0_u8; PSKC_MAX_SIZE];
        crate::fill_random_bytes(&mut bytes);
        Self(bytes)
    }
}

#[cfg(any(test, feature = "alloc"))]
impl From<Pskc> for Vec<u8> {
    fn from(value: Pskc) -> Self {
        value.0.to_vec()
    }
}

impl From<Pskc> for u128 {
    fn from(value: Pskc) -> Self {
        u128::from_be_bytes(value.0)
    }
}

impl From<u128> for Pskc {
    fn from(pskc: u128) -> Self {
        Self(pskc.to_be_bytes())
    }
}

impl From<[u8; PSKC_MAX_SIZE]> for Pskc {
    fn from(value: [u8; PSKC_MAX_SIZE]) -> Self {
        Self(value)
    }
}

impl From<Pskc> for [u8; PSKC_MAX_SIZE] {
    fn from(value: Pskc) -> Self {
        value.0
    }
}
