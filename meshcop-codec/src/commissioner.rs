use meshcop_macros::Tlv;

/// A commissioner's session identifier.
///
/// Appears only in MGMT requests from a commissioner; it is never persisted
/// as part of a stored Active or Pending Dataset.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Tlv)]
#[tlv(tlv_type = 0x0b, tlv_length = 2, derive_inner)]
pub struct CommissionerSessionId(u16);

impl CommissionerSessionId {
    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcop_tlv::{DecodeTlvUnchecked, TryEncodeTlv};

    #[test]
    fn commissioner_session_id_round_trips() {
        let id = CommissionerSessionId::new(0x1234);
        let mut buffer = [0_u8; 4];
        let written = id.try_encode_tlv(&mut buffer).unwrap();
        assert_eq!(written, 4);
        assert_eq!(buffer, [0x0b, 0x02, 0x12, 0x34]);

        let decoded = CommissionerSessionId::decode_tlv_unchecked(&buffer);
        assert_eq!(decoded.get(), 0x1234);
    }
}
