use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::keccak::keccak_256;
use crate::structs::{DomainId, ResourceId};

// Deposit data layout:
//   amount         32 bytes, big-endian uint256
//   recipient_len  32 bytes, big-endian uint256
//   recipient      recipient_len bytes
const WORD_LEN: usize = 32;
const HEADER_LEN: usize = 2 * WORD_LEN;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositData {
    pub amount: Uint128,
    pub recipient: Vec<u8>,
}

impl DepositData {
    pub fn new(amount: impl Into<Uint128>, recipient: &[u8]) -> Self {
        DepositData {
            amount: amount.into(),
            recipient: recipient.to_vec(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HEADER_LEN + self.recipient.len());
        data.extend_from_slice(&u128_to_word(self.amount.u128()));
        data.extend_from_slice(&u128_to_word(self.recipient.len() as u128));
        data.extend_from_slice(&self.recipient);
        data
    }

    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        if data.len() < HEADER_LEN {
            return Err(ContractError::InvalidDepositData);
        }
        let amount = word_to_u128(&data[0..WORD_LEN])?;
        let recipient_len = word_to_u128(&data[WORD_LEN..HEADER_LEN])?;
        let recipient_len =
            usize::try_from(recipient_len).map_err(|_| ContractError::InvalidDepositData)?;
        let recipient = data
            .get(HEADER_LEN..)
            .filter(|rest| rest.len() == recipient_len)
            .ok_or(ContractError::InvalidDepositData)?;

        Ok(DepositData {
            amount: Uint128::from(amount),
            recipient: recipient.to_vec(),
        })
    }

    /// Recipient as an address string on this chain.
    pub fn recipient_string(&self) -> Result<String, ContractError> {
        String::from_utf8(self.recipient.clone()).map_err(|_| ContractError::InvalidDepositData)
    }
}

fn u128_to_word(v: u128) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[16..].copy_from_slice(&v.to_be_bytes());
    word
}

// Rejects values that do not fit in 128 bits.
fn word_to_u128(word: &[u8]) -> Result<u128, ContractError> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(ContractError::InvalidDepositData);
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&word[16..WORD_LEN]);
    Ok(u128::from_be_bytes(buf))
}

// Builds a resource id from an asset identifier and the domain it originates on.
// Layout: keccak256(asset)[..31] ++ domain_id
pub fn create_resource_id(asset: &str, domain_id: DomainId) -> ResourceId {
    let mut resource_id = [0u8; 32];
    resource_id[..31].copy_from_slice(&keccak_256(asset.as_bytes())[..31]);
    resource_id[31] = domain_id;
    resource_id
}

pub fn resource_id_hex(resource_id: &ResourceId) -> String {
    hex::encode(resource_id)
}
