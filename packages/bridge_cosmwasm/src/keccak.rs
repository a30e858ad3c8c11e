use cosmwasm_std::Addr;
use tiny_keccak::{Hasher, Keccak};

pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Hash binding a proposal's payload to the handler that will execute it.
/// keccak256(handler_addr ++ data)
pub fn data_hash(handler_addr: &Addr, data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(handler_addr.as_bytes());
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
