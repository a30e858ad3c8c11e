pub mod bridge;
pub mod error;
pub mod keccak;
pub mod structs;
pub mod utils;
