pub mod contract;
pub mod handler;
pub mod proposal;
pub mod state;

#[cfg(test)]
pub mod mock_querier;
