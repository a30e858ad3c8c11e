use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use bridge_cosmwasm::error::ContractError;
use bridge_cosmwasm::structs::{AssetInfo, DepositNonce, DomainId, ResourceId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct State {
    pub admin: Addr,
    pub domain_id: DomainId,
    pub relayer_threshold: u64,
    pub total_relayers: u64,
    pub expiry: u64,
    pub paused: bool,
}

pub const STATE: Item<State> = Item::new("state");

/// relayer address => is relayer
pub const RELAYERS: Map<&Addr, bool> = Map::new("relayers");

pub fn is_relayer(store: &dyn Storage, addr: &Addr) -> StdResult<bool> {
    Ok(RELAYERS.may_load(store, addr)?.unwrap_or(false))
}

/* -----  Resource registry ----- */
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ResourceEntry {
    pub asset: AssetInfo,
    pub burnable: bool,
}

/// resourceID => asset binding
pub const RESOURCES: Map<&[u8], ResourceEntry> = Map::new("resourceIDToResourceEntry");

/// asset key (denom or contract address) => resourceID
pub const CONTRACTADDRESS2RESOURCEID: Map<&str, ResourceId> =
    Map::new("contractAddressToResourceID");

// Last write wins. Re-registering the same asset keeps its burnable flag.
pub fn set_resource(
    store: &mut dyn Storage,
    resource_id: ResourceId,
    asset: AssetInfo,
) -> StdResult<()> {
    let mut burnable = false;
    if let Some(previous) = RESOURCES.may_load(store, &resource_id)? {
        if previous.asset == asset {
            burnable = previous.burnable;
        } else if CONTRACTADDRESS2RESOURCEID.may_load(store, previous.asset.key())?
            == Some(resource_id)
        {
            CONTRACTADDRESS2RESOURCEID.remove(store, previous.asset.key());
        }
    }
    CONTRACTADDRESS2RESOURCEID.save(store, asset.key(), &resource_id)?;
    RESOURCES.save(store, &resource_id, &ResourceEntry { asset, burnable })
}

pub fn read_resource(
    store: &dyn Storage,
    resource_id: &ResourceId,
) -> Result<ResourceEntry, ContractError> {
    RESOURCES
        .may_load(store, resource_id)?
        .ok_or(ContractError::UnmappedResource)
}

pub fn read_resource_id(store: &dyn Storage, asset_key: &str) -> Result<ResourceId, ContractError> {
    CONTRACTADDRESS2RESOURCEID
        .may_load(store, asset_key)?
        .ok_or(ContractError::UnmappedResource)
}
/* ------------------------------ */

/* -----  Deposit ledger ----- */
/// destinationDomainID => number of deposits
pub const COUNTS: Map<DomainId, DepositNonce> = Map::new("depositCounts");

pub fn read_deposit_count(store: &dyn Storage, destination_domain_id: DomainId) -> StdResult<u64> {
    Ok(COUNTS
        .may_load(store, destination_domain_id)?
        .unwrap_or_default())
}

// Consumes and returns the next deposit nonce towards {destination_domain_id}.
pub fn next_deposit_nonce(
    store: &mut dyn Storage,
    destination_domain_id: DomainId,
) -> StdResult<DepositNonce> {
    COUNTS.update(store, destination_domain_id, |count| -> StdResult<_> {
        Ok(count.unwrap_or_default() + 1)
    })
}
/* --------------------------- */

/* -----  Lock-release escrow ----- */
/// resourceID => amount held for release
pub const ESCROW: Map<&[u8], Uint128> = Map::new("escrow");

pub fn read_escrow(store: &dyn Storage, resource_id: &ResourceId) -> StdResult<Uint128> {
    Ok(ESCROW.may_load(store, resource_id)?.unwrap_or_default())
}

pub fn increase_escrow(
    store: &mut dyn Storage,
    resource_id: &ResourceId,
    amount: Uint128,
) -> StdResult<Uint128> {
    ESCROW.update(store, resource_id, |escrow| -> StdResult<_> {
        Ok(escrow.unwrap_or_default().checked_add(amount)?)
    })
}

pub fn decrease_escrow(
    store: &mut dyn Storage,
    resource_id: &ResourceId,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    ESCROW.update(store, resource_id, |escrow| {
        escrow
            .unwrap_or_default()
            .checked_sub(amount)
            .map_err(|_| ContractError::InsufficientEscrow)
    })
}
/* -------------------------------- */
