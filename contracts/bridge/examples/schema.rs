use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use bridge_cosmwasm::bridge::{Cw20HookMsg, ExecuteMsg, InstantiateMsg, QueryMsg};
use bridge_cosmwasm::structs::{
    DepositCountResponse, EscrowResponse, HasVotedResponse, IsRelayerResponse, ProposalResponse,
    ResourceResponse, StateResponse,
};
use cosmwasm_bridge::proposal::Proposal;
use cosmwasm_bridge::state::{ResourceEntry, State};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(Cw20HookMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(State), &out_dir);
    export_schema(&schema_for!(ResourceEntry), &out_dir);
    export_schema(&schema_for!(Proposal), &out_dir);
    export_schema(&schema_for!(StateResponse), &out_dir);
    export_schema(&schema_for!(DepositCountResponse), &out_dir);
    export_schema(&schema_for!(ProposalResponse), &out_dir);
    export_schema(&schema_for!(ResourceResponse), &out_dir);
    export_schema(&schema_for!(IsRelayerResponse), &out_dir);
    export_schema(&schema_for!(HasVotedResponse), &out_dir);
    export_schema(&schema_for!(EscrowResponse), &out_dir);
}
