#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, MessageInfo,
    Response, StdResult,
};
use cw2::set_contract_version;
use cw20::Cw20ReceiveMsg;

use bridge_cosmwasm::bridge::{Cw20HookMsg, ExecuteMsg, InstantiateMsg, QueryMsg};
use bridge_cosmwasm::error::ContractError;
use bridge_cosmwasm::keccak::data_hash;
use bridge_cosmwasm::structs::{
    AssetInfo, DepositCountResponse, DepositNonce, DomainId, EscrowResponse, HasVotedResponse,
    IsRelayerResponse, ProposalResponse, ProposalStatus, ResourceId, ResourceResponse,
    StateResponse,
};
use bridge_cosmwasm::utils::{resource_id_hex, DepositData};

use crate::handler::{resolve_handler, DepositFunds};
use crate::proposal::{
    proposal_event, proposal_vote_event, read_proposal, save_proposal, Proposal,
};
use crate::state::{
    decrease_escrow, increase_escrow, is_relayer, next_deposit_nonce, read_deposit_count,
    read_escrow, read_resource, read_resource_id, set_resource, State, RELAYERS, RESOURCES,
    STATE,
};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cosmwasm-bridge";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // Validations
    if !info.funds.is_empty() {
        return Err(ContractError::UnnecessaryFunds {});
    }

    let mut relayers: Vec<Addr> = Vec::with_capacity(msg.initial_relayers.len());
    for relayer in msg.initial_relayers.iter() {
        let relayer = deps.api.addr_validate(relayer)?;
        if relayers.contains(&relayer) {
            return Err(ContractError::RelayerAlreadyExists);
        }
        relayers.push(relayer);
    }

    let total_relayers = relayers.len() as u64;
    if msg.initial_relayer_threshold == 0 || msg.initial_relayer_threshold > total_relayers {
        return Err(ContractError::InvalidThreshold);
    }

    // Set "state"
    STATE.save(
        deps.storage,
        &State {
            admin: info.sender.clone(),
            domain_id: msg.domain_id,
            relayer_threshold: msg.initial_relayer_threshold,
            total_relayers,
            expiry: msg.expiry,
            paused: false,
        },
    )?;
    for relayer in relayers.iter() {
        RELAYERS.save(deps.storage, relayer, &true)?;
    }

    Ok(Response::new().add_attributes(vec![
        attr("method", "instantiate"),
        attr("admin", info.sender),
        attr("domain_id", msg.domain_id.to_string()),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        /* ---  Transfer entries --- */
        ExecuteMsg::Deposit {
            destination_domain_id,
            resource_id,
            data,
        } => {
            let depositor = info.sender.clone();
            deposit(
                deps,
                env,
                depositor,
                DepositFunds::Coins(&info.funds),
                destination_domain_id,
                resource_id,
                data,
            )
        }
        ExecuteMsg::Receive(msg) => receive_cw20(deps, env, info, msg),

        // Proposal votes come from relayers on the deposit's destination chain.
        ExecuteMsg::VoteProposal {
            origin_domain_id,
            deposit_nonce,
            resource_id,
            data,
        } => vote_proposal(
            deps,
            env,
            info,
            origin_domain_id,
            deposit_nonce,
            resource_id,
            data,
        ),
        ExecuteMsg::ExecuteProposal {
            origin_domain_id,
            deposit_nonce,
            data,
            resource_id,
        } => execute_proposal(
            deps,
            env,
            info,
            origin_domain_id,
            deposit_nonce,
            data,
            resource_id,
        ),
        ExecuteMsg::CancelProposal {
            origin_domain_id,
            deposit_nonce,
        } => cancel_proposal(deps, env, info, origin_domain_id, deposit_nonce),

        /* ---  Admin entries --- */
        ExecuteMsg::AdminSetResource { resource_id, asset } => {
            admin_set_resource(deps, info, resource_id, asset)
        }
        ExecuteMsg::AdminSetBurnable { contract_addr } => {
            admin_set_burnable(deps, info, contract_addr)
        }
        ExecuteMsg::AdminAddRelayer { relayer } => admin_add_relayer(deps, info, relayer),
        ExecuteMsg::AdminRemoveRelayer { relayer } => admin_remove_relayer(deps, info, relayer),
        ExecuteMsg::AdminChangeRelayerThreshold { threshold } => {
            admin_change_relayer_threshold(deps, info, threshold)
        }
        ExecuteMsg::AdminPauseTransfers {} => admin_set_paused(deps, info, true),
        ExecuteMsg::AdminUnpauseTransfers {} => admin_set_paused(deps, info, false),
        ExecuteMsg::AdminChangeAdmin { new_admin } => admin_change_admin(deps, info, new_admin),
    }
}

/// Deposit of a non-burnable cw20 token. The deposit starts from the hook
/// message sent by the token contract, which is the only possible sender.
fn receive_cw20(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let depositor = deps.api.addr_validate(&cw20_msg.sender)?;
    match from_json(&cw20_msg.msg)? {
        Cw20HookMsg::Deposit {
            destination_domain_id,
            resource_id,
            data,
        } => deposit(
            deps,
            env,
            depositor,
            DepositFunds::Cw20 {
                token: &info.sender,
                amount: cw20_msg.amount,
            },
            destination_domain_id,
            resource_id,
            data,
        ),
    }
}

// Every check runs before the nonce is issued, so a rejected deposit consumes nothing.
fn deposit(
    deps: DepsMut,
    env: Env,
    depositor: Addr,
    funds: DepositFunds,
    destination_domain_id: DomainId,
    resource_id: ResourceId,
    data: Vec<u8>,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    if state.paused {
        return Err(ContractError::Paused);
    }

    let handler = resolve_handler(deps.as_ref(), &resource_id)?;
    let deposit_data = DepositData::decode(&data)?;
    if deposit_data.amount.is_zero() {
        return Err(ContractError::InvalidDepositData);
    }
    let effect = handler.on_deposit(deps.as_ref(), &env, &depositor, funds, &deposit_data)?;

    let deposit_nonce = next_deposit_nonce(deps.storage, destination_domain_id)?;
    if !effect.escrowed.is_zero() {
        increase_escrow(deps.storage, &resource_id, effect.escrowed)?;
    }

    let event = Event::new("deposit")
        .add_attribute("destination_domain_id", destination_domain_id.to_string())
        .add_attribute("resource_id", resource_id_hex(&resource_id))
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("depositor", depositor.as_str())
        .add_attribute("data", hex::encode(&data));

    Ok(Response::new()
        .add_messages(effect.messages)
        .add_event(event)
        .add_attributes(vec![
            attr("method", "deposit"),
            attr("handler", handler.kind()),
            attr("deposit_nonce", deposit_nonce.to_string()),
        ]))
}

fn vote_proposal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    resource_id: ResourceId,
    data: Vec<u8>,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    if state.paused {
        return Err(ContractError::Paused);
    }
    if !is_relayer(deps.storage, &info.sender)? {
        return Err(ContractError::UnauthorizedRelayer);
    }

    let handler = resolve_handler(deps.as_ref(), &resource_id)?;
    let hash = data_hash(&env.contract.address, &data);

    let mut events: Vec<Event> = vec![];
    let mut proposal = match read_proposal(deps.storage, origin_domain_id, deposit_nonce)? {
        Some(proposal) => {
            proposal.check_vote(&info.sender, &resource_id, &hash)?;
            proposal
        }
        None => {
            let proposal = Proposal::new(resource_id, hash, env.block.height);
            events.push(proposal_event(
                origin_domain_id,
                deposit_nonce,
                ProposalStatus::Active,
                &hash,
            ));
            proposal
        }
    };
    let deposit_data = DepositData::decode(&data)?;

    let passed = proposal.add_vote(info.sender.clone(), state.relayer_threshold);
    events.push(proposal_vote_event(
        origin_domain_id,
        deposit_nonce,
        &info.sender,
        &proposal,
    ));

    let mut response = Response::new().add_attribute("method", "vote_proposal");
    if passed {
        events.push(proposal_event(
            origin_domain_id,
            deposit_nonce,
            ProposalStatus::Passed,
            &hash,
        ));

        // Passing and settling happen in this same call.
        match handler.on_execute(deps.as_ref(), &resource_id, &deposit_data) {
            Ok(settlement) => {
                if !settlement.released.is_zero() {
                    decrease_escrow(deps.storage, &resource_id, settlement.released)?;
                }
                proposal.mark_executed();
                events.push(proposal_event(
                    origin_domain_id,
                    deposit_nonce,
                    ProposalStatus::Executed,
                    &hash,
                ));
                response = response
                    .add_messages(settlement.messages)
                    .add_attribute("settlement", "executed")
                    .add_attribute("recipient", settlement.recipient);
            }
            // Left passed until liquidity arrives; execute_proposal finishes it.
            Err(ContractError::InsufficientEscrow) => {
                response = response.add_attribute("settlement", "deferred");
            }
            Err(e) => return Err(e),
        }
    }

    save_proposal(deps.storage, origin_domain_id, deposit_nonce, &proposal)?;

    Ok(response.add_events(events))
}

/// Settles a proposal left in passed status by a vote that could not settle it.
fn execute_proposal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    data: Vec<u8>,
    resource_id: ResourceId,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    if state.paused {
        return Err(ContractError::Paused);
    }
    if !is_relayer(deps.storage, &info.sender)? {
        return Err(ContractError::UnauthorizedRelayer);
    }

    let handler = resolve_handler(deps.as_ref(), &resource_id)?;
    let hash = data_hash(&env.contract.address, &data);

    let mut proposal = read_proposal(deps.storage, origin_domain_id, deposit_nonce)?
        .ok_or(ContractError::NotPassed)?;
    proposal.check_executable(&resource_id, &hash)?;

    let deposit_data = DepositData::decode(&data)?;
    let settlement = handler.on_execute(deps.as_ref(), &resource_id, &deposit_data)?;
    if !settlement.released.is_zero() {
        decrease_escrow(deps.storage, &resource_id, settlement.released)?;
    }
    proposal.mark_executed();
    save_proposal(deps.storage, origin_domain_id, deposit_nonce, &proposal)?;

    Ok(Response::new()
        .add_messages(settlement.messages)
        .add_event(proposal_event(
            origin_domain_id,
            deposit_nonce,
            ProposalStatus::Executed,
            &hash,
        ))
        .add_attributes(vec![
            attr("method", "execute_proposal"),
            attr("recipient", settlement.recipient),
        ]))
}

fn cancel_proposal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
) -> Result<Response, ContractError> {
    let state = load_state_as_admin(deps.as_ref(), &info)?;

    let mut proposal = read_proposal(deps.storage, origin_domain_id, deposit_nonce)?
        .ok_or(ContractError::ProposalNotCancellable)?;
    proposal.cancel(env.block.height, state.expiry)?;
    save_proposal(deps.storage, origin_domain_id, deposit_nonce, &proposal)?;

    Ok(Response::new()
        .add_event(proposal_event(
            origin_domain_id,
            deposit_nonce,
            ProposalStatus::Cancelled,
            &proposal.data_hash,
        ))
        .add_attribute("method", "cancel_proposal"))
}

fn load_state_as_admin(deps: Deps, info: &MessageInfo) -> Result<State, ContractError> {
    let state = STATE.load(deps.storage)?;
    if info.sender != state.admin {
        return Err(ContractError::Unauthorized {});
    }
    Ok(state)
}

fn admin_set_resource(
    deps: DepsMut,
    info: MessageInfo,
    resource_id: ResourceId,
    asset: AssetInfo,
) -> Result<Response, ContractError> {
    load_state_as_admin(deps.as_ref(), &info)?;

    // Save/update the mapping `resource_id => asset`
    let asset = match asset {
        AssetInfo::Cw20 { contract_addr } => AssetInfo::Cw20 {
            contract_addr: deps.api.addr_validate(&contract_addr)?.to_string(),
        },
        native => native,
    };
    let asset_key = asset.to_string();
    set_resource(deps.storage, resource_id, asset)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "set_resource"),
        attr("resource_id", resource_id_hex(&resource_id)),
        attr("asset", asset_key),
    ]))
}

fn admin_set_burnable(
    deps: DepsMut,
    info: MessageInfo,
    contract_addr: String,
) -> Result<Response, ContractError> {
    load_state_as_admin(deps.as_ref(), &info)?;

    let contract_addr = deps.api.addr_validate(&contract_addr)?;
    let resource_id = read_resource_id(deps.storage, contract_addr.as_str())?;
    let mut entry = read_resource(deps.storage, &resource_id)?;
    if entry.asset.is_native() {
        return Err(ContractError::InvalidBurnable);
    }
    entry.burnable = true;
    RESOURCES.save(deps.storage, &resource_id, &entry)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "set_burnable"),
        attr("token", contract_addr),
    ]))
}

fn admin_add_relayer(
    deps: DepsMut,
    info: MessageInfo,
    relayer: String,
) -> Result<Response, ContractError> {
    let mut state = load_state_as_admin(deps.as_ref(), &info)?;

    let relayer = deps.api.addr_validate(&relayer)?;
    if is_relayer(deps.storage, &relayer)? {
        return Err(ContractError::RelayerAlreadyExists);
    }
    RELAYERS.save(deps.storage, &relayer, &true)?;
    state.total_relayers += 1;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "add_relayer"),
        attr("relayer", relayer),
    ]))
}

fn admin_remove_relayer(
    deps: DepsMut,
    info: MessageInfo,
    relayer: String,
) -> Result<Response, ContractError> {
    let mut state = load_state_as_admin(deps.as_ref(), &info)?;

    let relayer = deps.api.addr_validate(&relayer)?;
    if !is_relayer(deps.storage, &relayer)? {
        return Err(ContractError::UnauthorizedRelayer);
    }
    // The threshold must stay reachable.
    if state.total_relayers - 1 < state.relayer_threshold {
        return Err(ContractError::InvalidThreshold);
    }
    RELAYERS.remove(deps.storage, &relayer);
    state.total_relayers -= 1;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "remove_relayer"),
        attr("relayer", relayer),
    ]))
}

fn admin_change_relayer_threshold(
    deps: DepsMut,
    info: MessageInfo,
    threshold: u64,
) -> Result<Response, ContractError> {
    let mut state = load_state_as_admin(deps.as_ref(), &info)?;

    if threshold == 0 || threshold > state.total_relayers {
        return Err(ContractError::InvalidThreshold);
    }
    state.relayer_threshold = threshold;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "change_relayer_threshold"),
        attr("threshold", threshold.to_string()),
    ]))
}

fn admin_set_paused(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let mut state = load_state_as_admin(deps.as_ref(), &info)?;

    state.paused = paused;
    STATE.save(deps.storage, &state)?;

    let method = if paused {
        "pause_transfers"
    } else {
        "unpause_transfers"
    };
    Ok(Response::new().add_attribute("method", method))
}

fn admin_change_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let mut state = load_state_as_admin(deps.as_ref(), &info)?;

    state.admin = deps.api.addr_validate(&new_admin)?;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "change_admin"),
        attr("admin", state.admin),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetState {} => to_json_binary(&get_state(deps)?),
        QueryMsg::GetDepositCount {
            destination_domain_id,
        } => to_json_binary(&get_deposit_count(deps, destination_domain_id)?),
        QueryMsg::GetProposal {
            origin_domain_id,
            deposit_nonce,
        } => to_json_binary(&get_proposal(deps, origin_domain_id, deposit_nonce)?),
        QueryMsg::GetResource { resource_id } => to_json_binary(&get_resource(deps, resource_id)?),
        QueryMsg::IsRelayer { relayer } => to_json_binary(&get_is_relayer(deps, relayer)?),
        QueryMsg::HasVoted {
            origin_domain_id,
            deposit_nonce,
            relayer,
        } => to_json_binary(&get_has_voted(
            deps,
            origin_domain_id,
            deposit_nonce,
            relayer,
        )?),
        QueryMsg::GetEscrow { resource_id } => to_json_binary(&get_escrow(deps, resource_id)?),
    }
}

fn get_state(deps: Deps) -> StdResult<StateResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(StateResponse {
        admin: state.admin.to_string(),
        domain_id: state.domain_id,
        relayer_threshold: state.relayer_threshold,
        total_relayers: state.total_relayers,
        expiry: state.expiry,
        paused: state.paused,
    })
}

fn get_deposit_count(
    deps: Deps,
    destination_domain_id: DomainId,
) -> StdResult<DepositCountResponse> {
    let deposit_count = read_deposit_count(deps.storage, destination_domain_id)?;
    Ok(DepositCountResponse {
        destination_domain_id,
        deposit_count,
    })
}

// A key nobody voted on yet is reported as inactive.
fn get_proposal(
    deps: Deps,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
) -> StdResult<ProposalResponse> {
    let response = match read_proposal(deps.storage, origin_domain_id, deposit_nonce)? {
        Some(proposal) => ProposalResponse {
            origin_domain_id,
            deposit_nonce,
            resource_id: Some(proposal.resource_id),
            data_hash: Some(proposal.data_hash),
            yes_votes: proposal.yes_votes.iter().map(|v| v.to_string()).collect(),
            status: proposal.status,
            proposed_height: proposal.proposed_height,
        },
        None => ProposalResponse {
            origin_domain_id,
            deposit_nonce,
            resource_id: None,
            data_hash: None,
            yes_votes: vec![],
            status: ProposalStatus::Inactive,
            proposed_height: 0,
        },
    };
    Ok(response)
}

fn get_resource(deps: Deps, resource_id: ResourceId) -> StdResult<ResourceResponse> {
    let entry = RESOURCES.load(deps.storage, &resource_id)?;
    Ok(ResourceResponse {
        resource_id,
        asset: entry.asset,
        burnable: entry.burnable,
    })
}

fn get_is_relayer(deps: Deps, relayer: String) -> StdResult<IsRelayerResponse> {
    let addr = deps.api.addr_validate(&relayer)?;
    Ok(IsRelayerResponse {
        is_relayer: is_relayer(deps.storage, &addr)?,
        relayer,
    })
}

fn get_has_voted(
    deps: Deps,
    origin_domain_id: DomainId,
    deposit_nonce: DepositNonce,
    relayer: String,
) -> StdResult<HasVotedResponse> {
    let relayer = deps.api.addr_validate(&relayer)?;
    let has_voted = read_proposal(deps.storage, origin_domain_id, deposit_nonce)?
        .map(|proposal| proposal.has_voted(&relayer))
        .unwrap_or(false);
    Ok(HasVotedResponse { has_voted })
}

fn get_escrow(deps: Deps, resource_id: ResourceId) -> StdResult<EscrowResponse> {
    let amount = read_escrow(deps.storage, &resource_id)?;
    Ok(EscrowResponse {
        resource_id,
        amount,
    })
}

