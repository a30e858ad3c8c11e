// Contains mock functionality to test multi-contract scenarios

use std::collections::HashMap;
use std::marker::PhantomData;

use cosmwasm_std::testing::{MockApi, MockQuerier, MockStorage, MOCK_CONTRACT_ADDR};
use cosmwasm_std::{
    from_json, to_json_binary, Coin, ContractResult, Empty, OwnedDeps, Querier, QuerierResult,
    QueryRequest, SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20QueryMsg, Expiration};

/// mock_dependencies is a drop-in replacement for cosmwasm_std::testing::mock_dependencies
/// this uses WasmMockQuerier, which also answers cw20 balance and allowance queries.
pub fn mock_dependencies(
    contract_balance: &[Coin],
) -> OwnedDeps<MockStorage, MockApi, WasmMockQuerier> {
    let custom_querier: WasmMockQuerier =
        WasmMockQuerier::new(MockQuerier::new(&[(MOCK_CONTRACT_ADDR, contract_balance)]));

    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: custom_querier,
        custom_query_type: PhantomData,
    }
}

pub struct WasmMockQuerier {
    base: MockQuerier,
    // (token, holder) => balance
    token_balances: HashMap<(String, String), Uint128>,
    // (token, owner, spender) => allowance
    token_allowances: HashMap<(String, String, String), Uint128>,
}

impl Querier for WasmMockQuerier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        // MockQuerier doesn't support Custom, so we ignore it completely here
        let request: QueryRequest<Empty> = match from_json(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return SystemResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {}", e),
                    request: bin_request.into(),
                })
            }
        };
        self.handle_query(&request)
    }
}

impl WasmMockQuerier {
    pub fn new(base: MockQuerier) -> Self {
        WasmMockQuerier {
            base,
            token_balances: HashMap::new(),
            token_allowances: HashMap::new(),
        }
    }

    pub fn with_token_balance(&mut self, token: &str, holder: &str, amount: u128) {
        self.token_balances.insert(
            (token.to_string(), holder.to_string()),
            Uint128::new(amount),
        );
    }

    pub fn with_token_allowance(&mut self, token: &str, owner: &str, spender: &str, amount: u128) {
        self.token_allowances.insert(
            (token.to_string(), owner.to_string(), spender.to_string()),
            Uint128::new(amount),
        );
    }

    pub fn handle_query(&self, request: &QueryRequest<Empty>) -> QuerierResult {
        match &request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg }) => {
                match from_json(msg) {
                    Ok(Cw20QueryMsg::Balance { address }) => {
                        let balance = self
                            .token_balances
                            .get(&(contract_addr.clone(), address))
                            .copied()
                            .unwrap_or_default();
                        SystemResult::Ok(ContractResult::from(to_json_binary(
                            &BalanceResponse { balance },
                        )))
                    }
                    Ok(Cw20QueryMsg::Allowance { owner, spender }) => {
                        let allowance = self
                            .token_allowances
                            .get(&(contract_addr.clone(), owner, spender))
                            .copied()
                            .unwrap_or_default();
                        SystemResult::Ok(ContractResult::from(to_json_binary(
                            &AllowanceResponse {
                                allowance,
                                expires: Expiration::Never {},
                            },
                        )))
                    }
                    _ => SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: format!("query to {}", contract_addr),
                    }),
                }
            }
            _ => self.base.handle_query(request),
        }
    }
}
