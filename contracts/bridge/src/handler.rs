use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Coin, CosmosMsg, Deps, Env, StdError, Uint128, WasmMsg,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

use bridge_cosmwasm::error::ContractError;
use bridge_cosmwasm::structs::{AssetInfo, ResourceId};
use bridge_cosmwasm::utils::DepositData;

use crate::state::{read_escrow, read_resource, ResourceEntry};

/// Asset effect performed for a resource. Picked by the `burnable` flag of the
/// resource entry and nothing else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    /// Native coin or non-burnable cw20: held in escrow on deposit, released on execute.
    LockRelease(AssetInfo),
    /// Wrapped cw20 minted by this contract: burned on deposit, minted on execute.
    BurnMint(Addr),
}

/// What came in with a deposit.
#[derive(Clone, Copy, Debug)]
pub enum DepositFunds<'a> {
    /// Coins attached to a `Deposit` message
    Coins(&'a [Coin]),
    /// Tokens received through a cw20 `Send`
    Cw20 { token: &'a Addr, amount: Uint128 },
}

/// Effects of an accepted deposit. Applied by the bridge after the nonce is issued.
#[derive(Debug, Default)]
pub struct DepositEffect {
    pub messages: Vec<CosmosMsg>,
    pub escrowed: Uint128,
}

/// Effects of a settlement. Applied by the bridge when the proposal is executed.
#[derive(Debug, Default)]
pub struct Settlement {
    pub messages: Vec<CosmosMsg>,
    pub released: Uint128,
    pub recipient: String,
}

pub fn resolve_handler(deps: Deps, resource_id: &ResourceId) -> Result<Handler, ContractError> {
    let entry = read_resource(deps.storage, resource_id)?;
    Handler::from_entry(deps, entry)
}

impl Handler {
    pub fn from_entry(deps: Deps, entry: ResourceEntry) -> Result<Handler, ContractError> {
        match (entry.burnable, entry.asset) {
            (false, asset) => Ok(Handler::LockRelease(asset)),
            (true, AssetInfo::Cw20 { contract_addr }) => {
                Ok(Handler::BurnMint(deps.api.addr_validate(&contract_addr)?))
            }
            (true, AssetInfo::Native { .. }) => Err(ContractError::InvalidBurnable),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Handler::LockRelease(_) => "lock_release",
            Handler::BurnMint(_) => "burn_mint",
        }
    }

    /// Checks a deposit against the encoded amount and returns its effects.
    /// Reads state only.
    pub fn on_deposit(
        &self,
        deps: Deps,
        env: &Env,
        depositor: &Addr,
        funds: DepositFunds,
        deposit: &DepositData,
    ) -> Result<DepositEffect, ContractError> {
        match self {
            Handler::LockRelease(AssetInfo::Native { denom }) => {
                let sent = match funds {
                    DepositFunds::Coins(coins) => coins,
                    DepositFunds::Cw20 { .. } => return Err(ContractError::InvalidCw20Token),
                };
                match sent {
                    [coin] if coin.denom == *denom && coin.amount == deposit.amount => {
                        Ok(DepositEffect {
                            messages: vec![],
                            escrowed: deposit.amount,
                        })
                    }
                    _ => Err(ContractError::AmountMismatch),
                }
            }
            Handler::LockRelease(AssetInfo::Cw20 { contract_addr }) => match funds {
                DepositFunds::Cw20 { token, amount } => {
                    if token.as_str() != contract_addr {
                        return Err(ContractError::InvalidCw20Token);
                    }
                    if amount != deposit.amount {
                        return Err(ContractError::AmountMismatch);
                    }
                    Ok(DepositEffect {
                        messages: vec![],
                        escrowed: amount,
                    })
                }
                DepositFunds::Coins(_) => Err(ContractError::Std(StdError::generic_err(
                    "cw20 deposits must be sent through the token contract",
                ))),
            },
            Handler::BurnMint(token) => {
                match funds {
                    DepositFunds::Coins(coins) if coins.is_empty() => {}
                    DepositFunds::Coins(_) => return Err(ContractError::UnnecessaryFunds {}),
                    DepositFunds::Cw20 { .. } => return Err(ContractError::InvalidCw20Token),
                }

                // The burn runs as a BurnFrom issued by this contract, so both the
                // depositor's balance and the allowance granted to us must cover it.
                let balance: BalanceResponse = deps.querier.query_wasm_smart(
                    token,
                    &Cw20QueryMsg::Balance {
                        address: depositor.to_string(),
                    },
                )?;
                let allowance: AllowanceResponse = deps.querier.query_wasm_smart(
                    token,
                    &Cw20QueryMsg::Allowance {
                        owner: depositor.to_string(),
                        spender: env.contract.address.to_string(),
                    },
                )?;
                if balance.balance < deposit.amount
                    || allowance.allowance < deposit.amount
                    || allowance.expires.is_expired(&env.block)
                {
                    return Err(ContractError::BurnFailed);
                }

                Ok(DepositEffect {
                    messages: vec![CosmosMsg::Wasm(WasmMsg::Execute {
                        contract_addr: token.to_string(),
                        funds: vec![],
                        msg: to_json_binary(&Cw20ExecuteMsg::BurnFrom {
                            owner: depositor.to_string(),
                            amount: deposit.amount,
                        })?,
                    })],
                    escrowed: Uint128::zero(),
                })
            }
        }
    }

    /// Builds the transfer of {deposit.amount} to the decoded recipient.
    /// Fails with `InsufficientEscrow` when a lock-release resource cannot cover it.
    pub fn on_execute(
        &self,
        deps: Deps,
        resource_id: &ResourceId,
        deposit: &DepositData,
    ) -> Result<Settlement, ContractError> {
        let recipient = deps
            .api
            .addr_validate(&deposit.recipient_string()?)?
            .to_string();

        match self {
            Handler::LockRelease(asset) => {
                if read_escrow(deps.storage, resource_id)? < deposit.amount {
                    return Err(ContractError::InsufficientEscrow);
                }
                let message = match asset {
                    AssetInfo::Native { denom } => CosmosMsg::Bank(BankMsg::Send {
                        to_address: recipient.clone(),
                        amount: coins(deposit.amount.u128(), denom),
                    }),
                    AssetInfo::Cw20 { contract_addr } => CosmosMsg::Wasm(WasmMsg::Execute {
                        contract_addr: contract_addr.clone(),
                        funds: vec![],
                        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                            recipient: recipient.clone(),
                            amount: deposit.amount,
                        })?,
                    }),
                };
                Ok(Settlement {
                    messages: vec![message],
                    released: deposit.amount,
                    recipient,
                })
            }
            Handler::BurnMint(token) => Ok(Settlement {
                messages: vec![CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    funds: vec![],
                    msg: to_json_binary(&Cw20ExecuteMsg::Mint {
                        recipient: recipient.clone(),
                        amount: deposit.amount,
                    })?,
                })],
                released: Uint128::zero(),
                recipient,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::{mock_dependencies, mock_env, MOCK_CONTRACT_ADDR};
    use cosmwasm_std::{coin, from_json};

    use super::*;
    use crate::mock_querier::mock_dependencies as mock_dependencies_with_token;
    use crate::state::increase_escrow;

    const TOKEN: &str = "wrapped-token";
    const DEPOSITOR: &str = "depositor";
    const RESOURCE_ID: ResourceId = [7u8; 32];

    fn native() -> Handler {
        Handler::LockRelease(AssetInfo::Native {
            denom: "ucosm".to_string(),
        })
    }

    #[test]
    fn burnable_flag_selects_the_variant() {
        let deps = mock_dependencies();
        let cw20 = AssetInfo::Cw20 {
            contract_addr: TOKEN.to_string(),
        };

        let handler = Handler::from_entry(
            deps.as_ref(),
            ResourceEntry {
                asset: cw20.clone(),
                burnable: false,
            },
        )
        .unwrap();
        assert_eq!(handler, Handler::LockRelease(cw20.clone()));

        let handler = Handler::from_entry(
            deps.as_ref(),
            ResourceEntry {
                asset: cw20,
                burnable: true,
            },
        )
        .unwrap();
        assert_eq!(handler, Handler::BurnMint(Addr::unchecked(TOKEN)));

        let err = Handler::from_entry(
            deps.as_ref(),
            ResourceEntry {
                asset: AssetInfo::Native {
                    denom: "ucosm".to_string(),
                },
                burnable: true,
            },
        )
        .unwrap_err();
        assert_eq!(err, ContractError::InvalidBurnable);
    }

    #[test]
    fn native_deposit_requires_exact_funds() {
        let deps = mock_dependencies();
        let env = mock_env();
        let depositor = Addr::unchecked(DEPOSITOR);
        let deposit = DepositData::new(10u128, b"recipient");

        let effect = native()
            .on_deposit(
                deps.as_ref(),
                &env,
                &depositor,
                DepositFunds::Coins(&[coin(10, "ucosm")]),
                &deposit,
            )
            .unwrap();
        assert_eq!(effect.escrowed, Uint128::new(10));
        assert!(effect.messages.is_empty());

        for funds in [
            vec![],
            vec![coin(9, "ucosm")],
            vec![coin(10, "uatom")],
            vec![coin(10, "ucosm"), coin(1, "uatom")],
        ] {
            let err = native()
                .on_deposit(
                    deps.as_ref(),
                    &env,
                    &depositor,
                    DepositFunds::Coins(&funds),
                    &deposit,
                )
                .unwrap_err();
            assert_eq!(err, ContractError::AmountMismatch);
        }
    }

    #[test]
    fn burn_requires_balance_and_allowance() {
        let mut deps = mock_dependencies_with_token(&[]);
        let env = mock_env();
        let depositor = Addr::unchecked(DEPOSITOR);
        let handler = Handler::BurnMint(Addr::unchecked(TOKEN));
        let deposit = DepositData::new(10u128, b"recipient");

        // Balance without allowance
        deps.querier.with_token_balance(TOKEN, DEPOSITOR, 10);
        let err = handler
            .on_deposit(
                deps.as_ref(),
                &env,
                &depositor,
                DepositFunds::Coins(&[]),
                &deposit,
            )
            .unwrap_err();
        assert_eq!(err, ContractError::BurnFailed);

        // Allowance without enough balance
        deps.querier.with_token_balance(TOKEN, DEPOSITOR, 9);
        deps.querier
            .with_token_allowance(TOKEN, DEPOSITOR, MOCK_CONTRACT_ADDR, 10);
        let err = handler
            .on_deposit(
                deps.as_ref(),
                &env,
                &depositor,
                DepositFunds::Coins(&[]),
                &deposit,
            )
            .unwrap_err();
        assert_eq!(err, ContractError::BurnFailed);

        deps.querier.with_token_balance(TOKEN, DEPOSITOR, 10);
        let effect = handler
            .on_deposit(
                deps.as_ref(),
                &env,
                &depositor,
                DepositFunds::Coins(&[]),
                &deposit,
            )
            .unwrap();
        assert_eq!(effect.escrowed, Uint128::zero());
        match &effect.messages[..] {
            [CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            })] => {
                assert_eq!(contract_addr, TOKEN);
                assert_eq!(
                    from_json::<Cw20ExecuteMsg>(msg).unwrap(),
                    Cw20ExecuteMsg::BurnFrom {
                        owner: DEPOSITOR.to_string(),
                        amount: Uint128::new(10),
                    }
                );
            }
            other => panic!("unexpected messages: {:?}", other),
        }

        // Funds are never taken alongside a burn
        let err = handler
            .on_deposit(
                deps.as_ref(),
                &env,
                &depositor,
                DepositFunds::Coins(&[coin(10, "ucosm")]),
                &deposit,
            )
            .unwrap_err();
        assert_eq!(err, ContractError::UnnecessaryFunds {});
    }

    #[test]
    fn release_is_bounded_by_escrow() {
        let mut deps = mock_dependencies();
        let deposit = DepositData::new(10u128, b"recipient");

        let err = native()
            .on_execute(deps.as_ref(), &RESOURCE_ID, &deposit)
            .unwrap_err();
        assert_eq!(err, ContractError::InsufficientEscrow);

        increase_escrow(deps.as_mut().storage, &RESOURCE_ID, Uint128::new(10)).unwrap();
        let settlement = native()
            .on_execute(deps.as_ref(), &RESOURCE_ID, &deposit)
            .unwrap();
        assert_eq!(settlement.released, Uint128::new(10));
        assert_eq!(settlement.recipient, "recipient");
        assert_eq!(
            settlement.messages,
            vec![CosmosMsg::Bank(BankMsg::Send {
                to_address: "recipient".to_string(),
                amount: coins(10, "ucosm"),
            })]
        );
    }

    #[test]
    fn mint_goes_to_recipient() {
        let deps = mock_dependencies();
        let handler = Handler::BurnMint(Addr::unchecked(TOKEN));
        let deposit = DepositData::new(10u128, b"recipient");

        let settlement = handler
            .on_execute(deps.as_ref(), &RESOURCE_ID, &deposit)
            .unwrap();
        assert_eq!(settlement.released, Uint128::zero());
        assert_eq!(
            settlement.messages,
            vec![CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: TOKEN.to_string(),
                funds: vec![],
                msg: to_json_binary(&Cw20ExecuteMsg::Mint {
                    recipient: "recipient".to_string(),
                    amount: Uint128::new(10),
                })
                .unwrap(),
            })]
        );
    }
}
