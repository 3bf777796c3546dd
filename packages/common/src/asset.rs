//! Asset abstraction over native bank denoms and CW20 tokens.
//!
//! The bridge moves exactly one fungible asset per deployment. Payouts, burns
//! and balance lookups go through [`AssetInfo`] so the handlers never branch on
//! the token kind themselves.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, CosmosMsg, QuerierWrapper, StdResult, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

/// Identifies a bridged asset
#[cw_serde]
pub enum AssetInfo {
    /// Native bank denom (e.g. "uluna")
    Native { denom: String },
    /// CW20 token contract
    Cw20 { contract_addr: Addr },
}

impl AssetInfo {
    pub fn native(denom: impl Into<String>) -> Self {
        AssetInfo::Native {
            denom: denom.into(),
        }
    }

    pub fn cw20(contract_addr: Addr) -> Self {
        AssetInfo::Cw20 { contract_addr }
    }

    /// Message paying `amount` of this asset from the contract to `recipient`.
    pub fn transfer_msg(&self, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        match self {
            AssetInfo::Native { denom } => Ok(CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount,
                }],
            })),
            AssetInfo::Cw20 { contract_addr } => Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                })?,
                funds: vec![],
            })),
        }
    }

    /// Message destroying `amount` of this asset held by the contract.
    pub fn burn_msg(&self, amount: Uint128) -> StdResult<CosmosMsg> {
        match self {
            AssetInfo::Native { denom } => Ok(CosmosMsg::Bank(BankMsg::Burn {
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount,
                }],
            })),
            AssetInfo::Cw20 { contract_addr } => Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Burn { amount })?,
                funds: vec![],
            })),
        }
    }

    /// Balance of this asset held by `account`.
    pub fn query_balance(&self, querier: &QuerierWrapper, account: &Addr) -> StdResult<Uint128> {
        match self {
            AssetInfo::Native { denom } => Ok(querier.query_balance(account, denom)?.amount),
            AssetInfo::Cw20 { contract_addr } => {
                let res: BalanceResponse = querier.query_wasm_smart(
                    contract_addr,
                    &Cw20QueryMsg::Balance {
                        address: account.to_string(),
                    },
                )?;
                Ok(res.balance)
            }
        }
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetInfo::Native { denom } => write!(f, "{}", denom),
            AssetInfo::Cw20 { contract_addr } => write!(f, "{}", contract_addr),
        }
    }
}
