//! Bonded Bridge Contract - Entry Points
//!
//! One instance runs on every participating chain. The same code plays the
//! origin role (send and commit), the hub role (bond, confirm, challenge,
//! resolve and rescue) and the destination role (set roots, withdraw and
//! settle), selected by `chain_id` and `hub_chain_id`.
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_add_bonder, execute_bond_transfer_root,
    execute_bond_withdrawal_native, execute_cancel_admin_proposal,
    execute_challenge_transfer_bond_native, execute_commit_transfers,
    execute_confirm_transfer_root, execute_pause, execute_propose_admin, execute_receive,
    execute_recover_asset, execute_register_chain, execute_remove_bonder,
    execute_rescue_transfer_root, execute_resolve_challenge, execute_send,
    execute_set_chain_id_deposits_paused, execute_set_challenge_amount_divisor,
    execute_set_challenge_period, execute_set_challenge_resolution_period,
    execute_set_max_pending_transfers, execute_set_min_transfer_root_bond_delay,
    execute_set_minimum_force_commit_delay, execute_set_rescue_delay,
    execute_set_time_slot_bond_limit, execute_set_transfer_root, execute_set_x_domain_connector,
    execute_settle_bonded_withdrawal, execute_settle_bonded_withdrawals, execute_stake_native,
    execute_unpause, execute_unregister_chain, execute_unstake, execute_withdraw,
    register_bonder, validate_config, SendParams,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_amount_bonded_in_time_slot, query_available_credit, query_bond_amount,
    query_bonded_withdrawal, query_bonders, query_chain, query_chains, query_challenge_amount,
    query_compute_merkle_proof, query_compute_merkle_root, query_compute_transfer_id,
    query_compute_transfer_root_id, query_config, query_confirmed_transfer_root, query_credit,
    query_current_nonce, query_debit_and_additional_debit, query_is_bonder_allowed,
    query_is_transfer_spent, query_last_commit_time, query_ledger, query_pending_admin,
    query_pending_transfers, query_raw_debit, query_sent_transfer, query_stats, query_status,
    query_time_slot, query_transfer_bond, query_transfer_root,
};
use crate::state::{
    Config, Stats, BONDER_COUNT, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DEFAULT_CHALLENGE_AMOUNT_DIVISOR, DEFAULT_CHALLENGE_PERIOD,
    DEFAULT_CHALLENGE_RESOLUTION_PERIOD, DEFAULT_MAX_PENDING_TRANSFERS,
    DEFAULT_MINIMUM_FORCE_COMMIT_DELAY, DEFAULT_MIN_TRANSFER_ROOT_BOND_DELAY,
    DEFAULT_RESCUE_DELAY, OUTGOING_NONCE, STATS,
};
use common::AssetInfo;

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;

    if msg.chain_id == 0 {
        return Err(ContractError::InvalidChainId { chain_id: 0 });
    }
    if msg.hub_chain_id == 0 {
        return Err(ContractError::InvalidChainId { chain_id: 0 });
    }

    // Normalize the CW20 address
    let asset = match msg.asset {
        AssetInfo::Cw20 { contract_addr } => AssetInfo::Cw20 {
            contract_addr: deps.api.addr_validate(contract_addr.as_str())?,
        },
        native => native,
    };

    let config = Config {
        admin,
        paused: false,
        chain_id: msg.chain_id,
        hub_chain_id: msg.hub_chain_id,
        asset,
        challenge_period: msg.challenge_period.unwrap_or(DEFAULT_CHALLENGE_PERIOD),
        challenge_resolution_period: msg
            .challenge_resolution_period
            .unwrap_or(DEFAULT_CHALLENGE_RESOLUTION_PERIOD),
        min_transfer_root_bond_delay: msg
            .min_transfer_root_bond_delay
            .unwrap_or(DEFAULT_MIN_TRANSFER_ROOT_BOND_DELAY),
        rescue_delay: msg.rescue_delay.unwrap_or(DEFAULT_RESCUE_DELAY),
        challenge_amount_divisor: msg
            .challenge_amount_divisor
            .unwrap_or(DEFAULT_CHALLENGE_AMOUNT_DIVISOR),
        time_slot_bond_limit: msg.time_slot_bond_limit.unwrap_or_default(),
        max_pending_transfers: msg
            .max_pending_transfers
            .unwrap_or(DEFAULT_MAX_PENDING_TRANSFERS),
        minimum_force_commit_delay: msg
            .minimum_force_commit_delay
            .unwrap_or(DEFAULT_MINIMUM_FORCE_COMMIT_DELAY),
    };
    validate_config(&config)?;
    CONFIG.save(deps.storage, &config)?;

    // Initialize bonders
    BONDER_COUNT.save(deps.storage, &0)?;
    for bonder in &msg.bonders {
        let bonder = deps.api.addr_validate(bonder)?;
        register_bonder(deps.storage, &bonder)?;
    }

    STATS.save(deps.storage, &Stats::default())?;
    OUTGOING_NONCE.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("hub_chain_id", config.hub_chain_id.to_string())
        .add_attribute("asset", config.asset.to_string())
        .add_attribute("bonder_count", msg.bonders.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Outgoing transfers
        ExecuteMsg::Send {
            destination_chain_id,
            recipient,
            amount,
            bonder_fee,
            amount_out_min,
            deadline,
        } => execute_send(
            deps,
            env,
            info,
            SendParams {
                destination_chain_id,
                recipient,
                amount,
                bonder_fee,
                amount_out_min,
                deadline,
            },
        ),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),
        ExecuteMsg::CommitTransfers {
            destination_chain_id,
        } => execute_commit_transfers(deps, env, info, destination_chain_id),

        // Root bonding
        ExecuteMsg::BondTransferRoot {
            root_hash,
            destination_chain_id,
            total_amount,
        } => execute_bond_transfer_root(
            deps,
            env,
            info,
            root_hash,
            destination_chain_id,
            total_amount,
        ),
        ExecuteMsg::ConfirmTransferRoot {
            origin_chain_id,
            root_hash,
            destination_chain_id,
            total_amount,
            committed_at,
        } => execute_confirm_transfer_root(
            deps,
            env,
            info,
            origin_chain_id,
            root_hash,
            destination_chain_id,
            total_amount,
            committed_at,
        ),
        ExecuteMsg::ChallengeTransferBond {
            root_hash,
            total_amount,
            destination_chain_id,
        } => execute_challenge_transfer_bond_native(
            deps,
            env,
            info,
            root_hash,
            total_amount,
            destination_chain_id,
        ),
        ExecuteMsg::ResolveChallenge {
            root_hash,
            total_amount,
            destination_chain_id,
        } => execute_resolve_challenge(
            deps,
            env,
            info,
            root_hash,
            total_amount,
            destination_chain_id,
        ),

        // Withdrawals
        ExecuteMsg::SetTransferRoot {
            root_hash,
            total_amount,
        } => execute_set_transfer_root(deps, env, info, root_hash, total_amount),
        ExecuteMsg::BondWithdrawal { transfer } => {
            execute_bond_withdrawal_native(deps, info, transfer)
        }
        ExecuteMsg::Withdraw {
            transfer,
            root_hash,
            root_total_amount,
            merkle_index,
            proof,
            total_leaves,
        } => execute_withdraw(
            deps,
            env,
            info,
            transfer,
            root_hash,
            root_total_amount,
            merkle_index,
            proof,
            total_leaves,
        ),
        ExecuteMsg::SettleBondedWithdrawal {
            bonder,
            transfer_id,
            root_hash,
            root_total_amount,
            merkle_index,
            proof,
            total_leaves,
        } => execute_settle_bonded_withdrawal(
            deps,
            bonder,
            transfer_id,
            root_hash,
            root_total_amount,
            merkle_index,
            proof,
            total_leaves,
        ),
        ExecuteMsg::SettleBondedWithdrawals {
            bonder,
            transfer_ids,
            total_amount,
        } => execute_settle_bonded_withdrawals(deps, bonder, transfer_ids, total_amount),

        // Ledger
        ExecuteMsg::Stake { bonder } => execute_stake_native(deps, info, bonder),
        ExecuteMsg::Unstake { amount } => execute_unstake(deps, info, amount),

        // Governance
        ExecuteMsg::RescueTransferRoot {
            root_hash,
            total_amount,
            origin_chain_id,
            recipient,
        } => execute_rescue_transfer_root(
            deps,
            env,
            info,
            root_hash,
            total_amount,
            origin_chain_id,
            recipient,
        ),
        ExecuteMsg::AddBonder { bonder } => execute_add_bonder(deps, info, bonder),
        ExecuteMsg::RemoveBonder { bonder } => execute_remove_bonder(deps, info, bonder),
        ExecuteMsg::RegisterChain {
            chain_id,
            identifier,
            connector,
        } => execute_register_chain(deps, info, chain_id, identifier, connector),
        ExecuteMsg::UnregisterChain { chain_id } => execute_unregister_chain(deps, info, chain_id),
        ExecuteMsg::SetXDomainConnector {
            chain_id,
            connector,
        } => execute_set_x_domain_connector(deps, info, chain_id, connector),
        ExecuteMsg::SetChainIdDepositsPaused { chain_id, paused } => {
            execute_set_chain_id_deposits_paused(deps, info, chain_id, paused)
        }
        ExecuteMsg::SetChallengePeriod { challenge_period } => {
            execute_set_challenge_period(deps, info, challenge_period)
        }
        ExecuteMsg::SetChallengeResolutionPeriod {
            challenge_resolution_period,
        } => execute_set_challenge_resolution_period(deps, info, challenge_resolution_period),
        ExecuteMsg::SetMinTransferRootBondDelay {
            min_transfer_root_bond_delay,
        } => execute_set_min_transfer_root_bond_delay(deps, info, min_transfer_root_bond_delay),
        ExecuteMsg::SetChallengeAmountDivisor {
            challenge_amount_divisor,
        } => execute_set_challenge_amount_divisor(deps, info, challenge_amount_divisor),
        ExecuteMsg::SetTimeSlotBondLimit {
            time_slot_bond_limit,
        } => execute_set_time_slot_bond_limit(deps, info, time_slot_bond_limit),
        ExecuteMsg::SetRescueDelay { rescue_delay } => {
            execute_set_rescue_delay(deps, info, rescue_delay)
        }
        ExecuteMsg::SetMaxPendingTransfers {
            max_pending_transfers,
        } => execute_set_max_pending_transfers(deps, info, max_pending_transfers),
        ExecuteMsg::SetMinimumForceCommitDelay {
            minimum_force_commit_delay,
        } => execute_set_minimum_force_commit_delay(deps, info, minimum_force_commit_delay),

        // Admin operations
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),
        ExecuteMsg::RecoverAsset {
            asset,
            amount,
            recipient,
        } => execute_recover_asset(deps, info, asset, amount, recipient),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Status {} => to_json_binary(&query_status(deps, env)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::Chain { chain_id } => to_json_binary(&query_chain(deps, chain_id)?),
        QueryMsg::Chains { start_after, limit } => {
            to_json_binary(&query_chains(deps, start_after, limit)?)
        }
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),

        // Bonders & ledger
        QueryMsg::Bonders { start_after, limit } => {
            to_json_binary(&query_bonders(deps, start_after, limit)?)
        }
        QueryMsg::IsBonderAllowed {
            address,
            required_credit,
        } => to_json_binary(&query_is_bonder_allowed(deps, address, required_credit)?),
        QueryMsg::Credit { address } => to_json_binary(&query_credit(deps, address)?),
        QueryMsg::RawDebit { address } => to_json_binary(&query_raw_debit(deps, address)?),
        QueryMsg::DebitAndAdditionalDebit { address } => {
            to_json_binary(&query_debit_and_additional_debit(deps, address)?)
        }
        QueryMsg::AvailableCredit { address } => {
            to_json_binary(&query_available_credit(deps, address)?)
        }
        QueryMsg::Ledger { address } => to_json_binary(&query_ledger(deps, address)?),

        // Outgoing transfers
        QueryMsg::PendingTransfers {
            destination_chain_id,
        } => to_json_binary(&query_pending_transfers(deps, destination_chain_id)?),
        QueryMsg::LastCommitTime {
            destination_chain_id,
        } => to_json_binary(&query_last_commit_time(deps, destination_chain_id)?),
        QueryMsg::SentTransfer { nonce } => to_json_binary(&query_sent_transfer(deps, nonce)?),
        QueryMsg::CurrentNonce {} => to_json_binary(&query_current_nonce(deps)?),

        // Roots & bonds
        QueryMsg::TransferRoot {
            root_hash,
            total_amount,
        } => to_json_binary(&query_transfer_root(deps, root_hash, total_amount)?),
        QueryMsg::ConfirmedTransferRoot {
            root_hash,
            total_amount,
        } => to_json_binary(&query_confirmed_transfer_root(
            deps,
            root_hash,
            total_amount,
        )?),
        QueryMsg::TransferBond {
            root_hash,
            total_amount,
        } => to_json_binary(&query_transfer_bond(deps, root_hash, total_amount)?),
        QueryMsg::TimeSlot { time } => to_json_binary(&query_time_slot(time)?),
        QueryMsg::AmountBondedInTimeSlot { time_slot } => {
            to_json_binary(&query_amount_bonded_in_time_slot(deps, time_slot)?)
        }
        QueryMsg::ChallengeAmount { total_amount } => {
            to_json_binary(&query_challenge_amount(deps, total_amount)?)
        }
        QueryMsg::BondAmount { total_amount } => {
            to_json_binary(&query_bond_amount(deps, total_amount)?)
        }

        // Withdrawals
        QueryMsg::IsTransferSpent { transfer_id } => {
            to_json_binary(&query_is_transfer_spent(deps, transfer_id)?)
        }
        QueryMsg::BondedWithdrawal { transfer_id } => {
            to_json_binary(&query_bonded_withdrawal(deps, transfer_id)?)
        }

        // Hash & Merkle helpers
        QueryMsg::ComputeTransferId { transfer } => {
            to_json_binary(&query_compute_transfer_id(transfer)?)
        }
        QueryMsg::ComputeTransferRootId {
            root_hash,
            total_amount,
        } => to_json_binary(&query_compute_transfer_root_id(root_hash, total_amount)?),
        QueryMsg::ComputeMerkleRoot { transfer_ids } => {
            to_json_binary(&query_compute_merkle_root(transfer_ids)?)
        }
        QueryMsg::ComputeMerkleProof {
            transfer_ids,
            index,
        } => to_json_binary(&query_compute_merkle_proof(transfer_ids, index)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
