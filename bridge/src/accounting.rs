//! Bonder accounting ledger.
//!
//! Each address carries `credit`, `raw_debit` and `additional_debit`.
//! Available credit is `credit - (raw_debit + additional_debit)` and may never
//! go negative: every debit-increasing hook checks it before writing.
//!
//! - `raw_debit` grows on unstake and on forfeits.
//! - `additional_debit` is exposure reserved for outstanding bonds and is
//!   released or forfeited when the bond completes.

use cosmwasm_std::{Addr, Storage, Uint128};

use crate::error::ContractError;
use crate::state::{BonderLedger, BONDERS, LEDGER};

impl BonderLedger {
    pub fn total_debit(&self) -> Result<Uint128, ContractError> {
        Ok(self.raw_debit.checked_add(self.additional_debit)?)
    }

    /// `credit - total_debit`, saturating at zero
    pub fn available_credit(&self) -> Result<Uint128, ContractError> {
        Ok(self.credit.saturating_sub(self.total_debit()?))
    }

    fn require_solvent(&self) -> Result<(), ContractError> {
        if self.total_debit()? > self.credit {
            return Err(ContractError::NotEnoughAvailableCredit);
        }
        Ok(())
    }
}

pub fn load_ledger(storage: &dyn Storage, addr: &Addr) -> Result<BonderLedger, ContractError> {
    Ok(LEDGER.may_load(storage, addr)?.unwrap_or_default())
}

pub fn is_bonder(storage: &dyn Storage, addr: &Addr) -> Result<bool, ContractError> {
    Ok(BONDERS.may_load(storage, addr)?.unwrap_or(false))
}

/// Registered and holding at least `required_credit` of available credit
pub fn is_bonder_allowed(
    storage: &dyn Storage,
    addr: &Addr,
    required_credit: Uint128,
) -> Result<bool, ContractError> {
    if !is_bonder(storage, addr)? {
        return Ok(false);
    }
    Ok(load_ledger(storage, addr)?.available_credit()? >= required_credit)
}

// ============================================================================
// Hooks
// ============================================================================

pub fn add_credit(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.credit = ledger.credit.checked_add(amount)?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}

pub fn add_raw_debit(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.raw_debit = ledger.raw_debit.checked_add(amount)?;
    ledger.require_solvent()?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}

/// Reserve exposure for a new bond. Fails without writing if it would leave
/// the address with negative available credit.
pub fn add_additional_debit(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.additional_debit = ledger.additional_debit.checked_add(amount)?;
    ledger.require_solvent()?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}

/// Release exposure of a bond that completed honestly.
pub fn release_additional_debit(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.additional_debit = ledger.additional_debit.checked_sub(amount)?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}

/// Settle a bonded withdrawal: the fronted amount comes back as credit.
pub fn settle(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.credit = ledger.credit.checked_add(amount)?;
    ledger.additional_debit = ledger.additional_debit.checked_sub(amount)?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}

/// Forfeit reserved exposure. Total debit is unchanged, the amount simply
/// moves from additional to raw debit and never comes back.
pub fn forfeit(
    storage: &mut dyn Storage,
    addr: &Addr,
    amount: Uint128,
) -> Result<BonderLedger, ContractError> {
    let mut ledger = load_ledger(storage, addr)?;
    ledger.additional_debit = ledger.additional_debit.checked_sub(amount)?;
    ledger.raw_debit = ledger.raw_debit.checked_add(amount)?;
    LEDGER.save(storage, addr, &ledger)?;
    Ok(ledger)
}
