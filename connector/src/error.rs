use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only the bridge can send messages")]
    NotBridge,

    #[error("Unauthorized: only the counterpart connector can deliver messages")]
    NotCounterpart,

    #[error("Counterpart already set: {counterpart}")]
    CounterpartAlreadySet { counterpart: String },

    #[error("Counterpart not set")]
    CounterpartNotSet,

    #[error("Message not found: {sequence}")]
    MessageNotFound { sequence: u64 },
}
