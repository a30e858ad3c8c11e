use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Unnecessary_funds")]
    UnnecessaryFunds {},

    #[error("Bridge transfers are paused")]
    Paused,

    /* ------ Resource registry errors ------ */
    #[error("resourceID not mapped to handler")]
    UnmappedResource,

    #[error("Only cw20 token resources can be burnable")]
    InvalidBurnable,

    #[error("Invalid CW20 token address")]
    InvalidCw20Token,

    /* ------ Handler errors ------ */
    #[error("Invalid deposit data")]
    InvalidDepositData,

    /// Returned if the funds sent do not equal the amount encoded in the deposit data.
    #[error("Deposit amount does not match the funds sent")]
    AmountMismatch,

    /// Returned if the depositor cannot cover the burn (balance or allowance).
    #[error("Burn failed: insufficient balance or allowance")]
    BurnFailed,

    /// Returned if the handler holds less than the amount to release.
    #[error("Insufficient escrow for resource")]
    InsufficientEscrow,

    /* ------ Relayer and proposal errors ------ */
    #[error("Sender is not a relayer")]
    UnauthorizedRelayer,

    #[error("Relayer already exists")]
    RelayerAlreadyExists,

    #[error("Relayer threshold must be between 1 and the number of relayers")]
    InvalidThreshold,

    #[error("Provided data does not match the proposal data hash")]
    DataMismatch,

    #[error("Relayer has already voted on proposal")]
    DuplicateVote,

    #[error("Proposal already passed, executed or cancelled")]
    AlreadyFinalized,

    #[error("Proposal must have passed status")]
    NotPassed,

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Proposal not at expiry threshold")]
    ProposalNotExpired,

    #[error("Proposal cannot be cancelled")]
    ProposalNotCancellable,
}
