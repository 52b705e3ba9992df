use anchor_lang::error::ERROR_CODE_OFFSET;
use anchor_lang::prelude::*;

/// Custom errors raised by the chess program, in on-chain order.
#[error_code]
pub enum ChessError {
    #[msg("Invalid move")]
    InvalidMove,

    #[msg("Invalid creator")]
    InvalidCreator,

    #[msg("Invalid player")]
    InvalidPlayer,

    #[msg("Guest player not present")]
    GuestPlayerNotPresent,

    #[msg("Out of board bounds")]
    OutOfBounds,

    #[msg("Destination is occupied")]
    BusyDestination,

    #[msg("Wrong piece")]
    InvalidPiece,

    #[msg("A guest already joined")]
    GuestAlreadyPresent,
}

impl ChessError {
    /// Map a custom program error code (as found in a failed transaction) back to the variant.
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code.checked_sub(ERROR_CODE_OFFSET)? {
            0 => ChessError::InvalidMove,
            1 => ChessError::InvalidCreator,
            2 => ChessError::InvalidPlayer,
            3 => ChessError::GuestPlayerNotPresent,
            4 => ChessError::OutOfBounds,
            5 => ChessError::BusyDestination,
            6 => ChessError::InvalidPiece,
            7 => ChessError::GuestAlreadyPresent,
            _ => return None,
        };
        Some(error)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failures surfaced by the remote action boundary and the session.
///
/// The coordinate mapper and the board model never produce these; they degrade to neutral values
/// instead.
#[derive(Debug, ::thiserror::Error)]
pub enum ClientError {
    /// The wallet refused to sign. Shown to the user, never retried.
    #[error("signature request was declined")]
    UserDeclinedSignature,

    #[error("transaction failed: {0}")]
    Transport(String),

    #[error("program rejected the transaction: {0}")]
    Program(ChessError),

    #[error("no such game: {0}")]
    NotFound(Pubkey),

    #[error("invalid local state: {0}")]
    InvalidLocalState(&'static str),

    /// Another submit from this session has not resolved yet.
    #[error("another transaction is still in flight")]
    Busy,

    #[error("account is not a chess board: {0}")]
    AccountData(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("board address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: Pubkey, actual: Pubkey },
}

impl ClientError {
    /// Classify a custom error code returned by a failed transaction.
    pub fn from_program_code(code: u32) -> Self {
        match ChessError::from_code(code) {
            Some(error) => ClientError::Program(error),
            None => ClientError::Transport(format!("custom program error: {code:#x}")),
        }
    }
}
