//! Chess client core for the on-chain chess program.
//!
//! High level flow:
//! - A `Board` PDA is created per maker and `seed` (seeded by `b"board"`, the maker key and the
//!   seed's little-endian bytes). The maker plays white.
//! - A guest is seated later through `join`; until then the board is inactive.
//! - Players pick a piece and a destination by clicking render squares. A destination accepted by
//!   the pluggable validator becomes a proposal that must be confirmed before it is submitted.
//! - After every accepted submit the board account is fetched again and replaces the local board.
//! - Either player may resign; the maker closes the board to reclaim rent.
//! - `list_boards` summarizes every board account for a lobby, open seats included.
//!
//! The account stores 32 piece slots, each holding the 1-based square of that piece (0 once
//! captured). Slots 0..16 are white, 16..32 black; see [`coords`] for the layout.

// Anchor macros emit cfgs that are unknown off chain.
#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod board;
pub mod config;
pub mod constants;
pub mod coords;
pub mod error;
pub mod lobby;
pub mod pda;
pub mod remote;
pub mod selection;
pub mod session;
pub mod state;

pub use board::Board;
pub use config::ClientConfig;
pub use coords::{Archetype, Side};
pub use error::{ChessError, ClientError, ClientResult};
pub use lobby::BoardSummary;
pub use pda::derive_board_address;
pub use remote::{CreatedBoard, RemoteActions, SubmitGuard};
pub use selection::{
    AcceptAll, ClickOutcome, MoveProposal, MoveSelector, MoveValidator, SelectionState,
};
pub use session::{Action, ActionStatus, GameSession};
pub use state::{decode_board, BoardAccount};

declare_id!("31xiptEVG9npfKRzuToPsBGwrBs6tSw5bRj6VhSnMgWH");
