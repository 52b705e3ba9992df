//! Contract with the networking layer that reads and writes board accounts.
//!
//! Implementations sign and send transactions and fetch account data; this crate only drives them.
//! Every submit resolves to `Ok(true)` when the transaction landed, `Ok(false)` when the wallet
//! declined to sign, and `Err` for transport or program failures.

use std::cell::Cell;

use anchor_lang::prelude::*;

use crate::board::Board;
use crate::error::{ClientError, ClientResult};
use crate::lobby::BoardSummary;
use crate::state;

/// Result of a create-board submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedBoard {
    /// Derived board address, whether or not the transaction was signed.
    pub address: Pubkey,
    pub accepted: bool,
}

#[allow(async_fn_in_trait)]
pub trait RemoteActions {
    /// Raw account data stored at `address`; [`ClientError::NotFound`] when there is none.
    async fn fetch_board_data(&self, address: &Pubkey) -> ClientResult<Vec<u8>>;

    /// Address and raw data of every account owned by the chess program.
    async fn fetch_all_board_data(&self) -> ClientResult<Vec<(Pubkey, Vec<u8>)>>;

    async fn create_board(
        &self,
        maker: &Pubkey,
        seed: u64,
        guest: Option<Pubkey>,
    ) -> ClientResult<CreatedBoard>;

    async fn join_board(
        &self,
        maker: &Pubkey,
        guest: &Pubkey,
        address: &Pubkey,
    ) -> ClientResult<bool>;

    async fn submit_move(
        &self,
        player: &Pubkey,
        address: &Pubkey,
        slot: u8,
        destination: u8,
    ) -> ClientResult<bool>;

    async fn resign(&self, player: &Pubkey, address: &Pubkey) -> ClientResult<bool>;

    async fn close_board(&self, maker: &Pubkey, address: &Pubkey) -> ClientResult<bool>;

    /// Fetch and decode the board at `address`.
    async fn fetch_board(&self, address: &Pubkey) -> ClientResult<Board> {
        let data = self.fetch_board_data(address).await?;
        state::decode_board(&data)
    }

    /// Every board the program holds, in the order the networking layer returned them.
    /// Accounts that do not decode as a board are skipped.
    async fn list_boards(&self) -> ClientResult<Vec<BoardSummary>> {
        let accounts = self.fetch_all_board_data().await?;
        let boards = accounts
            .into_iter()
            .filter_map(|(address, data)| match state::decode_board(&data) {
                Ok(board) => Some(BoardSummary::new(address, &board)),
                Err(err) => {
                    msg!("Skipping account {}: {}", address, err);
                    None
                }
            })
            .collect();
        Ok(boards)
    }
}

/// Allows one submit at a time per session.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_flight: Cell<bool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Mark a submit as started. The returned token frees the guard when dropped.
    pub fn try_begin(&self) -> ClientResult<InFlight<'_>> {
        if self.in_flight.replace(true) {
            return Err(ClientError::Busy);
        }
        Ok(InFlight { guard: self })
    }
}

#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.set(false);
    }
}
