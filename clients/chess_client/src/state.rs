//! On-chain layout of the board account and its decoding into [`Board`].
//!
//! Raw account bytes never reach the rest of the crate: [`decode_board`] is the only way in.
//! Accounts written before `game_over` existed are still accepted and decode as a game in
//! progress.

use anchor_lang::prelude::*;

use crate::board::Board;
use crate::constants::PIECE_SLOTS;
use crate::error::{ClientError, ClientResult};

#[derive(InitSpace)]
#[account(discriminator = 1)]
/// Board account (PDA) as stored by the chess program.
pub struct BoardAccount {
    pub is_white_turn: bool,
    /// Canonical bump of the board PDA.
    pub bump: u8,
    /// Seed the maker chose when creating the board.
    pub seed: u64,
    pub maker: Pubkey,
    pub guest: Option<Pubkey>,
    /// 1-based position of every piece slot; the index identifies the piece.
    pub state: [u8; PIECE_SLOTS],
    pub game_over: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
/// Board account layout from before resignation was tracked.
pub struct LegacyBoardAccount {
    pub is_white_turn: bool,
    pub bump: u8,
    pub seed: u64,
    pub maker: Pubkey,
    pub guest: Option<Pubkey>,
    pub state: [u8; PIECE_SLOTS],
}

impl BoardAccount {
    pub fn into_board(self) -> Board {
        Board {
            is_white_turn: self.is_white_turn,
            maker: self.maker,
            guest: self.guest,
            positions: self.state,
            game_over: self.game_over,
        }
    }
}

impl From<LegacyBoardAccount> for BoardAccount {
    fn from(legacy: LegacyBoardAccount) -> Self {
        Self {
            is_white_turn: legacy.is_white_turn,
            bump: legacy.bump,
            seed: legacy.seed,
            maker: legacy.maker,
            guest: legacy.guest,
            state: legacy.state,
            game_over: false,
        }
    }
}

/// Decode fetched account data, current layout first, then the legacy one.
pub fn decode_board_account(data: &[u8]) -> ClientResult<BoardAccount> {
    let discriminator = BoardAccount::DISCRIMINATOR;
    if !data.starts_with(discriminator) {
        return Err(ClientError::AccountData(
            "unexpected account discriminator".to_string(),
        ));
    }

    let mut current = data;
    if let Ok(account) = BoardAccount::try_deserialize(&mut current) {
        return Ok(account);
    }

    let mut body = &data[discriminator.len()..];
    match LegacyBoardAccount::deserialize(&mut body) {
        Ok(legacy) => {
            msg!("Decoded board account with legacy layout, game_over defaults to false");
            Ok(legacy.into())
        }
        Err(err) => Err(ClientError::AccountData(err.to_string())),
    }
}

pub fn decode_board(data: &[u8]) -> ClientResult<Board> {
    decode_board_account(data).map(BoardAccount::into_board)
}
