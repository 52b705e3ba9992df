//! Open and running games, as listed to players picking a board.

use std::fmt;

use anchor_lang::prelude::*;

use crate::board::Board;
use crate::pda::truncate_middle;

/// Characters kept on each side of a shortened key.
const KEY_EDGE: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSummary {
    pub address: Pubkey,
    pub white: Pubkey,
    /// `None` while the board waits for a guest.
    pub black: Option<Pubkey>,
    pub game_over: bool,
}

impl BoardSummary {
    pub fn new(address: Pubkey, board: &Board) -> Self {
        Self {
            address,
            white: board.maker,
            black: board.guest,
            game_over: board.game_over,
        }
    }

    /// No guest has joined yet.
    pub fn is_open(&self) -> bool {
        self.black.is_none() && !self.game_over
    }

    pub fn black_label(&self) -> String {
        match self.black {
            Some(black) => short(&black),
            None => "Open".to_string(),
        }
    }
}

fn short(key: &Pubkey) -> String {
    truncate_middle(&key.to_string(), KEY_EDGE, KEY_EDGE)
}

impl fmt::Display for BoardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDA: {}  White: {}  Black: {}",
            short(&self.address),
            short(&self.white),
            self.black_label()
        )?;
        if self.game_over {
            write!(f, "  (game over)")?;
        }
        Ok(())
    }
}
