//! The canonical in-memory game state.
//!
//! A [`Board`] is replaced wholesale by every fetched snapshot and patched locally only by
//! [`Board::apply_local_move`] while a confirmed move waits for the next fetch. Positions are a
//! fixed array of [`PIECE_SLOTS`] entries, so the slot count can never drift.

use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::{starting_position, BOARD_SIDE, CAPTURED, PIECE_SLOTS};
use crate::coords::{self, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// `true` while white (the maker) is to move.
    pub is_white_turn: bool,
    /// Creator of the board; plays white.
    pub maker: Pubkey,
    /// Opponent; `None` until someone joins.
    pub guest: Option<Pubkey>,
    /// Board position (1..=64) of every piece slot, [`CAPTURED`] once taken.
    pub positions: [u8; PIECE_SLOTS],
    pub game_over: bool,
}

impl Board {
    /// Standard starting layout for a board created by `maker`, white to move, no guest yet.
    pub fn initial(maker: Pubkey) -> Self {
        let mut positions = [CAPTURED; PIECE_SLOTS];
        for (slot, position) in positions.iter_mut().enumerate() {
            *position = starting_position(slot as u8);
        }
        Self {
            is_white_turn: true,
            maker,
            guest: None,
            positions,
            game_over: false,
        }
    }

    pub fn side_to_move(&self) -> Side {
        if self.is_white_turn {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Both players are seated and nobody resigned.
    pub fn is_active(&self) -> bool {
        self.guest.is_some() && !self.game_over
    }

    pub fn is_participant(&self, player: &Pubkey) -> bool {
        self.maker == *player || self.guest.as_ref() == Some(player)
    }

    /// Whether `player` holds the side to move.
    pub fn is_turn_of(&self, player: &Pubkey) -> bool {
        match self.side_to_move() {
            Side::White => self.maker == *player,
            Side::Black => self.guest.as_ref() == Some(player),
        }
    }

    pub fn position_of(&self, slot: u8) -> Option<u8> {
        self.positions
            .get(slot as usize)
            .copied()
            .filter(|position| coords::is_on_board(*position))
    }

    /// Slot standing on `position`. Captured slots never match.
    pub fn slot_at(&self, position: u8) -> Option<u8> {
        if !coords::is_on_board(position) {
            return None;
        }
        self.positions
            .iter()
            .position(|p| *p == position)
            .map(|slot| slot as u8)
    }

    /// Piece slot drawn at each render square.
    pub fn render_grid(&self) -> [Option<u8>; 64] {
        let mut grid = [None; 64];
        for (slot, position) in self.positions.iter().enumerate() {
            if let Some(render) = coords::board_position_to_render(*position) {
                grid[render as usize] = Some(slot as u8);
            }
        }
        grid
    }

    /// Copy of the board with `slot` moved to `destination` and the turn flipped.
    ///
    /// Legality is not checked here. A piece already standing on `destination` is marked
    /// [`CAPTURED`], as the program does. An out-of-range slot or destination returns an unchanged
    /// copy.
    pub fn apply_local_move(&self, slot: u8, destination: u8) -> Board {
        let mut board = self.clone();
        if slot as usize >= PIECE_SLOTS || !coords::is_on_board(destination) {
            return board;
        }
        if let Some(captured) = board.slot_at(destination).filter(|s| *s != slot) {
            board.positions[captured as usize] = CAPTURED;
        }
        board.positions[slot as usize] = destination;
        board.is_white_turn = !board.is_white_turn;
        board
    }
}

impl fmt::Display for Board {
    /// Text grid in render order, `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.render_grid();
        for row in grid.chunks(BOARD_SIDE as usize) {
            let line: String = row
                .iter()
                .map(|cell| {
                    cell.and_then(coords::piece_of_slot)
                        .map(|(side, archetype)| archetype.symbol(side))
                        .unwrap_or('.')
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
