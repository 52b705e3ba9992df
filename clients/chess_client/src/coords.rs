//! Translation between piece slots, on-chain board positions, render squares and algebraic
//! coordinates.
//!
//! - A *piece slot* (0..32) is the fixed identity of a piece for the whole game.
//! - A *board position* (1..=64) is the square a piece occupies on chain: `row * 8 + col + 1`.
//!   [`CAPTURED`] (0) marks a piece that left the board.
//! - A *render square* (0..64) is the top-left-origin display index. The board is drawn
//!   reflected, so `render = 63 - (position - 1)`.
//!
//! Every function here is total: out-of-range input yields `None`, `""` or [`CAPTURED`], never a
//! panic.

use crate::constants::{
    BLACK_BACK_RANK_START, BLACK_PAWNS_START, BLACK_SLOTS_START, BOARD_SIDE, BOARD_SQUARES,
    CAPTURED, PIECE_SLOTS, WHITE_PAWNS_START,
};

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// Archetypes of the back rank, indexed by file.
const BACK_RANK: [Archetype; 8] = [
    Archetype::Rook,
    Archetype::Knight,
    Archetype::Bishop,
    Archetype::Queen,
    Archetype::King,
    Archetype::Bishop,
    Archetype::Knight,
    Archetype::Rook,
];

impl Archetype {
    /// Archetype of a piece slot, derived from its range. `None` only for slots past 31.
    pub fn of_slot(slot: u8) -> Option<Self> {
        match slot {
            0..=7 => Some(BACK_RANK[slot as usize]),
            WHITE_PAWNS_START..=15 => Some(Archetype::Pawn),
            BLACK_PAWNS_START..=23 => Some(Archetype::Pawn),
            BLACK_BACK_RANK_START..=31 => Some(BACK_RANK[(slot - BLACK_BACK_RANK_START) as usize]),
            _ => None,
        }
    }

    /// FEN letter, uppercase for white.
    pub fn symbol(self, side: Side) -> char {
        let symbol = match self {
            Archetype::Pawn => 'p',
            Archetype::Rook => 'r',
            Archetype::Knight => 'n',
            Archetype::Bishop => 'b',
            Archetype::Queen => 'q',
            Archetype::King => 'k',
        };
        match side {
            Side::White => symbol.to_ascii_uppercase(),
            Side::Black => symbol,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The board maker; moves first and owns slots 0..16.
    White,
    /// The guest; owns slots 16..32.
    Black,
}

impl Side {
    pub fn of_slot(slot: u8) -> Option<Self> {
        match slot {
            s if s < BLACK_SLOTS_START => Some(Side::White),
            s if (s as usize) < PIECE_SLOTS => Some(Side::Black),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Slot range owned by this side.
    pub fn slots(self) -> std::ops::Range<u8> {
        match self {
            Side::White => 0..BLACK_SLOTS_START,
            Side::Black => BLACK_SLOTS_START..PIECE_SLOTS as u8,
        }
    }
}

pub fn piece_of_slot(slot: u8) -> Option<(Side, Archetype)> {
    Some((Side::of_slot(slot)?, Archetype::of_slot(slot)?))
}

pub fn is_on_board(position: u8) -> bool {
    (1..=BOARD_SQUARES).contains(&position)
}

/// Zero-based `(row, col)` of a board position.
pub fn row_col_of_position(position: u8) -> Option<(u8, u8)> {
    if !is_on_board(position) {
        return None;
    }
    let index = position - 1;
    Some((index / BOARD_SIDE, index % BOARD_SIDE))
}

pub fn position_of_row_col(row: u8, col: u8) -> Option<u8> {
    if row >= BOARD_SIDE || col >= BOARD_SIDE {
        return None;
    }
    Some(row * BOARD_SIDE + col + 1)
}

/// Algebraic name of a board position as shown next to the rendered board.
///
/// Row 0 is labelled rank 8 (`rank = 8 - row`), so position 1 reads `"a8"`. Captured or
/// out-of-range positions give an empty string.
pub fn square_to_algebraic(position: u8) -> String {
    match row_col_of_position(position) {
        Some((row, col)) => format!("{}{}", FILES[col as usize], BOARD_SIDE - row),
        None => String::new(),
    }
}

/// Board position drawn at a render square, or [`CAPTURED`] for an index past 63.
pub fn render_to_board_position(render_square: u8) -> u8 {
    if render_square >= BOARD_SQUARES {
        return CAPTURED;
    }
    BOARD_SQUARES - render_square
}

/// Render square of a board position. Captured pieces are not drawn.
pub fn board_position_to_render(position: u8) -> Option<u8> {
    if !is_on_board(position) {
        return None;
    }
    Some(BOARD_SQUARES - 1 - (position - 1))
}
