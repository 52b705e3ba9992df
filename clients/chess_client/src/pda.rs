//! Board address derivation and address display helpers.
//!
//! The board PDA is seeded by `b"board"`, the maker key and the seed's little-endian bytes, against
//! the chess program id. The program derives the same address in its account constraints, so any
//! change here breaks every lookup.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anchor_lang::prelude::*;

use crate::constants::BOARD_SEED;
use crate::error::{ClientError, ClientResult};

/// Board PDA and its canonical bump.
pub fn derive_board_address_with_bump(
    maker: &Pubkey,
    seed: u64,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[BOARD_SEED, maker.as_ref(), &seed.to_le_bytes()],
        program_id,
    )
}

pub fn derive_board_address(maker: &Pubkey, seed: u64, program_id: &Pubkey) -> Pubkey {
    derive_board_address_with_bump(maker, seed, program_id).0
}

/// Parse a base58 address pasted by a player.
pub fn parse_address(text: &str) -> ClientResult<Pubkey> {
    let text = text.trim();
    Pubkey::from_str(text).map_err(|_| ClientError::InvalidAddress(text.to_string()))
}

/// Shorten `text` to `front` leading and `back` trailing characters joined by `...`.
pub fn truncate_middle(text: &str, front: usize, back: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= front + back {
        return text.to_string();
    }
    let head: String = chars[..front].iter().collect();
    let tail: String = chars[chars.len() - back..].iter().collect();
    format!("{head}...{tail}")
}

/// Milliseconds since the Unix epoch, used as the seed of a freshly created board.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
