/// Seed prefix of the board PDA, shared with the on-chain program.
pub const BOARD_SEED: &[u8] = b"board";

/// Number of squares; board positions are 1-based (1..=64).
pub const BOARD_SQUARES: u8 = 64;

pub const BOARD_SIDE: u8 = 8;

/// Number of piece slots stored in the account (16 per side).
pub const PIECE_SLOTS: usize = 32;

/// Position value of a slot whose piece has been captured.
pub const CAPTURED: u8 = 0;

/// First slot of the black pieces. Slots below it are white.
pub const BLACK_SLOTS_START: u8 = 16;

pub const WHITE_PAWNS_START: u8 = 8;

pub const BLACK_PAWNS_START: u8 = 16;

/// Offset of the black back rank within the 32 slots (mirrors slots 0..8).
pub const BLACK_BACK_RANK_START: u8 = 24;

pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Starting square of `slot` in the canonical layout.
///
/// White occupies squares 1..=16 (back rank then pawns) and black occupies
/// 49..=64 (pawns then back rank), so the slot order follows the square order
/// within each side.
pub fn starting_position(slot: u8) -> u8 {
    match slot {
        0..=15 => slot + 1,
        16..=31 => slot + 33,
        _ => CAPTURED,
    }
}
