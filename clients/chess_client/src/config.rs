//! Client configuration.
//!
//! The defaults target the deployed chess program on devnet. Front ends override individual fields
//! with the `with_*` builders instead of assembling the struct by hand.

use anchor_lang::prelude::*;

use crate::constants::{DEFAULT_COMMITMENT, DEVNET_RPC_URL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Program that owns the board accounts; board addresses are derived against it.
    pub program_id: Pubkey,
    /// RPC endpoint handed to the networking layer.
    pub rpc_url: String,
    /// Commitment level the networking layer waits for before reporting a submit as done.
    pub commitment: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            rpc_url: DEVNET_RPC_URL.to_string(),
            commitment: DEFAULT_COMMITMENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.commitment = commitment.into();
        self
    }
}
