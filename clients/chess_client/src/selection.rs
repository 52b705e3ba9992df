//! Click-to-move selection.
//!
//! Two clicks make a move: the first picks a piece, the second a destination. A legal destination
//! turns into a [`MoveProposal`] that waits for the player to confirm or cancel.
//!
//! ```text
//! Idle --click on piece--> PieceSelected --click on legal square--> ProposalPending
//!  ^                          |  same square / illegal square           |
//!  +--------------------------+<-------------- confirm / cancel --------+
//! ```

use crate::board::Board;
use crate::coords;

/// Legality hook consulted before a destination becomes a proposal.
pub trait MoveValidator {
    fn is_legal(&self, board: &Board, slot: u8, destination: u8) -> bool;
}

/// Accepts every destination and leaves enforcement to the program.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl MoveValidator for AcceptAll {
    fn is_legal(&self, _board: &Board, _slot: u8, _destination: u8) -> bool {
        true
    }
}

impl<F> MoveValidator for F
where
    F: Fn(&Board, u8, u8) -> bool,
{
    fn is_legal(&self, board: &Board, slot: u8, destination: u8) -> bool {
        self(board, slot, destination)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveProposal {
    pub slot: u8,
    /// Board position (1..=64).
    pub destination: u8,
}

impl MoveProposal {
    /// Confirmation question shown before the move is submitted.
    pub fn prompt(&self, board: &Board) -> String {
        let from = board.position_of(self.slot).unwrap_or_default();
        format!(
            "Are you sure you want to move the piece from {} to {}?",
            coords::square_to_algebraic(from),
            coords::square_to_algebraic(self.destination)
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    PieceSelected {
        slot: u8,
    },
    ProposalPending(MoveProposal),
}

/// What a click did, for the UI to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing changed: empty square with nothing selected, or a proposal is awaiting an answer.
    Ignored,
    Selected(u8),
    Deselected,
    /// The validator refused the destination; the selection is dropped.
    Rejected,
    ConfirmationRequested(MoveProposal),
}

#[derive(Clone, Debug, Default)]
pub struct MoveSelector {
    state: SelectionState,
}

impl MoveSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Slot to highlight, while a piece is selected.
    pub fn selected_slot(&self) -> Option<u8> {
        match self.state {
            SelectionState::PieceSelected { slot } => Some(slot),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<MoveProposal> {
        match self.state {
            SelectionState::ProposalPending(proposal) => Some(proposal),
            _ => None,
        }
    }

    /// Handle a click on `render_square` (0..64, display order).
    pub fn click<V>(&mut self, board: &Board, render_square: u8, validator: &V) -> ClickOutcome
    where
        V: MoveValidator + ?Sized,
    {
        let position = coords::render_to_board_position(render_square);
        let occupant = board.slot_at(position);

        match self.state {
            SelectionState::Idle => match occupant {
                Some(slot) => {
                    self.state = SelectionState::PieceSelected { slot };
                    ClickOutcome::Selected(slot)
                }
                None => ClickOutcome::Ignored,
            },
            SelectionState::PieceSelected { slot } => {
                if occupant == Some(slot) {
                    self.state = SelectionState::Idle;
                    return ClickOutcome::Deselected;
                }
                if !coords::is_on_board(position) || !validator.is_legal(board, slot, position) {
                    self.state = SelectionState::Idle;
                    return ClickOutcome::Rejected;
                }
                let proposal = MoveProposal {
                    slot,
                    destination: position,
                };
                self.state = SelectionState::ProposalPending(proposal);
                ClickOutcome::ConfirmationRequested(proposal)
            }
            SelectionState::ProposalPending(_) => ClickOutcome::Ignored,
        }
    }

    /// Take the pending proposal by value and return to idle.
    ///
    /// `None` when nothing is pending; the call is then a no-op.
    pub fn confirm(&mut self) -> Option<MoveProposal> {
        let proposal = self.pending();
        if proposal.is_some() {
            self.state = SelectionState::Idle;
        }
        proposal
    }

    /// Drop any selection or proposal.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }
}
