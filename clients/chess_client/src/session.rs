//! A player's view of one game.
//!
//! [`GameSession`] ties the board, the move selector and the remote actions together. All state
//! sits behind `Cell`/`RefCell` so every method takes `&self`: the UI keeps dispatching clicks
//! while a submit future is pending. Borrows are never held across an `.await`.
//!
//! Remote outcomes land in [`ActionStatus`]; no failure leaves the selector anywhere but idle.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;

use anchor_lang::prelude::*;

use crate::board::Board;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::pda;
use crate::remote::{RemoteActions, SubmitGuard};
use crate::selection::{ClickOutcome, MoveSelector, MoveValidator, SelectionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Create,
    Join,
    Move { slot: u8, destination: u8 },
    Resign,
    Close,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fetch => write!(f, "fetch board"),
            Action::Create => write!(f, "create board"),
            Action::Join => write!(f, "join board"),
            Action::Move { slot, destination } => {
                write!(f, "move piece {slot} to {destination}")
            }
            Action::Resign => write!(f, "resign"),
            Action::Close => write!(f, "close board"),
        }
    }
}

/// Last known state of a remote action, shown to the player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionStatus {
    #[default]
    Idle,
    Pending(Action),
    Succeeded(Action),
    /// The wallet refused to sign.
    Declined(Action),
    Failed { action: Action, reason: String },
}

impl ActionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ActionStatus::Pending(_))
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Idle => Ok(()),
            ActionStatus::Pending(action) => match action {
                Action::Fetch => write!(f, "Loading board..."),
                Action::Create => write!(f, "Creating board..."),
                Action::Join => write!(f, "Joining board..."),
                Action::Move { slot, destination } => {
                    write!(f, "Moving piece {slot} to {destination}...")
                }
                Action::Resign => write!(f, "Resigning..."),
                Action::Close => write!(f, "Closing board..."),
            },
            ActionStatus::Succeeded(action) => match action {
                Action::Fetch => write!(f, "Board loaded"),
                Action::Create => write!(f, "Board created successfully"),
                Action::Join => write!(f, "Joined board"),
                Action::Move { .. } => write!(f, "Move successful"),
                Action::Resign => write!(f, "Resigned from game"),
                Action::Close => write!(f, "Board closed successfully"),
            },
            ActionStatus::Declined(action) => write!(f, "Signature declined, did not {action}"),
            ActionStatus::Failed { action, reason } => {
                write!(f, "Could not {action}: {reason}")
            }
        }
    }
}

pub struct GameSession<R, V> {
    remote: R,
    validator: V,
    config: ClientConfig,
    /// Wallet of the local player.
    player: Pubkey,
    address: Cell<Option<Pubkey>>,
    board: RefCell<Board>,
    selector: RefCell<MoveSelector>,
    status: RefCell<ActionStatus>,
    guard: SubmitGuard,
}

impl<R, V> GameSession<R, V>
where
    R: RemoteActions,
    V: MoveValidator,
{
    /// Session for `player` with a local starting board and no address yet.
    pub fn new(remote: R, validator: V, player: Pubkey) -> Self {
        Self {
            remote,
            validator,
            config: ClientConfig::default(),
            player,
            address: Cell::new(None),
            board: RefCell::new(Board::initial(player)),
            selector: RefCell::new(MoveSelector::new()),
            status: RefCell::new(ActionStatus::Idle),
            guard: SubmitGuard::new(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach to an existing board, e.g. an address pasted by the other player.
    pub fn with_address(self, address: Pubkey) -> Self {
        self.address.set(Some(address));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn player(&self) -> Pubkey {
        self.player
    }

    pub fn address(&self) -> Option<Pubkey> {
        self.address.get()
    }

    pub fn board(&self) -> Board {
        self.board.borrow().clone()
    }

    pub fn status(&self) -> ActionStatus {
        self.status.borrow().clone()
    }

    pub fn selection(&self) -> SelectionState {
        self.selector.borrow().state()
    }

    pub fn selected_slot(&self) -> Option<u8> {
        self.selector.borrow().selected_slot()
    }

    /// A submit is in flight; further submits are rejected until it resolves.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn is_my_turn(&self) -> bool {
        let board = self.board.borrow();
        board.is_active() && board.is_turn_of(&self.player)
    }

    /// Turn indicator shown above the board.
    pub fn turn_message(&self) -> &'static str {
        if !self.board.borrow().is_active() {
            "Board is inactive."
        } else if self.is_my_turn() {
            "It's your turn."
        } else {
            "It's the opponent turn."
        }
    }

    /// Question to show while a proposal awaits confirmation.
    pub fn confirmation_prompt(&self) -> Option<String> {
        let proposal = self.selector.borrow().pending()?;
        Some(proposal.prompt(&self.board.borrow()))
    }

    pub fn click(&self, render_square: u8) -> ClickOutcome {
        let board = self.board.borrow();
        self.selector
            .borrow_mut()
            .click(&board, render_square, &self.validator)
    }

    pub fn cancel_move(&self) {
        self.selector.borrow_mut().cancel();
    }

    /// Confirm the pending proposal and return the submit to drive.
    ///
    /// The proposal is copied out and the selector is idle before this returns, so clicks made
    /// while the future runs start a fresh selection. `None` when nothing was pending.
    pub fn confirm_move(&self) -> Option<impl Future<Output = ActionStatus> + '_> {
        let proposal = self.selector.borrow_mut().confirm()?;
        let in_flight = self.guard.try_begin();

        Some(async move {
            let action = Action::Move {
                slot: proposal.slot,
                destination: proposal.destination,
            };
            let _in_flight = match in_flight {
                Ok(token) => token,
                Err(err) => return self.reject(action, err),
            };
            let address = match self.require_address() {
                Ok(address) => address,
                Err(err) => return self.settle(action, Err(err)),
            };

            self.set_status(ActionStatus::Pending(action));
            msg!(
                "Submitting move of piece {} to {} on board {}",
                proposal.slot,
                proposal.destination,
                address
            );
            let outcome = self
                .remote
                .submit_move(&self.player, &address, proposal.slot, proposal.destination)
                .await;
            let accepted = matches!(outcome, Ok(true));
            let status = self.settle(action, outcome);
            if !accepted {
                return status;
            }

            let patched = self
                .board
                .borrow()
                .apply_local_move(proposal.slot, proposal.destination);
            *self.board.borrow_mut() = patched;
            self.resync(&address, status).await
        })
    }

    /// Create a board owned by the local player and attach the session to it.
    pub async fn create_board(&self, seed: u64, guest: Option<Pubkey>) -> ActionStatus {
        let action = Action::Create;
        let _in_flight = match self.guard.try_begin() {
            Ok(token) => token,
            Err(err) => return self.reject(action, err),
        };

        self.set_status(ActionStatus::Pending(action));
        let expected = pda::derive_board_address(&self.player, seed, &self.config.program_id);
        msg!("Creating board {} with seed {}", expected, seed);
        let outcome = self
            .remote
            .create_board(&self.player, seed, guest)
            .await
            .and_then(|created| {
                if created.address != expected {
                    return Err(ClientError::AddressMismatch {
                        expected,
                        actual: created.address,
                    });
                }
                Ok(created.accepted)
            });

        if matches!(outcome, Ok(true)) {
            let mut board = Board::initial(self.player);
            board.guest = guest;
            *self.board.borrow_mut() = board;
            self.address.set(Some(expected));
            self.selector.borrow_mut().cancel();
        }
        self.settle(action, outcome)
    }

    /// Seat `guest` as black. The maker signs.
    ///
    /// The account is loaded first so the maker comes from the chain, not from a local board that
    /// has never been refreshed.
    pub async fn join(&self, guest: Pubkey) -> ActionStatus {
        let action = Action::Join;
        let _in_flight = match self.guard.try_begin() {
            Ok(token) => token,
            Err(err) => return self.reject(action, err),
        };
        let address = match self.require_address() {
            Ok(address) => address,
            Err(err) => return self.settle(action, Err(err)),
        };

        self.set_status(ActionStatus::Pending(action));
        if let Err(err) = self.load(&address).await {
            return self.settle(action, Err(err));
        }
        let maker = self.board.borrow().maker;
        msg!("Joining {} to board {}", guest, address);
        let outcome = self.remote.join_board(&maker, &guest, &address).await;
        let accepted = matches!(outcome, Ok(true));
        let status = self.settle(action, outcome);
        if !accepted {
            return status;
        }
        self.board.borrow_mut().guest = Some(guest);
        self.resync(&address, status).await
    }

    pub async fn resign(&self) -> ActionStatus {
        let action = Action::Resign;
        let _in_flight = match self.guard.try_begin() {
            Ok(token) => token,
            Err(err) => return self.reject(action, err),
        };
        let address = match self.require_address() {
            Ok(address) => address,
            Err(err) => return self.settle(action, Err(err)),
        };

        self.set_status(ActionStatus::Pending(action));
        msg!("Resigning from board {}", address);
        let outcome = self.remote.resign(&self.player, &address).await;
        let accepted = matches!(outcome, Ok(true));
        let status = self.settle(action, outcome);
        if !accepted {
            return status;
        }
        self.board.borrow_mut().game_over = true;
        self.resync(&address, status).await
    }

    /// Close the board account and reclaim its rent. Only the maker may close.
    pub async fn close(&self) -> ActionStatus {
        let action = Action::Close;
        let _in_flight = match self.guard.try_begin() {
            Ok(token) => token,
            Err(err) => return self.reject(action, err),
        };
        let address = match self.require_address() {
            Ok(address) => address,
            Err(err) => return self.settle(action, Err(err)),
        };
        if self.board.borrow().maker != self.player {
            return self.settle(
                action,
                Err(ClientError::InvalidLocalState("only the maker can close the board")),
            );
        }

        self.set_status(ActionStatus::Pending(action));
        msg!("Closing board {}", address);
        let outcome = self.remote.close_board(&self.player, &address).await;
        if matches!(outcome, Ok(true)) {
            self.address.set(None);
        }
        self.settle(action, outcome)
    }

    /// Replace the local board with the account's current contents.
    pub async fn refresh(&self) -> ActionStatus {
        let action = Action::Fetch;
        let address = match self.require_address() {
            Ok(address) => address,
            Err(err) => return self.settle(action, Err(err)),
        };

        self.set_status(ActionStatus::Pending(action));
        match self.load(&address).await {
            Ok(()) => self.set_status(ActionStatus::Succeeded(action)),
            Err(err) => self.settle(action, Err(err)),
        }
    }

    async fn load(&self, address: &Pubkey) -> ClientResult<()> {
        let board = self.remote.fetch_board(address).await?;
        *self.board.borrow_mut() = board;
        Ok(())
    }

    /// Re-fetch after an accepted submit. Keeps `status` unless the fetch fails.
    async fn resync(&self, address: &Pubkey, status: ActionStatus) -> ActionStatus {
        match self.load(address).await {
            Ok(()) => status,
            Err(err) => self.settle(Action::Fetch, Err(err)),
        }
    }

    fn require_address(&self) -> ClientResult<Pubkey> {
        self.address
            .get()
            .ok_or(ClientError::InvalidLocalState("no board address"))
    }

    fn set_status(&self, status: ActionStatus) -> ActionStatus {
        *self.status.borrow_mut() = status.clone();
        status
    }

    /// Record how a remote action ended.
    fn settle(&self, action: Action, outcome: ClientResult<bool>) -> ActionStatus {
        let status = match outcome {
            Ok(true) => {
                msg!("{} succeeded", action);
                ActionStatus::Succeeded(action)
            }
            Ok(false) | Err(ClientError::UserDeclinedSignature) => {
                msg!("{} declined by wallet", action);
                ActionStatus::Declined(action)
            }
            Err(err) => {
                msg!("{} failed: {}", action, err);
                ActionStatus::Failed {
                    action,
                    reason: err.to_string(),
                }
            }
        };
        self.set_status(status)
    }

    /// Refuse a submit without touching the status of the one in flight.
    fn reject(&self, action: Action, err: ClientError) -> ActionStatus {
        msg!("Rejected {}: {}", action, err);
        ActionStatus::Failed {
            action,
            reason: err.to_string(),
        }
    }
}
