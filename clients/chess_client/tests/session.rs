use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anchor_lang::prelude::*;
use chess_client::coords::board_position_to_render;
use chess_client::{
    derive_board_address, AcceptAll, Action, ActionStatus, Board, BoardAccount, BoardSummary,
    ChessError, ClickOutcome, ClientConfig, ClientError, ClientResult, CreatedBoard, GameSession,
    MoveProposal, RemoteActions, SelectionState,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Answer {
    Accept,
    Decline,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create(u64),
    /// Maker, then guest.
    Join(Pubkey, Pubkey),
    Move(u8, u8),
    Resign(Pubkey),
    Close,
}

/// In-memory chain holding board accounts by address.
struct MemoryChain {
    accounts: RefCell<HashMap<Pubkey, BoardAccount>>,
    /// Accounts owned by the program that are not boards.
    foreign: RefCell<Vec<(Pubkey, Vec<u8>)>>,
    calls: RefCell<Vec<Call>>,
    answer: Cell<Answer>,
}

impl MemoryChain {
    fn new() -> Self {
        Self {
            accounts: RefCell::new(HashMap::new()),
            foreign: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            answer: Cell::new(Answer::Accept),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Record the call and decide whether it lands.
    fn submit(&self, call: Call) -> ClientResult<bool> {
        self.calls.borrow_mut().push(call);
        match self.answer.get() {
            Answer::Accept => Ok(true),
            Answer::Decline => Ok(false),
            Answer::Reject => Err(ClientError::from_program_code(6000)),
        }
    }
}

impl RemoteActions for &MemoryChain {
    async fn fetch_board_data(&self, address: &Pubkey) -> ClientResult<Vec<u8>> {
        let accounts = self.accounts.borrow();
        let account = accounts.get(address).ok_or(ClientError::NotFound(*address))?;
        serialize(account)
    }

    async fn fetch_all_board_data(&self) -> ClientResult<Vec<(Pubkey, Vec<u8>)>> {
        let mut all = Vec::new();
        for (address, account) in self.accounts.borrow().iter() {
            all.push((*address, serialize(account)?));
        }
        all.extend(self.foreign.borrow().iter().cloned());
        Ok(all)
    }

    async fn create_board(
        &self,
        maker: &Pubkey,
        seed: u64,
        guest: Option<Pubkey>,
    ) -> ClientResult<CreatedBoard> {
        let address = derive_board_address(maker, seed, &chess_client::ID);
        let accepted = self.submit(Call::Create(seed))?;
        if accepted {
            let board = Board::initial(*maker);
            self.accounts.borrow_mut().insert(
                address,
                BoardAccount {
                    is_white_turn: true,
                    bump: 255,
                    seed,
                    maker: *maker,
                    guest,
                    state: board.positions,
                    game_over: false,
                },
            );
        }
        Ok(CreatedBoard { address, accepted })
    }

    async fn join_board(
        &self,
        maker: &Pubkey,
        guest: &Pubkey,
        address: &Pubkey,
    ) -> ClientResult<bool> {
        let accepted = self.submit(Call::Join(*maker, *guest))?;
        if accepted {
            if let Some(account) = self.accounts.borrow_mut().get_mut(address) {
                account.guest = Some(*guest);
            }
        }
        Ok(accepted)
    }

    async fn submit_move(
        &self,
        _player: &Pubkey,
        address: &Pubkey,
        slot: u8,
        destination: u8,
    ) -> ClientResult<bool> {
        let accepted = self.submit(Call::Move(slot, destination))?;
        if accepted {
            if let Some(account) = self.accounts.borrow_mut().get_mut(address) {
                account.state[slot as usize] = destination;
                account.is_white_turn = !account.is_white_turn;
            }
        }
        Ok(accepted)
    }

    async fn resign(&self, player: &Pubkey, address: &Pubkey) -> ClientResult<bool> {
        let accepted = self.submit(Call::Resign(*player))?;
        if accepted {
            if let Some(account) = self.accounts.borrow_mut().get_mut(address) {
                account.game_over = true;
            }
        }
        Ok(accepted)
    }

    async fn close_board(&self, _maker: &Pubkey, address: &Pubkey) -> ClientResult<bool> {
        let accepted = self.submit(Call::Close)?;
        if accepted {
            self.accounts.borrow_mut().remove(address);
        }
        Ok(accepted)
    }
}

fn serialize(account: &BoardAccount) -> ClientResult<Vec<u8>> {
    let mut data = Vec::new();
    account
        .try_serialize(&mut data)
        .map_err(|err| ClientError::Transport(err.to_string()))?;
    Ok(data)
}

fn maker() -> Pubkey {
    Pubkey::new_from_array([1; 32])
}

fn guest() -> Pubkey {
    Pubkey::new_from_array([2; 32])
}

fn render(position: u8) -> u8 {
    board_position_to_render(position).unwrap()
}

async fn seated_session(chain: &MemoryChain) -> GameSession<&MemoryChain, AcceptAll> {
    let session = GameSession::new(chain, AcceptAll, maker());
    assert_eq!(
        session.create_board(42, None).await,
        ActionStatus::Succeeded(Action::Create)
    );
    assert_eq!(
        session.join(guest()).await,
        ActionStatus::Succeeded(Action::Join)
    );
    session
}

#[tokio::test]
async fn create_attaches_to_the_derived_address() {
    let chain = MemoryChain::new();
    let session = GameSession::new(&chain, AcceptAll, maker());
    assert_eq!(session.address(), None);

    let status = session.create_board(42, None).await;
    assert_eq!(status, ActionStatus::Succeeded(Action::Create));
    assert_eq!(status.to_string(), "Board created successfully");
    assert_eq!(
        session.address(),
        Some(derive_board_address(&maker(), 42, &chess_client::ID))
    );
    assert_eq!(session.board(), Board::initial(maker()));
    assert!(!session.is_my_turn());
}

#[tokio::test]
async fn declined_create_leaves_session_detached() {
    let chain = MemoryChain::new();
    chain.answer.set(Answer::Decline);
    let session = GameSession::new(&chain, AcceptAll, maker());

    let status = session.create_board(42, None).await;
    assert_eq!(status, ActionStatus::Declined(Action::Create));
    assert_eq!(session.address(), None);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn confirmed_move_is_submitted_and_refetched() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    assert!(session.is_my_turn());

    assert_eq!(session.click(render(9)), ClickOutcome::Selected(8));
    assert_eq!(
        session.click(render(17)),
        ClickOutcome::ConfirmationRequested(MoveProposal {
            slot: 8,
            destination: 17
        })
    );
    assert_eq!(
        session.confirmation_prompt().as_deref(),
        Some("Are you sure you want to move the piece from a7 to a6?")
    );

    let submit = session.confirm_move().expect("proposal pending");
    assert_eq!(session.selection(), SelectionState::Idle);
    let status = submit.await;

    assert_eq!(
        status,
        ActionStatus::Succeeded(Action::Move {
            slot: 8,
            destination: 17
        })
    );
    assert_eq!(chain.calls().last(), Some(&Call::Move(8, 17)));
    let board = session.board();
    assert_eq!(board.positions[8], 17);
    assert!(!board.is_white_turn);
    assert_eq!(board.guest, Some(guest()));
    assert!(!session.is_my_turn());
}

#[tokio::test]
async fn confirm_without_proposal_is_a_no_op() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    assert!(session.confirm_move().is_none());
    session.click(render(9));
    assert!(session.confirm_move().is_none());
    assert_eq!(session.selected_slot(), Some(8));
    assert_eq!(chain.calls().len(), 2);
}

#[tokio::test]
async fn cancel_never_reaches_the_chain() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    session.click(render(9));
    session.click(render(17));
    session.cancel_move();
    assert_eq!(session.selection(), SelectionState::Idle);
    assert!(session.confirm_move().is_none());
    assert!(!chain.calls().iter().any(|call| matches!(call, Call::Move(..))));
}

#[tokio::test]
async fn in_flight_move_keeps_its_values_and_blocks_other_submits() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;

    session.click(render(9));
    session.click(render(17));
    let first = session.confirm_move().unwrap();
    assert!(session.is_busy());

    // New selections are allowed while the move is in flight.
    assert_eq!(session.click(render(10)), ClickOutcome::Selected(9));
    assert!(matches!(
        session.click(render(18)),
        ClickOutcome::ConfirmationRequested(_)
    ));
    let second = session.confirm_move().unwrap().await;
    assert!(matches!(
        second,
        ActionStatus::Failed {
            action: Action::Move {
                slot: 9,
                destination: 18
            },
            ..
        }
    ));

    let resign = session.resign().await;
    assert!(matches!(
        resign,
        ActionStatus::Failed {
            action: Action::Resign,
            ..
        }
    ));

    let status = first.await;
    assert_eq!(
        status,
        ActionStatus::Succeeded(Action::Move {
            slot: 8,
            destination: 17
        })
    );
    assert_eq!(session.status(), status);
    assert!(!session.is_busy());
    let moves: Vec<_> = chain
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Move(..) | Call::Resign(_)))
        .collect();
    assert_eq!(moves, vec![Call::Move(8, 17)]);
}

#[tokio::test]
async fn program_rejection_is_reported_and_selector_stays_idle() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    chain.answer.set(Answer::Reject);

    session.click(render(9));
    session.click(render(17));
    let status = session.confirm_move().unwrap().await;

    assert_eq!(
        status,
        ActionStatus::Failed {
            action: Action::Move {
                slot: 8,
                destination: 17
            },
            reason: ClientError::Program(ChessError::InvalidMove).to_string(),
        }
    );
    assert_eq!(session.selection(), SelectionState::Idle);
    assert_eq!(session.board().positions[8], 9);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn declined_move_leaves_board_untouched() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    chain.answer.set(Answer::Decline);

    session.click(render(9));
    session.click(render(25));
    let status = session.confirm_move().unwrap().await;

    assert_eq!(
        status,
        ActionStatus::Declined(Action::Move {
            slot: 8,
            destination: 25
        })
    );
    assert!(session.board().is_white_turn);
}

#[tokio::test]
async fn refresh_of_missing_board_reports_no_such_game() {
    let chain = MemoryChain::new();
    let address = Pubkey::new_from_array([9; 32]);
    let session = GameSession::new(&chain, AcceptAll, guest()).with_address(address);

    let status = session.refresh().await;
    assert_eq!(
        status,
        ActionStatus::Failed {
            action: Action::Fetch,
            reason: format!("no such game: {address}"),
        }
    );
}

#[tokio::test]
async fn refresh_replaces_the_board_wholesale() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    let address = session.address().unwrap();

    // The opponent's session sees the maker's move after a refresh.
    let other = GameSession::new(&chain, AcceptAll, guest()).with_address(address);
    assert!(!other.is_my_turn());

    session.click(render(13));
    session.click(render(29));
    session.confirm_move().unwrap().await;

    assert_eq!(other.refresh().await, ActionStatus::Succeeded(Action::Fetch));
    let board = other.board();
    assert_eq!(board.maker, maker());
    assert_eq!(board.positions[12], 29);
    assert!(other.is_my_turn());
}

#[tokio::test]
async fn resign_ends_the_game() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;

    assert_eq!(session.resign().await, ActionStatus::Succeeded(Action::Resign));
    assert!(session.board().game_over);
    assert!(!session.is_my_turn());
    assert_eq!(chain.calls().last(), Some(&Call::Resign(maker())));
}

#[tokio::test]
async fn only_the_maker_closes() {
    let chain = MemoryChain::new();
    let session = seated_session(&chain).await;
    let address = session.address().unwrap();

    let other = GameSession::new(&chain, AcceptAll, guest()).with_address(address);
    other.refresh().await;
    let status = other.close().await;
    assert!(matches!(
        status,
        ActionStatus::Failed {
            action: Action::Close,
            ..
        }
    ));
    assert!(!chain.calls().contains(&Call::Close));

    assert_eq!(session.close().await, ActionStatus::Succeeded(Action::Close));
    assert_eq!(session.address(), None);
    assert!(matches!(
        other.refresh().await,
        ActionStatus::Failed {
            action: Action::Fetch,
            ..
        }
    ));
}

#[tokio::test]
async fn submits_without_address_fail_locally() {
    let chain = MemoryChain::new();
    let session = GameSession::new(&chain, AcceptAll, maker());

    assert_eq!(
        session.join(guest()).await,
        ActionStatus::Failed {
            action: Action::Join,
            reason: "invalid local state: no board address".to_string(),
        }
    );
    assert!(chain.calls().is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn rejecting_validator_keeps_the_session_idle() {
    let chain = MemoryChain::new();
    let session = GameSession::new(&chain, |_: &Board, _: u8, _: u8| false, maker());
    session.create_board(1, Some(guest())).await;

    assert_eq!(session.click(render(9)), ClickOutcome::Selected(8));
    assert_eq!(session.click(render(17)), ClickOutcome::Rejected);
    assert_eq!(session.selection(), SelectionState::Idle);
    assert!(session.confirm_move().is_none());
}

#[tokio::test]
async fn remote_deriving_against_another_program_is_refused() {
    let chain = MemoryChain::new();
    let config = ClientConfig::default().with_program_id(Pubkey::new_from_array([9; 32]));
    let session = GameSession::new(&chain, AcceptAll, maker()).with_config(config);

    let status = session.create_board(42, None).await;
    assert!(matches!(
        status,
        ActionStatus::Failed {
            action: Action::Create,
            ref reason,
        } if reason.starts_with("board address mismatch")
    ));
    assert_eq!(session.address(), None);
}

#[tokio::test]
async fn turn_message_follows_the_board() {
    let chain = MemoryChain::new();
    let session = GameSession::new(&chain, AcceptAll, maker());
    session.create_board(42, None).await;
    assert_eq!(session.turn_message(), "Board is inactive.");

    session.join(guest()).await;
    assert_eq!(session.turn_message(), "It's your turn.");

    let address = session.address().unwrap();
    let other = GameSession::new(&chain, AcceptAll, guest()).with_address(address);
    other.refresh().await;
    assert_eq!(other.turn_message(), "It's the opponent turn.");

    session.resign().await;
    assert_eq!(session.turn_message(), "Board is inactive.");
}

#[tokio::test]
async fn join_from_an_unrefreshed_session_names_the_real_maker() {
    let chain = MemoryChain::new();
    let owner = GameSession::new(&chain, AcceptAll, maker());
    owner.create_board(42, None).await;
    let address = owner.address().unwrap();

    let visitor = GameSession::new(&chain, AcceptAll, guest()).with_address(address);
    assert_eq!(visitor.board().maker, guest());

    let status = visitor.join(guest()).await;
    assert_eq!(status, ActionStatus::Succeeded(Action::Join));
    assert_eq!(chain.calls().last(), Some(&Call::Join(maker(), guest())));
    assert_eq!(visitor.board().maker, maker());
    assert_eq!(visitor.board().guest, Some(guest()));
}

#[tokio::test]
async fn join_of_missing_board_never_submits() {
    let chain = MemoryChain::new();
    let address = Pubkey::new_from_array([9; 32]);
    let session = GameSession::new(&chain, AcceptAll, guest()).with_address(address);

    assert_eq!(
        session.join(guest()).await,
        ActionStatus::Failed {
            action: Action::Join,
            reason: format!("no such game: {address}"),
        }
    );
    assert!(chain.calls().is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn lobby_lists_boards_and_skips_foreign_accounts() {
    let chain = MemoryChain::new();
    let session = GameSession::new(&chain, AcceptAll, maker());
    session.create_board(1, None).await;
    let open = session.address().unwrap();
    session.create_board(2, None).await;
    session.join(guest()).await;
    let joined = session.address().unwrap();
    chain
        .foreign
        .borrow_mut()
        .push((Pubkey::new_from_array([8; 32]), vec![9; 40]));

    let mut boards = (&chain).list_boards().await.unwrap();
    boards.sort_by_key(|summary| summary.address != open);
    assert_eq!(
        boards,
        vec![
            BoardSummary {
                address: open,
                white: maker(),
                black: None,
                game_over: false,
            },
            BoardSummary {
                address: joined,
                white: maker(),
                black: Some(guest()),
                game_over: false,
            },
        ]
    );
    assert!(boards[0].is_open());
    assert!(boards[0].to_string().ends_with("Black: Open"));
    assert!(!boards[1].is_open());
}
