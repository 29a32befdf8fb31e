//! Game session: turn handling and the background computer player
//!
//! All game state lives behind one mutex. Human moves are validated and
//! applied on the caller's thread; the computer's move is searched on a
//! worker thread that takes the lock once per top-level probe, so a
//! snapshot never shows a half-probed board.
//!
//! Notifications are queued under the lock in the order the state changed
//! and delivered after it is released by one thread at a time. A thread that
//! finds delivery already under way leaves its notifications to that thread.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::{debug, error, info, instrument, warn};

use crate::board::{Board, Player, Pos};
use crate::engine::{AiEngine, AiLevel, MoveResult};
use crate::error::{InvalidMove, SearchAborted};
use crate::rules::{detect, find_five_at, Outcome};
use crate::search::{BoardLease, CancelToken};

use super::events::{SessionEvent, SessionObserver};
use super::state::{GameMode, Scores, SessionState, Snapshot, COMPUTER};

/// Queued for delivery
enum Notice {
    Event(SessionEvent),
    /// Release the search slot once everything before it was delivered
    SearchDone(CancelToken),
}

struct Inner {
    board: Board,
    game: Option<SessionState>,
    scores: Scores,
    /// Starting player of the next game
    next_first: Player,
    /// Token of the outstanding search; its worker clears the slot
    search: Option<CancelToken>,
    last_search: Option<MoveResult>,
    pending: VecDeque<Notice>,
    /// Some thread is draining `pending`
    delivering: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    idle: Condvar,
    engine: Mutex<AiEngine>,
    observer: Arc<dyn SessionObserver>,
}

/// Handle to a game session. Clones share the same session.
#[derive(Clone)]
pub struct GameSession {
    shared: Arc<Shared>,
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // Every critical section leaves the state consistent
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lends the session board to the search, one lock per call.
struct SessionLease<'a> {
    inner: &'a Mutex<Inner>,
}

impl BoardLease for SessionLease<'_> {
    fn with_board<R>(&mut self, f: impl FnOnce(&mut Board) -> R) -> R {
        let mut inner = lock_inner(self.inner);
        f(&mut inner.board)
    }
}

impl Inner {
    fn validate(&self, player: Player, pos: Pos) -> Result<(), InvalidMove> {
        if !pos.in_bounds() {
            return Err(InvalidMove::OutOfBounds(pos));
        }
        let game = match self.game {
            Some(game) if game.outcome == Outcome::InProgress => game,
            _ => return Err(InvalidMove::NotInProgress),
        };
        if self.search.is_some() {
            return Err(InvalidMove::SearchInFlight);
        }
        if game.mode.computer() == Some(player) {
            return Err(InvalidMove::ComputerTurn(player));
        }
        if player != game.current_player {
            return Err(InvalidMove::WrongTurn {
                attempted: player,
                expected: game.current_player,
            });
        }
        if !self.board.is_empty(pos) {
            return Err(InvalidMove::Occupied(pos));
        }
        Ok(())
    }

    fn queue(&mut self, events: impl IntoIterator<Item = SessionEvent>) {
        self.pending.extend(events.into_iter().map(Notice::Event));
    }

    /// Place a validated move and settle the outcome.
    fn apply(&mut self, player: Player, pos: Pos) -> Vec<SessionEvent> {
        let mut events = Vec::with_capacity(3);
        let Some(game) = self.game.as_mut() else {
            return events;
        };

        self.board.place(pos, player);
        game.move_count += 1;
        events.push(SessionEvent::CellChanged {
            pos,
            cell: player.cell(),
        });
        debug!(%player, %pos, moves = game.move_count, "move applied");

        match detect(&self.board) {
            outcome @ Outcome::Won { winner, line } => {
                debug_assert!(find_five_at(&self.board, pos, player).is_some());
                game.outcome = outcome;
                self.scores.record_win(winner);
                info!(%winner, moves = game.move_count, "game won");
                events.push(SessionEvent::GameEnded {
                    outcome,
                    line: Some(line),
                });
                events.push(SessionEvent::ScoresChanged(self.scores));
            }
            Outcome::Draw => {
                game.outcome = Outcome::Draw;
                info!(moves = game.move_count, "game drawn");
                events.push(SessionEvent::GameEnded {
                    outcome: Outcome::Draw,
                    line: None,
                });
            }
            Outcome::InProgress | Outcome::Abandoned => {
                game.current_player = player.opponent();
                events.push(SessionEvent::TurnChanged(game.current_player));
            }
        }
        events
    }

    /// The computer found nothing to play.
    fn resolve_no_move(&mut self) -> Vec<SessionEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        game.outcome = Outcome::Draw;
        info!(moves = game.move_count, "no move left, game drawn");
        vec![SessionEvent::GameEnded {
            outcome: Outcome::Draw,
            line: None,
        }]
    }

    /// Claim the search slot when the computer is to move.
    fn launch_search(&mut self) -> Option<(CancelToken, AiLevel)> {
        let game = self.game?;
        if !game.is_computer_turn() || self.search.is_some() {
            return None;
        }
        let token = CancelToken::new();
        self.search = Some(token.clone());
        Some((token, game.level))
    }

    fn owns_search(&self, token: &CancelToken) -> bool {
        self.search.as_ref().is_some_and(|t| t.same_as(token))
    }
}

impl GameSession {
    /// Session with an entropy-seeded engine; X starts the first game.
    pub fn new(observer: Arc<dyn SessionObserver>) -> Self {
        Self::with_engine(observer, AiEngine::new(), Player::X)
    }

    /// Session with a given engine and first starting player
    pub fn with_engine(observer: Arc<dyn SessionObserver>, engine: AiEngine, first_player: Player) -> Self {
        let inner = Inner {
            board: Board::new(),
            game: None,
            scores: Scores::default(),
            next_first: first_player,
            search: None,
            last_search: None,
            pending: VecDeque::new(),
            delivering: false,
        };
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                idle: Condvar::new(),
                engine: Mutex::new(engine),
                observer,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.shared.inner)
    }

    /// Release the lock and drain the queue, unless another thread already is.
    fn deliver<'a>(&'a self, mut inner: MutexGuard<'a, Inner>) {
        if inner.delivering {
            return;
        }
        inner.delivering = true;
        loop {
            let batch = std::mem::take(&mut inner.pending);
            if batch.is_empty() {
                break;
            }
            drop(inner);
            for notice in batch {
                match notice {
                    Notice::Event(event) => event.dispatch(self.shared.observer.as_ref()),
                    Notice::SearchDone(token) => self.release_search(&token),
                }
            }
            inner = self.lock();
        }
        inner.delivering = false;
    }

    fn release_search(&self, token: &CancelToken) {
        let mut inner = self.lock();
        if inner.owns_search(token) {
            inner.search = None;
        }
        drop(inner);
        self.shared.idle.notify_all();
    }

    /// Start a new game, abandoning whatever was going on.
    ///
    /// The board is cleared without per-cell notifications; observers redraw
    /// from [`snapshot`](Self::snapshot) on `TurnChanged`. Anything a
    /// previous search still had to report is delivered before it.
    #[instrument(skip(self))]
    pub fn start_game(&self, mode: GameMode, level: AiLevel) {
        let mut inner = self.lock();
        if let Some(token) = inner.search.take() {
            debug!("cancelling search of the previous game");
            token.cancel();
            self.shared.idle.notify_all();
        }
        inner.board.clear();
        inner.last_search = None;
        let first = inner.next_first;
        inner.next_first = first.opponent();
        inner.game = Some(SessionState::new(mode, level, first));
        inner.queue([SessionEvent::TurnChanged(first)]);
        let launch = inner.launch_search();
        info!(%first, "game started");

        self.deliver(inner);
        if let Some((token, level)) = launch {
            self.spawn_search(token, level);
        }
    }

    /// Play `player`'s stone at `pos`.
    ///
    /// On success the move is on the board and its notifications are queued
    /// behind everything raised before it. If the computer is now to move its
    /// search has been launched.
    #[instrument(level = "debug", skip(self))]
    pub fn submit_move(&self, player: Player, pos: Pos) -> Result<(), InvalidMove> {
        let mut inner = self.lock();
        if let Err(err) = inner.validate(player, pos) {
            warn!(%err, "move rejected");
            return Err(err);
        }
        let events = inner.apply(player, pos);
        inner.queue(events);
        let launch = inner.launch_search();

        self.deliver(inner);
        if let Some((token, level)) = launch {
            self.spawn_search(token, level);
        }
        Ok(())
    }

    /// Stop the current game. A running search is cancelled and its result
    /// dropped; finished games keep their outcome.
    #[instrument(skip(self))]
    pub fn cancel_game(&self) {
        let mut inner = self.lock();
        if let Some(token) = &inner.search {
            token.cancel();
        }
        if let Some(game) = inner.game.as_mut() {
            if game.outcome == Outcome::InProgress {
                game.outcome = Outcome::Abandoned;
                info!(moves = game.move_count, "game abandoned");
            }
        }
    }

    pub fn reset_scores(&self) {
        let mut inner = self.lock();
        inner.scores = Scores::default();
        let scores = inner.scores;
        inner.queue([SessionEvent::ScoresChanged(scores)]);
        info!("scores reset");
        self.deliver(inner);
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            board: inner.board,
            game: inner.game,
            scores: inner.scores,
            searching: inner.search.is_some(),
            last_search: inner.last_search,
        }
    }

    /// Block until no search is outstanding.
    ///
    /// Must not be called from an observer callback: the search slot is
    /// released by notification delivery.
    pub fn wait_idle(&self) {
        let mut inner = self.lock();
        while inner.search.is_some() {
            inner = self
                .shared
                .idle
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn spawn_search(&self, token: CancelToken, level: AiLevel) {
        let session = self.clone();
        let worker_token = token.clone();
        let spawned = thread::Builder::new()
            .name("caro-search".to_string())
            .spawn(move || session.run_search(worker_token, level));

        if let Err(err) = spawned {
            error!(%err, "failed to spawn search thread");
            self.release_search(&token);
        }
    }

    fn run_search(&self, token: CancelToken, level: AiLevel) {
        let mut inner = self.lock();
        if !inner.owns_search(&token) {
            debug!("search superseded before it started");
            return;
        }
        inner.queue([SessionEvent::SearchStarted]);
        self.deliver(inner);

        let result = self.search_move(&token, level);
        self.finish_search(&token, result);
    }

    fn search_move(&self, token: &CancelToken, level: AiLevel) -> Result<MoveResult, SearchAborted> {
        let mut engine = self
            .shared
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut lease = SessionLease {
            inner: &self.shared.inner,
        };
        engine.choose_move(&mut lease, level, token)
    }

    /// Apply a search result unless the search was cancelled or replaced.
    fn finish_search(&self, token: &CancelToken, result: Result<MoveResult, SearchAborted>) {
        let mut inner = self.lock();
        let current = inner.owns_search(token) && !token.is_cancelled();
        let events = match result {
            Ok(found) if current => {
                inner.last_search = Some(found);
                match found.best_move {
                    Some(pos) => inner.apply(COMPUTER, pos),
                    None => inner.resolve_no_move(),
                }
            }
            Ok(_) => {
                debug!("stale search result dropped");
                Vec::new()
            }
            Err(SearchAborted) => {
                debug!("search aborted");
                Vec::new()
            }
        };
        inner.queue(events);
        inner.queue([SessionEvent::SearchFinished]);
        // Input stays refused until observers have seen the computer's move
        inner.pending.push_back(Notice::SearchDone(token.clone()));
        self.deliver(inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, TOTAL_CELLS};
    use crate::session::events::ChannelObserver;
    use crate::session::state::Phase;
    use std::sync::mpsc::{channel, Receiver, Sender};
    use std::sync::OnceLock;
    use std::time::Duration;

    fn session_with(first: Player) -> (GameSession, Receiver<SessionEvent>) {
        let (observer, rx) = ChannelObserver::new();
        let session = GameSession::with_engine(Arc::new(observer), AiEngine::with_seed(3), first);
        (session, rx)
    }

    /// Holds the search worker in `on_search_started` until released.
    struct Gate {
        release: Mutex<Receiver<()>>,
        finished: Sender<()>,
    }

    impl SessionObserver for Gate {
        fn on_search_started(&self) {
            let _ = self.release.lock().unwrap().recv();
        }

        fn on_search_finished(&self) {
            let _ = self.finished.send(());
        }
    }

    fn gated_session(first: Player) -> (GameSession, Sender<()>, Receiver<()>) {
        let (release_tx, release_rx) = channel();
        let (finished_tx, finished_rx) = channel();
        let gate = Gate {
            release: Mutex::new(release_rx),
            finished: finished_tx,
        };
        let session = GameSession::with_engine(Arc::new(gate), AiEngine::with_seed(5), first);
        (session, release_tx, finished_rx)
    }

    /// Cancels the game as soon as the computer starts thinking.
    struct CancelOnStart {
        session: OnceLock<GameSession>,
        forward: ChannelObserver,
    }

    impl SessionObserver for CancelOnStart {
        fn on_cell_changed(&self, pos: Pos, cell: Cell) {
            self.forward.on_cell_changed(pos, cell);
        }

        fn on_search_started(&self) {
            if let Some(session) = self.session.get() {
                session.cancel_game();
            }
            self.forward.on_search_started();
        }

        fn on_search_finished(&self) {
            self.forward.on_search_finished();
        }
    }

    /// Forwards everything and parks the worker on the computer's stone.
    struct HoldComputerMove {
        forward: ChannelObserver,
        parked: Sender<()>,
        resume: Mutex<Receiver<()>>,
    }

    impl SessionObserver for HoldComputerMove {
        fn on_cell_changed(&self, pos: Pos, cell: Cell) {
            self.forward.on_cell_changed(pos, cell);
            if cell == Cell::O {
                let _ = self.parked.send(());
                let _ = self.resume.lock().unwrap().recv();
            }
        }

        fn on_turn_changed(&self, player: Player) {
            self.forward.on_turn_changed(player);
        }

        fn on_game_ended(&self, outcome: Outcome, line: Option<[Pos; crate::board::WIN_LENGTH]>) {
            self.forward.on_game_ended(outcome, line);
        }

        fn on_search_started(&self) {
            self.forward.on_search_started();
        }

        fn on_search_finished(&self) {
            self.forward.on_search_finished();
        }
    }

    fn play(session: &GameSession, moves: &[(Player, u8, u8)]) {
        for &(player, r, c) in moves {
            session.submit_move(player, Pos::new(r, c)).unwrap();
        }
    }

    #[test]
    fn test_start_game_pvp() {
        let (session, rx) = session_with(Player::X);
        assert_eq!(session.snapshot().phase(), Phase::Idle);

        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![SessionEvent::TurnChanged(Player::X)]);

        let snap = session.snapshot();
        let game = snap.game.unwrap();
        assert_eq!(snap.phase(), Phase::InProgress);
        assert_eq!(game.current_player, Player::X);
        assert_eq!(game.move_count, 0);
        assert!(!snap.searching);
        assert!(snap.board.is_board_empty());
    }

    #[test]
    fn test_submit_before_start() {
        let (session, _rx) = session_with(Player::X);
        assert_eq!(
            session.submit_move(Player::X, Pos::new(0, 0)),
            Err(InvalidMove::NotInProgress)
        );
    }

    #[test]
    fn test_invalid_moves_leave_state_unchanged() {
        let (session, rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        session.submit_move(Player::X, Pos::new(4, 4)).unwrap();
        let before = session.snapshot();
        let _ = rx.try_iter().count();

        assert_eq!(
            session.submit_move(Player::X, Pos::new(0, 0)),
            Err(InvalidMove::WrongTurn {
                attempted: Player::X,
                expected: Player::O,
            })
        );
        assert_eq!(
            session.submit_move(Player::O, Pos::new(4, 4)),
            Err(InvalidMove::Occupied(Pos::new(4, 4)))
        );
        let off_board = Pos { row: 10, col: 3 };
        assert_eq!(
            session.submit_move(Player::O, off_board),
            Err(InvalidMove::OutOfBounds(off_board))
        );

        assert_eq!(session.snapshot(), before);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_pvp_move_events() {
        let (session, rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        session.submit_move(Player::X, Pos::new(2, 3)).unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::TurnChanged(Player::X),
                SessionEvent::CellChanged {
                    pos: Pos::new(2, 3),
                    cell: Cell::X,
                },
                SessionEvent::TurnChanged(Player::O),
            ]
        );
        let game = session.snapshot().game.unwrap();
        assert_eq!(game.current_player, Player::O);
        assert_eq!(game.move_count, 1);
    }

    #[test]
    fn test_win_updates_scores() {
        let (session, rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        play(
            &session,
            &[
                (Player::X, 0, 0),
                (Player::O, 1, 0),
                (Player::X, 0, 1),
                (Player::O, 1, 1),
                (Player::X, 0, 2),
                (Player::O, 1, 2),
                (Player::X, 0, 3),
                (Player::O, 1, 3),
                (Player::X, 0, 4),
            ],
        );

        let line = [0, 1, 2, 3, 4].map(|c| Pos::new(0, c));
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events[events.len() - 2..],
            [
                SessionEvent::GameEnded {
                    outcome: Outcome::Won {
                        winner: Player::X,
                        line,
                    },
                    line: Some(line),
                },
                SessionEvent::ScoresChanged(Scores { x: 1, o: 0 }),
            ]
        );

        let snap = session.snapshot();
        let game = snap.game.unwrap();
        assert_eq!(snap.phase(), Phase::Terminal);
        assert_eq!(game.current_player, Player::X);
        assert_eq!(game.move_count, 9);
        assert_eq!(snap.scores, Scores { x: 1, o: 0 });
        assert_eq!(
            session.submit_move(Player::O, Pos::new(5, 5)),
            Err(InvalidMove::NotInProgress)
        );
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let (session, rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);

        let (xs, os): (Vec<Pos>, Vec<Pos>) = (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .partition(|p| (p.col / 2 + p.row) % 2 == 0);
        assert_eq!(xs.len(), os.len());
        for (x, o) in xs.into_iter().zip(os) {
            session.submit_move(Player::X, x).unwrap();
            session.submit_move(Player::O, o).unwrap();
        }

        let snap = session.snapshot();
        assert_eq!(snap.game.unwrap().outcome, Outcome::Draw);
        assert_eq!(snap.game.unwrap().move_count, 100);
        assert_eq!(snap.scores, Scores::default());
        assert_eq!(
            rx.try_iter().last(),
            Some(SessionEvent::GameEnded {
                outcome: Outcome::Draw,
                line: None,
            })
        );
    }

    #[test]
    fn test_starting_player_toggles() {
        let (session, _rx) = session_with(Player::X);
        let mut starters = Vec::new();
        for _ in 0..3 {
            session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
            starters.push(session.snapshot().game.unwrap().starting_player);
        }
        assert_eq!(starters, vec![Player::X, Player::O, Player::X]);
    }

    #[test]
    fn test_scores_persist_and_reset() {
        let (session, rx) = session_with(Player::O);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        play(
            &session,
            &[
                (Player::O, 9, 0),
                (Player::X, 0, 0),
                (Player::O, 8, 1),
                (Player::X, 0, 2),
                (Player::O, 7, 2),
                (Player::X, 0, 4),
                (Player::O, 6, 3),
                (Player::X, 0, 6),
                (Player::O, 5, 4),
            ],
        );
        assert_eq!(session.snapshot().scores, Scores { x: 0, o: 1 });

        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        assert_eq!(session.snapshot().scores, Scores { x: 0, o: 1 });

        let _ = rx.try_iter().count();
        session.reset_scores();
        assert_eq!(session.snapshot().scores, Scores::default());
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![SessionEvent::ScoresChanged(Scores::default())]
        );
    }

    #[test]
    fn test_pvc_computer_first_plays_center() {
        let (session, rx) = session_with(Player::O);
        session.start_game(GameMode::PlayerVsComputer, AiLevel::Easy);
        session.wait_idle();

        let snap = session.snapshot();
        assert_eq!(snap.board.get(Pos::center()), Cell::O);
        assert_eq!(snap.board.stone_count(), 1);
        assert_eq!(snap.game.unwrap().current_player, Player::X);
        assert!(!snap.searching);
        let search = snap.last_search.unwrap();
        assert_eq!(search.best_move, Some(Pos::center()));
        assert_eq!(search.level, AiLevel::Easy);

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                SessionEvent::TurnChanged(Player::O),
                SessionEvent::SearchStarted,
                SessionEvent::CellChanged {
                    pos: Pos::center(),
                    cell: Cell::O,
                },
                SessionEvent::TurnChanged(Player::X),
                SessionEvent::SearchFinished,
            ]
        );
    }

    #[test]
    fn test_pvc_human_move_triggers_reply() {
        let (session, _rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsComputer, AiLevel::Medium);
        session.submit_move(Player::X, Pos::new(5, 5)).unwrap();
        session.wait_idle();

        let snap = session.snapshot();
        assert_eq!(snap.board.stone_count(), 2);
        assert_eq!(snap.board.stones(Player::O).count(), 1);
        assert_eq!(snap.game.unwrap().current_player, Player::X);
        assert_eq!(snap.game.unwrap().move_count, 2);

        assert_eq!(
            session.submit_move(Player::O, Pos::new(0, 0)),
            Err(InvalidMove::ComputerTurn(Player::O))
        );
    }

    #[test]
    fn test_submit_refused_while_searching() {
        let (session, release, finished) = gated_session(Player::O);
        session.start_game(GameMode::PlayerVsComputer, AiLevel::Hard);

        assert!(session.snapshot().searching);
        assert_eq!(
            session.submit_move(Player::X, Pos::new(0, 0)),
            Err(InvalidMove::SearchInFlight)
        );

        release.send(()).unwrap();
        finished.recv_timeout(Duration::from_secs(30)).unwrap();
        session.wait_idle();

        assert_eq!(session.snapshot().board.get(Pos::center()), Cell::O);
        session.submit_move(Player::X, Pos::new(0, 0)).unwrap();
    }

    #[test]
    fn test_cancel_mid_search_applies_nothing() {
        let (forward, rx) = ChannelObserver::new();
        let observer = Arc::new(CancelOnStart {
            session: OnceLock::new(),
            forward,
        });
        let session = GameSession::with_engine(observer.clone(), AiEngine::with_seed(1), Player::O);
        assert!(observer.session.set(session.clone()).is_ok());

        session.start_game(GameMode::PlayerVsComputer, AiLevel::Hard);
        session.wait_idle();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![SessionEvent::SearchStarted, SessionEvent::SearchFinished]);

        let snap = session.snapshot();
        assert!(snap.board.is_board_empty());
        assert_eq!(snap.game.unwrap().outcome, Outcome::Abandoned);
        assert_eq!(snap.phase(), Phase::Idle);
        assert_eq!(
            session.submit_move(Player::X, Pos::new(0, 0)),
            Err(InvalidMove::NotInProgress)
        );
    }

    #[test]
    fn test_restart_drops_running_search() {
        let (session, release, finished) = gated_session(Player::O);
        session.start_game(GameMode::PlayerVsComputer, AiLevel::Medium);
        assert!(session.snapshot().searching);

        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        assert!(!session.snapshot().searching);

        release.send(()).unwrap();
        finished.recv_timeout(Duration::from_secs(30)).unwrap();

        let snap = session.snapshot();
        assert!(snap.board.is_board_empty());
        let game = snap.game.unwrap();
        assert_eq!(game.mode, GameMode::PlayerVsPlayer);
        assert_eq!(game.current_player, Player::X);
        session.submit_move(Player::X, Pos::new(1, 1)).unwrap();
    }

    #[test]
    fn test_cancel_keeps_finished_outcome() {
        let (session, _rx) = session_with(Player::X);
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        play(
            &session,
            &[
                (Player::X, 3, 0),
                (Player::O, 4, 0),
                (Player::X, 3, 1),
                (Player::O, 4, 1),
                (Player::X, 3, 2),
                (Player::O, 4, 2),
                (Player::X, 3, 3),
                (Player::O, 4, 3),
                (Player::X, 3, 4),
            ],
        );
        session.cancel_game();
        assert_eq!(session.snapshot().phase(), Phase::Terminal);
    }

    #[test]
    fn test_restart_during_delivery_keeps_event_order() {
        let (forward, rx) = ChannelObserver::new();
        let (parked_tx, parked) = channel();
        let (resume, resume_rx) = channel();
        let observer = HoldComputerMove {
            forward,
            parked: parked_tx,
            resume: Mutex::new(resume_rx),
        };
        let session = GameSession::with_engine(Arc::new(observer), AiEngine::with_seed(7), Player::X);
        session.start_game(GameMode::PlayerVsComputer, AiLevel::Medium);
        session.submit_move(Player::X, Pos::new(5, 5)).unwrap();

        parked.recv_timeout(Duration::from_secs(30)).unwrap();
        let before: Vec<_> = rx.try_iter().collect();
        assert_eq!(before.len(), 5);
        assert!(matches!(
            before.last(),
            Some(SessionEvent::CellChanged { cell: Cell::O, .. })
        ));

        // The worker is still delivering its move; the new game queues behind it
        session.start_game(GameMode::PlayerVsPlayer, AiLevel::Easy);
        resume.send(()).unwrap();

        let after: Vec<_> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(30)).unwrap())
            .collect();
        assert_eq!(
            after,
            vec![
                SessionEvent::TurnChanged(Player::X),
                SessionEvent::SearchFinished,
                SessionEvent::TurnChanged(Player::O),
            ]
        );

        let snap = session.snapshot();
        let game = snap.game.unwrap();
        assert_eq!(game.mode, GameMode::PlayerVsPlayer);
        assert_eq!(game.current_player, Player::O);
        assert!(snap.board.is_board_empty());
        assert!(!snap.searching);
    }

    #[test]
    fn test_cancel_after_search_returns_drops_result() {
        let (session, rx) = session_with(Player::O);
        let token = {
            let mut inner = session.lock();
            inner.game = Some(SessionState::new(GameMode::PlayerVsComputer, AiLevel::Medium, Player::O));
            inner.launch_search().map(|(token, _)| token).unwrap()
        };

        let result = session.search_move(&token, AiLevel::Medium);
        assert_eq!(result.as_ref().ok().and_then(|r| r.best_move), Some(Pos::center()));

        session.cancel_game();
        session.finish_search(&token, result);

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![SessionEvent::SearchFinished]);
        let snap = session.snapshot();
        assert!(snap.board.is_board_empty());
        assert!(!snap.searching);
        assert_eq!(snap.last_search, None);
        assert_eq!(snap.game.unwrap().outcome, Outcome::Abandoned);
    }
}
