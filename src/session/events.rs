//! Notifications sent from the session to the presentation layer

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::board::{Cell, Player, Pos, WIN_LENGTH};
use crate::rules::Outcome;

use super::state::Scores;

/// One notification, in enum form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    CellChanged { pos: Pos, cell: Cell },
    TurnChanged(Player),
    GameEnded {
        outcome: Outcome,
        line: Option<[Pos; WIN_LENGTH]>,
    },
    ScoresChanged(Scores),
    SearchStarted,
    SearchFinished,
}

impl SessionEvent {
    /// Call the observer method matching this event
    pub fn dispatch(&self, observer: &dyn SessionObserver) {
        match *self {
            SessionEvent::CellChanged { pos, cell } => observer.on_cell_changed(pos, cell),
            SessionEvent::TurnChanged(player) => observer.on_turn_changed(player),
            SessionEvent::GameEnded { outcome, line } => observer.on_game_ended(outcome, line),
            SessionEvent::ScoresChanged(scores) => observer.on_scores_changed(scores.x, scores.o),
            SessionEvent::SearchStarted => observer.on_search_started(),
            SessionEvent::SearchFinished => observer.on_search_finished(),
        }
    }
}

/// Receiver of session notifications.
///
/// Called without any session lock held, possibly from the search worker
/// thread, and never from two threads at once. Implementations may call back
/// into the session; what such a call raises is delivered after the current
/// callback returns.
pub trait SessionObserver: Send + Sync {
    fn on_cell_changed(&self, _pos: Pos, _cell: Cell) {}
    fn on_turn_changed(&self, _player: Player) {}
    fn on_game_ended(&self, _outcome: Outcome, _line: Option<[Pos; WIN_LENGTH]>) {}
    fn on_scores_changed(&self, _x: u32, _o: u32) {}
    fn on_search_started(&self) {}
    fn on_search_finished(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Forwards every notification into an `mpsc` channel.
pub struct ChannelObserver {
    tx: Sender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SessionEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

impl SessionObserver for ChannelObserver {
    fn on_cell_changed(&self, pos: Pos, cell: Cell) {
        self.send(SessionEvent::CellChanged { pos, cell });
    }

    fn on_turn_changed(&self, player: Player) {
        self.send(SessionEvent::TurnChanged(player));
    }

    fn on_game_ended(&self, outcome: Outcome, line: Option<[Pos; WIN_LENGTH]>) {
        self.send(SessionEvent::GameEnded { outcome, line });
    }

    fn on_scores_changed(&self, x: u32, o: u32) {
        self.send(SessionEvent::ScoresChanged(Scores { x, o }));
    }

    fn on_search_started(&self) {
        self.send(SessionEvent::SearchStarted);
    }

    fn on_search_finished(&self) {
        self.send(SessionEvent::SearchFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_round_trip() {
        let (observer, rx) = ChannelObserver::new();
        let events = [
            SessionEvent::CellChanged {
                pos: Pos::new(1, 2),
                cell: Cell::X,
            },
            SessionEvent::TurnChanged(Player::O),
            SessionEvent::ScoresChanged(Scores { x: 1, o: 0 }),
            SessionEvent::SearchStarted,
            SessionEvent::SearchFinished,
            SessionEvent::GameEnded {
                outcome: Outcome::Draw,
                line: None,
            },
        ];
        for event in &events {
            event.dispatch(&observer);
        }
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), events.to_vec());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_search_started();
    }

    #[test]
    fn test_channel_observer_shared_between_threads() {
        let (observer, rx) = ChannelObserver::new();
        let observer = std::sync::Arc::new(observer);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let observer = observer.clone();
                std::thread::spawn(move || observer.on_search_started())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        drop(observer);
        assert_eq!(rx.iter().count(), 4);
    }
}
