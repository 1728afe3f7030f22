//! The single serialization point for all shared game state
//!
//! A `Table` owns the `GameState` and the `SessionRegistry`. It is driven by
//! exactly one worker (the server loop), which applies joins, commands and
//! departures one at a time. Broadcasts are queued while the move that caused
//! them is being applied, so every connection observes the same order.

use crate::game::{GameState, GameStatus, MoveOutcome};
use crate::session_registry::{Outbound, SessionId, SessionRegistry};
use log::{debug, info, warn};
use shared::{ClientMessage, GameError, ServerMessage};
use std::net::SocketAddr;

/// Events sent from connection tasks to the table worker
#[derive(Debug)]
pub enum TableEvent {
    Command {
        session: SessionId,
        message: ClientMessage,
    },
    Disconnected {
        session: SessionId,
    },
}

#[derive(Default)]
pub struct Table {
    game: GameState,
    sessions: SessionRegistry,
}

impl Table {
    pub fn new() -> Self {
        Self {
            game: GameState::new(),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Seats a new connection, greets it with its symbol and replays the
    /// moves played so far.
    ///
    /// When the previous game was abandoned and both seats are filled again,
    /// a fresh game is started for everyone.
    pub fn join(
        &mut self,
        addr: SocketAddr,
        outbound: Outbound,
    ) -> Result<SessionId, GameError> {
        let session = self.sessions.register(addr, outbound)?;
        let (id, player) = (session.id, session.player);
        session.send(ServerMessage::Welcome(player));

        // Replay the current game for late joiners
        for mv in &self.game.history {
            session.send(ServerMessage::Move(*mv));
        }
        match self.game.status {
            GameStatus::Active => {}
            GameStatus::Won(winner) => {
                session.send(ServerMessage::Win(winner));
            }
            GameStatus::Draw => {
                session.send(ServerMessage::Draw);
            }
            GameStatus::Abandoned => {
                session.send(ServerMessage::Abandoned);
            }
        }

        if self.game.status == GameStatus::Abandoned && self.sessions.is_full() {
            self.game.reset()?;
            self.broadcast(ServerMessage::Reset);
        }

        debug!(
            "Seated: [{}]",
            self.sessions
                .sessions()
                .map(|s| format!("{}={}@{}", s.id, s.player, s.addr))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(id)
    }

    pub fn apply(&mut self, event: TableEvent) {
        match event {
            TableEvent::Command { session, message } => {
                if let Err(error) = self.handle_command(session, message) {
                    debug!("Rejected {} from {}: {}", message, session, error);
                }
            }
            TableEvent::Disconnected { session } => self.leave(session),
        }
    }

    /// Runs one client command on behalf of `session`
    ///
    /// Rejections are reported to that session only and leave the game untouched.
    pub fn handle_command(
        &mut self,
        session: SessionId,
        message: ClientMessage,
    ) -> Result<(), GameError> {
        let Some(player) = self.sessions.player_of(session) else {
            warn!("Command from unknown {}", session);
            return Err(GameError::ConnectionLost);
        };

        let result = match message {
            ClientMessage::Move(mv) => self
                .game
                .submit_move(player, mv.row, mv.col)
                .map(|outcome| self.announce(outcome)),
            ClientMessage::Reset => self
                .game
                .reset()
                .map(|()| self.broadcast(ServerMessage::Reset)),
        };

        if let Err(error) = &result {
            if !self.sessions.send_to(session, ServerMessage::from(error)) {
                self.leave(session);
            }
        }
        result
    }

    fn announce(&mut self, outcome: MoveOutcome) {
        self.broadcast(ServerMessage::Move(outcome.mv));
        if let Some(winner) = outcome.winner {
            info!("Player {} wins ({:?})", winner, outcome.line);
            self.broadcast(ServerMessage::Win(winner));
        } else if outcome.status == GameStatus::Draw {
            info!("Board full, game drawn");
            self.broadcast(ServerMessage::Draw);
        }
    }

    /// Removes a session; an unfinished game becomes abandoned.
    pub fn leave(&mut self, session: SessionId) {
        if self.sessions.unregister(session).is_none() {
            return;
        }
        if self.game.abandon() {
            self.broadcast(ServerMessage::Abandoned);
        }
    }

    /// Broadcasts to all sessions, dropping any whose connection is gone.
    fn broadcast(&mut self, message: ServerMessage) {
        for unreachable in self.sessions.broadcast(&message) {
            self.leave(unreachable);
        }
    }
}
