//! Seat management and fan-out for the players at the table
//!
//! This module tracks the sessions bound to open connections:
//! - Seat assignment (exactly two player symbols, each handed out at most once per session)
//! - Session removal on disconnect
//! - Best-effort delivery of server messages to one or all sessions
//!
//! The registry never performs I/O itself. Each session owns an unbounded
//! outbound queue drained by its connection's writer task, so pushing a
//! message never blocks the caller.

use log::{info, warn};
use shared::{GameError, Player, ServerMessage};
use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc;

/// Sending half of a session's outbound message queue
pub type Outbound = mpsc::UnboundedSender<ServerMessage>;

/// Seats in the order they are handed out
const SEATS: [Player; 2] = [Player::A, Player::B];

/// Server-assigned identity of one connection; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A connected player
///
/// Each session carries:
/// - The player symbol it was seated with
/// - The peer address, for diagnostics
/// - The queue its connection's writer task drains
#[derive(Debug)]
pub struct PlayerSession {
    pub id: SessionId,
    pub player: Player,
    pub addr: SocketAddr,
    pub connected_at: Instant,
    outbound: Outbound,
}

impl PlayerSession {
    /// Queues a message for this session. Returns false once the
    /// connection's writer has gone away.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.outbound.send(message).is_ok()
    }
}

/// Tracks the (at most two) sessions seated at the table
///
/// Sessions are kept in join order so diagnostic listings are stable.
pub struct SessionRegistry {
    sessions: Vec<PlayerSession>,
    next_session_id: u32,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            next_session_id: 1,
        }
    }

    /// Seats a new connection
    ///
    /// The session receives the first free symbol, PlayerA before PlayerB.
    /// Fails with `TableFull` when both seats are taken; a refused
    /// connection does not consume a session id.
    pub fn register(
        &mut self,
        addr: SocketAddr,
        outbound: Outbound,
    ) -> Result<&PlayerSession, GameError> {
        let player = SEATS
            .into_iter()
            .find(|seat| self.sessions.iter().all(|s| s.player != *seat))
            .ok_or(GameError::TableFull)?;

        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;

        info!("{} connected from {} as player {}", id, addr, player);
        self.sessions.push(PlayerSession {
            id,
            player,
            addr,
            connected_at: Instant::now(),
            outbound,
        });

        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Removes a session, returning it if it was still registered
    pub fn unregister(&mut self, id: SessionId) -> Option<PlayerSession> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        let session = self.sessions.remove(index);
        info!(
            "{} (player {}) disconnected after {:.1}s",
            session.id,
            session.player,
            session.connected_at.elapsed().as_secs_f32()
        );
        Some(session)
    }

    pub fn get(&self, id: SessionId) -> Option<&PlayerSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn player_of(&self, id: SessionId) -> Option<Player> {
        self.get(id).map(|s| s.player)
    }

    /// Sends a message to a single session. Returns false if the session is
    /// unknown or its connection is closed.
    pub fn send_to(&self, id: SessionId, message: ServerMessage) -> bool {
        self.get(id).is_some_and(|s| s.send(message))
    }

    /// Delivers a message to every registered session
    ///
    /// A closed recipient does not stop delivery to the others. The ids of
    /// sessions that could not be reached are returned so the caller can
    /// unregister them.
    pub fn broadcast(&self, message: &ServerMessage) -> Vec<SessionId> {
        let mut unreachable = Vec::new();
        for session in &self.sessions {
            if !session.send(message.clone()) {
                warn!("Failed to deliver {:?} to {}", message, session.id);
                unreachable.push(session.id);
            }
        }
        unreachable
    }

    /// Sessions in join order
    pub fn sessions(&self) -> impl Iterator<Item = &PlayerSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() == SEATS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn channel() -> (Outbound, mpsc::UnboundedReceiver<ServerMessage>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_registry_creation() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_full());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_assigns_both_seats_in_order() {
        let mut registry = SessionRegistry::new();
        let (tx1, _rx1) = channel();
        let (tx2, _rx2) = channel();

        let first = registry.register(test_addr(9001), tx1).unwrap();
        assert_eq!(first.id, SessionId(1));
        assert_eq!(first.player, Player::A);

        let second = registry.register(test_addr(9002), tx2).unwrap();
        assert_eq!(second.id, SessionId(2));
        assert_eq!(second.player, Player::B);

        assert!(registry.is_full());
    }

    #[test]
    fn test_third_registration_is_table_full() {
        let mut registry = SessionRegistry::new();
        let (tx, _rx) = channel();
        registry.register(test_addr(9001), tx.clone()).unwrap();
        registry.register(test_addr(9002), tx.clone()).unwrap();

        let result = registry.register(test_addr(9003), tx);
        assert!(matches!(result, Err(GameError::TableFull)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_freed_seat_is_reassigned_with_fresh_id() {
        let mut registry = SessionRegistry::new();
        let (tx, _rx) = channel();
        registry.register(test_addr(9001), tx.clone()).unwrap();
        registry.register(test_addr(9002), tx.clone()).unwrap();

        let removed = registry.unregister(SessionId(1)).unwrap();
        assert_eq!(removed.player, Player::A);

        let session = registry.register(test_addr(9003), tx).unwrap();
        assert_eq!(session.player, Player::A);
        assert_eq!(session.id, SessionId(3));
    }

    #[test]
    fn test_unregister_unknown_session() {
        let mut registry = SessionRegistry::new();
        assert!(registry.unregister(SessionId(42)).is_none());
    }

    #[test]
    fn test_sessions_listed_in_join_order() {
        let mut registry = SessionRegistry::new();
        let (tx, _rx) = channel();
        registry.register(test_addr(9001), tx.clone()).unwrap();
        registry.register(test_addr(9002), tx.clone()).unwrap();
        registry.unregister(SessionId(1));
        registry.register(test_addr(9003), tx).unwrap();

        let ids: Vec<SessionId> = registry.sessions().map(|s| s.id).collect();
        assert_eq!(ids, vec![SessionId(2), SessionId(3)]);
        assert_eq!(registry.player_of(SessionId(3)), Some(Player::A));
    }

    #[test]
    fn test_broadcast_reaches_every_session() {
        let mut registry = SessionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(test_addr(9001), tx1).unwrap();
        registry.register(test_addr(9002), tx2).unwrap();

        let unreachable = registry.broadcast(&ServerMessage::Draw);
        assert!(unreachable.is_empty());
        assert_eq!(rx1.try_recv().unwrap(), ServerMessage::Draw);
        assert_eq!(rx2.try_recv().unwrap(), ServerMessage::Draw);
    }

    #[test]
    fn test_broadcast_skips_closed_sessions() {
        let mut registry = SessionRegistry::new();
        let (tx1, rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(test_addr(9001), tx1).unwrap();
        registry.register(test_addr(9002), tx2).unwrap();
        drop(rx1);

        let unreachable = registry.broadcast(&ServerMessage::Abandoned);
        assert_eq!(unreachable, vec![SessionId(1)]);
        assert_eq!(rx2.try_recv().unwrap(), ServerMessage::Abandoned);
    }

    #[test]
    fn test_send_to_single_session() {
        let mut registry = SessionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(test_addr(9001), tx1).unwrap();
        registry.register(test_addr(9002), tx2).unwrap();

        assert!(registry.send_to(SessionId(2), ServerMessage::Reset));
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.try_recv().unwrap(), ServerMessage::Reset);
        assert!(!registry.send_to(SessionId(7), ServerMessage::Reset));
    }
}
