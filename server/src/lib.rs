//! # Gomoku Server Library
//!
//! This library provides the authoritative server for networked five-in-a-row.
//! It owns the only copy of the board, validates and applies moves, detects
//! wins, and fans every accepted change out to both players.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! Clients never decide anything. A move is only real once the server has
//! accepted it and echoed it back; the server's win detection is the sole
//! source of game results.
//!
//! ### Seat Management
//! Handles the lifecycle of player connections:
//! - Seating the first two connections as `O` and `X`
//! - Refusing further connections while both seats are taken
//! - Abandoning the running game when a player disconnects
//!
//! ### Ordered Broadcasting
//! Every accepted move, result and reset is pushed to all seated players in
//! the same order, so no two clients ever disagree about the move sequence.
//!
//! ## Architecture Design
//!
//! ### Single Writer
//! All mutation of game and session state happens on one task, the server
//! loop, which owns the `Table`. Connection tasks only send it events over a
//! channel. No locks guard shared state because nothing is shared.
//!
//! ### TCP Line Protocol
//! Clients speak newline-delimited text (`move,<row>,<col>`). Each connection
//! gets a reader task that decodes lines and a writer task that drains the
//! session's outbound queue, so a slow client never stalls the table.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Turn order, move validation and terminal status (won, drawn, abandoned).
//!
//! ### Session Registry Module (`session_registry`)
//! Seat assignment, session lookup and best-effort broadcast.
//!
//! ### Table Module (`table`)
//! Combines the game and the registry and applies connection events one at a time.
//!
//! ### Connection Module (`connection`)
//! Reader and writer tasks for one socket.
//!
//! ### Network Module (`network`)
//! Listener and main loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1:8080").await?;
//!
//!     // Accepts players and applies their moves until the process exits
//!     server.run().await;
//!
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod game;
pub mod network;
pub mod session_registry;
pub mod table;
