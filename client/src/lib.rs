//! # Gomoku Terminal Client
//!
//! A thin text front end for the gomoku server. It holds no authority over
//! the game: it forwards what the player types and redraws whatever the
//! server broadcasts.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Local mirror of the board, updated only from server messages.
//!
//! ### Input Module (`input`)
//! Parses typed commands (`7 7`, `reset`, `quit`) into protocol messages.
//!
//! ### Network Module (`network`)
//! Owns the TCP connection and multiplexes server lines with terminal input.
//!
//! ### Rendering Module (`rendering`)
//! Draws the board and a status line as plain text.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new();
//!     client.connect("127.0.0.1:8080").await?;
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
