//! Server network layer: accepts TCP connections and drives the table worker

use crate::connection;
use crate::table::{Table, TableEvent};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Main server owning the listener and the only copy of the table
pub struct Server {
    listener: TcpListener,
    table: Table,

    // Connection tasks report here; only `run` consumes it
    events_tx: mpsc::UnboundedSender<TableEvent>,
    events_rx: mpsc::UnboundedReceiver<TableEvent>,
}

impl Server {
    pub async fn new(addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            table: Table::new(),
            events_tx,
            events_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Seats an accepted connection and spawns its reader and writer tasks
    fn accept_connection(&mut self, stream: TcpStream, addr: SocketAddr) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        match self.table.join(addr, outbound_tx.clone()) {
            Ok(session) => {
                let (read_half, write_half) = stream.into_split();
                tokio::spawn(connection::write_messages(
                    write_half,
                    session,
                    outbound_rx,
                    self.events_tx.clone(),
                ));
                tokio::spawn(connection::read_commands(
                    BufReader::new(read_half),
                    session,
                    outbound_tx,
                    self.events_tx.clone(),
                ));
            }
            Err(e) => {
                warn!("Refusing connection from {}: {}", addr, e);
                tokio::spawn(connection::reject(stream, e));
            }
        }
    }

    /// Main server loop
    ///
    /// Accepting connections and applying table events happen on this one
    /// task, which makes it the sole mutator of game and session state.
    pub async fn run(&mut self) {
        info!("Server started successfully");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => self.accept_connection(stream, addr),
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                },

                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.table.apply(event),
                        // Unreachable while `events_tx` is held by the server
                        None => break,
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use shared::Player;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    async fn read_line(reader: &mut BufReader<TcpStream>) -> String {
        let mut line = String::new();
        tokio::time::timeout(Duration::from_secs(2), reader.read_line(&mut line))
            .await
            .expect("timed out waiting for server")
            .unwrap();
        line.trim_end().to_string()
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::new("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.table().sessions().len(), 0);
        assert_eq!(server.table().game().status, GameStatus::Active);
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = Server::new("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();
        assert!(Server::new(&taken).await.is_err());
        assert!(Server::new("not an address").await.is_err());
    }

    #[tokio::test]
    async fn test_welcome_and_move_echo() {
        let mut server = Server::new("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(async move { server.run().await });

        let mut alice = BufReader::new(TcpStream::connect(addr).await.unwrap());
        assert_eq!(read_line(&mut alice).await, format!("welcome,{}", Player::A));

        alice.get_mut().write_all(b"move,7,7\n").await.unwrap();
        assert_eq!(read_line(&mut alice).await, "move,7,7");

        // Alone at the table, but still not allowed to move twice
        alice.get_mut().write_all(b"move,7,8\n").await.unwrap();
        assert_eq!(read_line(&mut alice).await, "error,not_your_turn");
    }
}
