use crate::game::ClientGameState;
use crate::input::{parse_command, UserCommand, HELP};
use crate::rendering::{render_board, status_line};
use log::{debug, info, warn};
use shared::ServerMessage;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;

pub struct Client {
    game_state: ClientGameState,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Client {
            game_state: ClientGameState::new(),
        }
    }

    pub fn game_state(&self) -> &ClientGameState {
        &self.game_state
    }

    /// Connects to the server and plays from the terminal until either side quits.
    pub async fn connect(&mut self, server_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to {}...", server_addr);
        let stream = TcpStream::connect(server_addr).await?;
        info!("Connected from {}", stream.local_addr()?);

        println!("{}", HELP);
        let stdin = BufReader::new(tokio::io::stdin());
        self.run(stream, stdin).await
    }

    /// Relays server lines to the local view and typed commands to the server.
    ///
    /// Returns when the server closes the connection or the player quits.
    /// End of input only stops reading commands; server updates keep
    /// arriving until the connection closes.
    pub async fn run<S, I>(
        &mut self,
        server: S,
        input: I,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        I: AsyncBufRead + Unpin,
    {
        let (read_half, mut write_half) = tokio::io::split(server);
        let mut server_lines = BufReader::new(read_half).lines();
        let mut input_lines = input.lines();
        let mut input_open = true;

        loop {
            tokio::select! {
                line = server_lines.next_line() => {
                    match line? {
                        Some(line) => self.handle_server_line(&line),
                        None => {
                            println!("Server closed the connection");
                            break;
                        }
                    }
                },

                line = input_lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => match parse_command(&line) {
                            Ok(UserCommand::Send(message)) => {
                                debug!("-> {}", message);
                                write_half.write_all(format!("{}\n", message).as_bytes()).await?;
                            }
                            Ok(UserCommand::Help) => println!("{}", HELP),
                            Ok(UserCommand::Quit) => break,
                            Err(e) => println!("{}\n{}", e, HELP),
                        },
                        None => input_open = false,
                    }
                },
            }
        }

        let _ = write_half.shutdown().await;
        Ok(())
    }

    fn handle_server_line(&mut self, line: &str) {
        debug!("<- {}", line);
        let message = match line.parse::<ServerMessage>() {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring server line: {}", e);
                return;
            }
        };

        self.game_state.apply_server_message(&message);

        if matches!(message, ServerMessage::Move(_) | ServerMessage::Reset) {
            println!("{}", render_board(&self.game_state));
        }
        println!("{}", status_line(&self.game_state));
    }
}
