//! Per-connection reader and writer tasks
//!
//! Each accepted socket is split in two. The reader decodes one command per
//! line and forwards it to the table worker; the writer drains the session's
//! outbound queue. Neither task touches game state directly.

use crate::session_registry::{Outbound, SessionId};
use crate::table::TableEvent;
use log::{debug, error, warn};
use shared::{ClientMessage, GameError, ServerMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Longest accepted line, excluding the line terminator
pub const MAX_LINE_LENGTH: usize = 64;

enum Frame {
    Line(Vec<u8>),
    TooLong,
    Eof,
}

/// Reads one newline-terminated frame without buffering more than
/// `MAX_LINE_LENGTH + 1` bytes. The remainder of an oversized line is
/// discarded.
async fn read_frame<R>(reader: &mut R) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = MAX_LINE_LENGTH as u64 + 1;
    if (&mut *reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
        return Ok(Frame::Eof);
    }
    // A short unterminated frame is the last line before EOF
    if buf.last() == Some(&b'\n') || buf.len() <= MAX_LINE_LENGTH {
        return Ok(Frame::Line(buf));
    }

    loop {
        buf.clear();
        let read = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
        if read == 0 || buf.last() == Some(&b'\n') {
            return Ok(Frame::TooLong);
        }
    }
}

/// Decodes one raw frame into a command. The wire format is ASCII, so any
/// byte sequence that is not UTF-8 is malformed.
fn decode_line(frame: &[u8]) -> Result<ClientMessage, GameError> {
    let line = std::str::from_utf8(frame)
        .map_err(|_| GameError::MalformedMessage(String::from_utf8_lossy(frame).into_owned()))?;
    line.trim_end_matches(['\r', '\n']).parse()
}

/// Reads lines until the peer closes the connection or the writer side goes away.
///
/// Malformed lines (bad syntax, invalid UTF-8, longer than `MAX_LINE_LENGTH`)
/// are answered with an error on this connection only and the loop keeps
/// going. Only EOF and I/O errors end it.
pub async fn read_commands<R>(
    mut reader: R,
    session: SessionId,
    outbound: Outbound,
    events: mpsc::UnboundedSender<TableEvent>,
) where
    R: AsyncBufRead + Unpin,
{
    loop {
        let frame = tokio::select! {
            frame = read_frame(&mut reader) => frame,
            _ = outbound.closed() => {
                debug!("{} writer closed, stopping reader", session);
                break;
            }
        };

        let decoded = match frame {
            Ok(Frame::Line(bytes)) => {
                debug!("{} <- {:?}", session, String::from_utf8_lossy(&bytes));
                decode_line(&bytes)
            }
            Ok(Frame::TooLong) => Err(GameError::MalformedMessage(format!(
                "line longer than {} bytes",
                MAX_LINE_LENGTH
            ))),
            Ok(Frame::Eof) => {
                debug!("{} closed the connection", session);
                break;
            }
            Err(e) => {
                warn!("Error reading from {}: {}", session, e);
                break;
            }
        };

        match decoded {
            Ok(message) => {
                if let Err(e) = events.send(TableEvent::Command { session, message }) {
                    error!("Failed to forward command from {}: {}", session, e);
                    return;
                }
            }
            Err(e) => {
                warn!("{} sent {}", session, e);
                let _ = outbound.send(ServerMessage::from(&e));
            }
        }
    }

    notify_lost(&events, session);
}

/// Writes queued messages, one line each, until the queue is closed or a write fails.
pub async fn write_messages<W>(
    mut writer: W,
    session: SessionId,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
    events: mpsc::UnboundedSender<TableEvent>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = outbound.recv().await {
        let line = format!("{}\n", message);
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!("Failed to write to {}: {}", session, e);
            notify_lost(&events, session);
            return;
        }
        debug!("{} -> {}", session, message);
    }

    let _ = writer.shutdown().await;
}

/// Writes a single rejection line to a connection that was never seated.
pub async fn reject<W>(mut writer: W, reason: GameError)
where
    W: AsyncWrite + Unpin,
{
    let line = format!("{}\n", ServerMessage::from(&reason));
    if let Err(e) = writer.write_all(line.as_bytes()).await {
        debug!("Failed to send rejection: {}", e);
    }
    let _ = writer.shutdown().await;
}

fn notify_lost(events: &mpsc::UnboundedSender<TableEvent>, session: SessionId) {
    debug!("{}: {}", session, GameError::ConnectionLost);
    if let Err(e) = events.send(TableEvent::Disconnected { session }) {
        error!("Failed to report disconnect of {}: {}", session, e);
    }
}
