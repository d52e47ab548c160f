//! Caller side of a relay session.
//!
//! Two tasks share one websocket: the input loop turns console lines into
//! `"<alias>: <line>"` frames, the transport loop renders frames from other
//! participants. Whichever finishes first decides the session outcome and the
//! other one is aborted.

use crossterm::style::Stylize;
use futures::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;

/// Lines that end the session
const FAREWELLS: [&str; 3] = ["bye", "close", "exit"];

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("console error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] WsError),

    #[error("unknown websocket frame type: {0}")]
    UnexpectedFrame(&'static str),

    #[error("session task failed: {0}")]
    Task(String),
}

/// An interactive session bound to a local alias.
#[derive(Debug, Clone)]
pub struct CallerSession {
    alias: String,
    colors: bool,
}

impl CallerSession {
    pub fn new(alias: impl Into<String>, colors: bool) -> Self {
        Self {
            alias: alias.into(),
            colors,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Run until the user leaves, the server closes, or either side fails.
    pub async fn run<T, R, W>(self, transport: T, input: R, output: W) -> Result<(), SessionError>
    where
        T: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Send + 'static,
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sink, stream) = transport.split();

        let mut input_task = tokio::spawn(input_loop(self.alias.clone(), input, sink));
        let mut transport_task = tokio::spawn(transport_loop(self.alias, self.colors, stream, output));

        let outcome = tokio::select! {
            outcome = &mut input_task => {
                transport_task.abort();
                outcome
            }
            outcome = &mut transport_task => {
                input_task.abort();
                outcome
            }
        };

        outcome.map_err(|e| SessionError::Task(e.to_string()))?
    }
}

async fn input_loop<R, K>(alias: String, input: R, mut sink: K) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin,
    K: Sink<Message, Error = WsError> + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if FAREWELLS.contains(&command) {
            break;
        }
        if command.is_empty() {
            continue;
        }
        sink.send(Message::text(format!("{alias}: {line}"))).await?;
    }

    depart(&alias, &mut sink).await
}

async fn depart<K>(alias: &str, sink: &mut K) -> Result<(), SessionError>
where
    K: Sink<Message, Error = WsError> + Unpin,
{
    sink.send(Message::text(format!("{alias}: is going away"))).await?;
    if let Err(e) = sink.close().await {
        debug!(error = %e, "Transport already closed");
    }
    Ok(())
}

async fn transport_loop<S, W>(
    alias: String,
    colors: bool,
    mut stream: S,
    mut output: W,
) -> Result<(), SessionError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                output
                    .write_all(render(&alias, text.as_str(), colors).as_bytes())
                    .await?;
                output.flush().await?;
            }
            Message::Close(_) => return Ok(()),
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Binary(_) => return Err(SessionError::UnexpectedFrame("binary")),
            Message::Frame(_) => return Err(SessionError::UnexpectedFrame("raw")),
        }
    }

    Ok(())
}

/// Render one relay frame as a console line.
///
/// The origin is everything before the first `:`; frames without one are
/// printed verbatim.
pub fn render(alias: &str, frame: &str, colors: bool) -> String {
    let Some((origin, body)) = frame.split_once(':') else {
        return format!("{frame}\n");
    };

    if !colors {
        return format!("{origin}:{body}\n");
    }

    if origin == alias {
        format!("{}:{body}\n", origin.yellow())
    } else {
        format!("{}:{body}\n", origin.blue())
    }
}
