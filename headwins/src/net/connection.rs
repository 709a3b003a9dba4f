//! The single duplex WebSocket connection to the poker server.
//!
//! A [`Connection`] connects at most once. Lifecycle changes and inbound
//! frames are delivered in order through [`Connection::recv`], one at a
//! time, so whoever owns the connection processes each event to completion
//! before seeing the next.
//!
//! Outbound sends are fire-and-forget. While the connection isn't open they
//! are dropped, not queued.

use futures_util::{SinkExt, StreamExt};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{codec, errors::ConnectionError, messages::ClientMessage};

/// Default server endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:8000/ws";

/// Something that happened on the connection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConnectionEvent {
    /// The handshake completed.
    Opened,
    /// A text frame from the server.
    Message(String),
    /// The connection is gone. Delivered exactly once per connection.
    Closed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectionStatus {
    /// Not opened yet.
    Idle,
    Open,
    Closed,
}

/// State shared between the owner and the socket tasks.
#[derive(Debug)]
struct Lifecycle {
    started: AtomicBool,
    open: AtomicBool,
    closed: AtomicBool,
    events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl Lifecycle {
    fn mark_open(&self) {
        self.open.store(true, Ordering::SeqCst);
        let _ = self.events.send(ConnectionEvent::Opened);
    }

    fn deliver(&self, text: String) {
        if !self.closed.load(Ordering::SeqCst) {
            let _ = self.events.send(ConnectionEvent::Message(text));
        }
    }

    fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.events.send(ConnectionEvent::Closed);
        }
    }
}

#[derive(Debug)]
pub struct Connection {
    url: String,
    lifecycle: Arc<Lifecycle>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
    outbound: Option<mpsc::UnboundedSender<Message>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl Connection {
    pub fn new(url: impl Into<String>) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            url: url.into(),
            lifecycle: Arc::new(Lifecycle {
                started: AtomicBool::new(false),
                open: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                events: events_tx,
            }),
            events,
            outbound: None,
            reader: None,
            writer: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.lifecycle.closed.load(Ordering::SeqCst) {
            ConnectionStatus::Closed
        } else if self.lifecycle.open.load(Ordering::SeqCst) {
            ConnectionStatus::Open
        } else {
            ConnectionStatus::Idle
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == ConnectionStatus::Open
    }

    /// Connect to the server.
    ///
    /// On success an [`ConnectionEvent::Opened`] is queued, followed by the
    /// server's frames. On failure a single [`ConnectionEvent::Closed`] is
    /// queued and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails or this connection has
    /// already been opened once.
    pub async fn open(&mut self) -> Result<(), ConnectionError> {
        if self.lifecycle.started.swap(true, Ordering::SeqCst) {
            return Err(ConnectionError::AlreadyOpened {
                url: self.url.clone(),
            });
        }

        let ws_stream = match connect_async(self.url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(error) => {
                log::warn!("failed to connect to {}: {error}", self.url);
                self.lifecycle.mark_closed();
                return Err(ConnectionError::Connect {
                    url: self.url.clone(),
                    source: Box::new(error),
                });
            }
        };
        log::debug!("connected to {}", self.url);

        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        // Opened must be queued before the reader can deliver anything.
        self.lifecycle.mark_open();

        let lifecycle = Arc::clone(&self.lifecycle);
        self.writer = Some(tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(error) = write.send(frame).await {
                    log::debug!("write failed: {error}");
                    break;
                }
            }
            let _ = write.close().await;
            lifecycle.mark_closed();
        }));

        let lifecycle = Arc::clone(&self.lifecycle);
        self.reader = Some(tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => lifecycle.deliver(text.as_str().to_owned()),
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => lifecycle.deliver(text),
                        Err(_) => log::debug!("dropping non-UTF-8 binary frame"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(error) => {
                        log::debug!("read failed: {error}");
                        break;
                    }
                }
            }
            lifecycle.mark_closed();
        }));

        self.outbound = Some(outbound_tx);
        Ok(())
    }

    /// Send a message if the connection is open. Otherwise the message is
    /// dropped without error.
    pub fn send(&self, message: &ClientMessage) {
        let outbound = match &self.outbound {
            Some(outbound) if self.is_open() => outbound,
            _ => {
                log::debug!("not connected, dropping: {message}");
                return;
            }
        };

        match codec::encode(message) {
            Ok(json) => {
                if outbound.send(Message::Text(json.into())).is_err() {
                    log::debug!("writer gone, dropping: {message}");
                }
            }
            Err(error) => log::warn!("{error}"),
        }
    }

    /// Wait for the next connection event.
    ///
    /// Returns `None` only if the connection has been dropped. After
    /// [`ConnectionEvent::Closed`] this waits forever.
    pub async fn recv(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }

    /// Close the connection and release the socket. Calling this more than
    /// once, or on a connection that never opened, is harmless.
    pub async fn close(&mut self) {
        // Dropping the sender lets the writer send a close frame and exit.
        self.outbound.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.lifecycle.mark_closed();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.abort();
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
