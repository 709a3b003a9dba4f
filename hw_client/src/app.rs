//! The line-mode driver.
//!
//! [`App`] owns the session and the connection. It is the only place that
//! feeds events into the session and the only place that sends, so every
//! inbound frame and every typed command is handled to completion before
//! the next one.

use anyhow::{Context, Result};
use headwins::{
    Connection, RecordKind, Session, SessionEvent, codec,
    connection::ConnectionEvent,
    messages::{ClientMessage, ServerEvent},
};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

use crate::{
    commands::{HELP, UserCommand, parse_command},
    config::ClientConfig,
    render,
};

/// Whether the driver should keep going.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Stop,
}

enum Step {
    Event(Option<ConnectionEvent>),
    /// A typed line, or `None` once stdin is exhausted.
    Input(Option<String>),
}

pub struct App<W: Write> {
    session: Session,
    connection: Connection,
    out: W,
    /// Log records already written out.
    printed: usize,
    /// Log generation those records belong to.
    generation: u64,
    /// Last table written out, to skip redrawing an unchanged table.
    last_table: Option<String>,
}

impl App<io::Stdout> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> App<W> {
    /// Create an app that writes everything it shows to `out`.
    pub fn with_output(config: ClientConfig, out: W) -> Self {
        Self {
            session: Session::new(config.username),
            connection: Connection::new(config.server_url),
            out,
            printed: 0,
            generation: 0,
            last_table: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Open the connection.
    ///
    /// A failed attempt still queues the connection's `Closed` event, so the
    /// next [`App::pump`] reports the disconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection can't be opened.
    pub async fn connect(&mut self) -> Result<()> {
        self.emit(&format!(
            "Connecting to {} as {}...",
            self.connection.url(),
            self.session.username()
        ));
        self.connection
            .open()
            .await
            .with_context(|| format!("Failed to connect to {}", self.connection.url()))
    }

    /// Wait for and handle one connection event.
    pub async fn pump(&mut self) -> Flow {
        let event = self.connection.recv().await;
        self.handle_event(event)
    }

    /// Handle one connection event. `None` means the event source is gone.
    pub fn handle_event(&mut self, event: Option<ConnectionEvent>) -> Flow {
        match event {
            Some(ConnectionEvent::Opened) => {
                self.session.apply(SessionEvent::Connected);
                let join = ClientMessage::Join {
                    username: self.session.username().clone(),
                };
                self.connection.send(&join);
                self.session.apply(SessionEvent::Joined);
                self.emit("Connected! Waiting for the table...");
                Flow::Continue
            }
            Some(ConnectionEvent::Message(raw)) => {
                let was_my_turn = self.session.is_my_turn();
                let event = codec::decode(&raw);
                log::debug!("received {}", event.kind().unwrap_or("untyped frame"));
                let is_snapshot = matches!(event, ServerEvent::GameStateUpdate(_));
                self.session.apply(event.into());
                self.flush_log();
                if is_snapshot {
                    self.show_table(false);
                    if self.session.is_my_turn() && !was_my_turn {
                        self.show_controls();
                    }
                }
                Flow::Continue
            }
            Some(ConnectionEvent::Closed) | None => {
                self.session.apply(SessionEvent::Disconnected);
                self.flush_log();
                Flow::Stop
            }
        }
    }

    /// Handle one line typed by the player.
    pub fn handle_input(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        match parse_command(line) {
            Ok(UserCommand::Act(intent)) => {
                if let Some(message) = self.session.prepare(&intent) {
                    log::debug!("sending {message}");
                    self.connection.send(&message);
                }
                self.flush_log();
            }
            Ok(UserCommand::ShowState) => {
                self.show_table(true);
                self.show_controls();
            }
            Ok(UserCommand::Help) => self.emit(HELP.trim_end()),
            Ok(UserCommand::Quit) => return Flow::Stop,
            Err(error) => {
                self.session
                    .record_local(RecordKind::Warning, error.to_string());
                self.flush_log();
            }
        }
        Flow::Continue
    }

    /// Connect, then interleave server events and stdin lines until either
    /// side ends the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection can't be opened.
    pub async fn run(mut self) -> Result<()> {
        if let Err(error) = self.connect().await {
            // Report the queued disconnect before bailing.
            self.pump().await;
            return Err(error);
        }
        self.emit("Type 'help' for commands.");

        let mut lines = spawn_stdin_reader();
        loop {
            let step = tokio::select! {
                event = self.connection.recv() => Step::Event(event),
                line = lines.recv() => Step::Input(line),
            };
            let flow = match step {
                Step::Event(event) => self.handle_event(event),
                Step::Input(Some(line)) => self.handle_input(&line),
                Step::Input(None) => Flow::Stop,
            };
            if flow == Flow::Stop {
                break;
            }
        }

        self.connection.close().await;
        Ok(())
    }

    /// Write out log records that haven't been shown yet. A log reset
    /// starts over from the first record.
    fn flush_log(&mut self) {
        if self.session.log_generation() != self.generation {
            self.generation = self.session.log_generation();
            self.printed = 0;
        }
        let fresh: Vec<String> = self.session.log()[self.printed.min(self.session.log().len())..]
            .iter()
            .map(render::render_record)
            .collect();
        self.printed = self.session.log().len();
        for line in fresh {
            self.emit(&line);
        }
    }

    fn show_table(&mut self, force: bool) {
        let table = render::render_table(&self.session);
        if !force && self.last_table.as_deref() == Some(table.as_str()) {
            return;
        }
        self.emit(&table);
        self.last_table = Some(table);
    }

    fn show_controls(&mut self) {
        if let Some(controls) = render::render_controls(&self.session) {
            self.emit(&controls);
        }
    }

    fn emit(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}") {
            log::warn!("failed to write output: {error}");
        }
    }
}

/// Read stdin on its own thread, since a blocked read would otherwise hold
/// up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    log::warn!("failed to read input: {error}");
                    break;
                }
            }
        }
    });
    rx
}
