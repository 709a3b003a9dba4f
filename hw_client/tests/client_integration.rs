//! Integration tests for the hw_client driver.
//!
//! Each test runs the driver against a scripted table server on an
//! ephemeral local port and checks what goes over the wire.

use futures_util::{SinkExt, StreamExt};
use headwins::{SyncPhase, Username};
use hw_client::{
    app::{App, Flow},
    config::ClientConfig,
};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const WAIT: Duration = Duration::from_secs(5);
const ME: &str = "Player 7";

/// Spawn a one-client server. Frames the client sends come out of the
/// returned receiver, strings pushed into the returned sender go to the
/// client, and dropping the sender closes the socket.
async fn spawn_table() -> (String, mpsc::UnboundedReceiver<Value>, mpsc::UnboundedSender<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (received_tx, received_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        let (mut write, mut read) = ws.split();
        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let value: Value = serde_json::from_str(text.as_str()).unwrap();
                        let _ = received_tx.send(value);
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                },
                push = push_rx.recv() => match push {
                    Some(text) => {
                        if write.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = write.close().await;
                        break;
                    }
                },
            }
        }
    });

    (format!("ws://{addr}/ws"), received_rx, push_tx)
}

fn snapshot(committed: u32, threshold: u32, my_turn: bool) -> String {
    json!({
        "type": "game_state_update",
        "game_state": {
            "pot": 70,
            "board": [],
            "players": [
                {"username": "Player 3", "isActive": true, "isInHand": true,
                 "stack_size": 950, "money_commited_this_round": threshold, "your_turn": false},
                {"username": ME, "isActive": true, "isInHand": true,
                 "stack_size": 980, "money_commited_this_round": committed, "your_turn": my_turn}
            ],
            "small_blind": 10,
            "big_blind": 20,
            "threshold": threshold,
            "last_raise": 30,
            "started": true
        }
    })
    .to_string()
}

fn app_for(url: String) -> App<Vec<u8>> {
    App::with_output(
        ClientConfig {
            server_url: url,
            username: Username::new(ME),
        },
        Vec::new(),
    )
}

async fn next_frame(received: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    timeout(WAIT, received.recv())
        .await
        .expect("timed out waiting for a client frame")
        .expect("server went away")
}

async fn pump(app: &mut App<Vec<u8>>) -> Flow {
    timeout(WAIT, app.pump())
        .await
        .expect("timed out waiting for a connection event")
}

/// Connect, handle `Opened`, and consume the `join` frame.
async fn joined(url: String, received: &mut mpsc::UnboundedReceiver<Value>) -> App<Vec<u8>> {
    let mut app = app_for(url);
    app.connect().await.unwrap();
    assert_eq!(pump(&mut app).await, Flow::Continue);
    let join = next_frame(received).await;
    assert_eq!(join, json!({"type": "join", "username": ME}));
    app
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_join_then_raise_commits_total() {
    let (url, mut received, push) = spawn_table().await;
    let mut app = joined(url, &mut received).await;
    assert_eq!(app.session().phase(), SyncPhase::AwaitingState);

    push.send(r#"{"type":"new_round","hand":["Ah","Kd"]}"#.to_string())
        .unwrap();
    push.send(snapshot(20, 50, true)).unwrap();
    assert_eq!(pump(&mut app).await, Flow::Continue);
    assert_eq!(pump(&mut app).await, Flow::Continue);

    assert_eq!(app.session().phase(), SyncPhase::Synced);
    assert_eq!(app.session().hand(), ["Ah", "Kd"]);
    assert!(app.session().is_my_turn());

    app.handle_input("raise 30");
    assert_eq!(
        next_frame(&mut received).await,
        json!({"type": "commit_money", "username": ME, "amount": 50})
    );

    app.handle_input("call");
    assert_eq!(
        next_frame(&mut received).await,
        json!({"type": "commit_money", "amount": 50})
    );

    let out = String::from_utf8_lossy(app.output()).into_owned();
    assert!(out.contains("You were dealt: Ah, Kd"));
    assert!(out.contains("It's your turn!"));
    assert!(out.contains("You: Raise 30"));
}

#[tokio::test]
async fn test_rejected_actions_send_nothing() {
    let (url, mut received, push) = spawn_table().await;
    let mut app = joined(url, &mut received).await;

    push.send(snapshot(0, 20, false)).unwrap();
    pump(&mut app).await;

    // Off turn, bad amounts, and parse errors never reach the wire.
    app.handle_input("fold");
    app.handle_input("call");
    app.handle_input("raise 10");
    app.handle_input("raise");
    app.handle_input("dance");

    push.send(snapshot(0, 20, true)).unwrap();
    pump(&mut app).await;
    app.handle_input("raise abc");
    app.handle_input("raise -5");
    app.handle_input("raise 0");

    // Chat and start are always allowed, and come out next.
    app.handle_input("say gl hf");
    assert_eq!(
        next_frame(&mut received).await,
        json!({"type": "message", "username": ME, "text": "gl hf"})
    );
    app.handle_input("start");
    assert_eq!(
        next_frame(&mut received).await,
        json!({"type": "start_game", "username": ME})
    );

    app.handle_input("fold");
    assert_eq!(
        next_frame(&mut received).await,
        json!({"type": "fold", "username": ME})
    );
}

// ============================================================================
// Connection loss
// ============================================================================

#[tokio::test]
async fn test_server_close_stops_driver() {
    let (url, mut received, push) = spawn_table().await;
    let mut app = joined(url, &mut received).await;

    drop(push);
    assert_eq!(pump(&mut app).await, Flow::Stop);
    assert_eq!(app.session().phase(), SyncPhase::Disconnected);
    assert!(String::from_utf8_lossy(app.output()).contains("Disconnected"));

    // Typing after the table is gone is harmless.
    assert_eq!(app.handle_input("say anyone?"), Flow::Continue);
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and immediately release a port so nothing is listening on it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut app = app_for(format!("ws://127.0.0.1:{port}/ws"));

    let error = app.connect().await.unwrap_err();
    assert!(error.to_string().contains("Failed to connect"));
    assert_eq!(pump(&mut app).await, Flow::Stop);
    assert!(String::from_utf8_lossy(app.output()).contains("Disconnected"));
}
