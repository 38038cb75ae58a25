//! Websocket-backed session collaborator.
//!
//! Everything here is a thin pass-through: frames move between the socket
//! and the UI task over channels, roster and identity signals are folded
//! into a [`SessionView`], and the game stream is handed untouched to the
//! engine's subscription manager via [`ClientBus`].

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use log::warn;
use loteria::{
    Player, RoomCode, SessionControl, SessionError, SessionView,
    session::{EventBus, EventHandler, ListenerId},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// One websocket text frame: a named event with a JSON payload.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Messages delivered from the socket tasks into the UI task.
#[derive(Debug)]
pub enum Inbound {
    Frame(Frame),
    Closed(String),
}

/// A live websocket connection: an outbound frame sender plus the inbound
/// frame stream, with the socket pumped by two background tasks.
pub struct Connection {
    pub outbound: mpsc::UnboundedSender<Frame>,
    pub inbound: mpsc::UnboundedReceiver<Inbound>,
    read_handle: JoinHandle<()>,
    write_handle: JoinHandle<()>,
}

impl Connection {
    /// Connect to the session server and start pumping frames.
    pub async fn open(ws_url: &str) -> Result<Self> {
        let (ws_stream, _) = connect_async(ws_url)
            .await
            .context("failed to connect to session server")?;
        let (mut write, mut read) = ws_stream.split();

        let (outbound, mut rx_out) = mpsc::unbounded_channel::<Frame>();
        let (tx_in, inbound) = mpsc::unbounded_channel::<Inbound>();

        let write_handle = tokio::spawn(async move {
            while let Some(frame) = rx_out.recv().await {
                if let Ok(json) = serde_json::to_string(&frame)
                    && write.send(Message::Text(json.into())).await.is_err()
                {
                    break;
                }
            }
        });

        let read_handle = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(&text) {
                        Ok(frame) => {
                            let _ = tx_in.send(Inbound::Frame(frame));
                        }
                        Err(err) => warn!("dropping unparseable frame: {err}"),
                    },
                    Ok(Message::Close(_)) => {
                        let _ = tx_in.send(Inbound::Closed("server closed connection".to_string()));
                        break;
                    }
                    Err(err) => {
                        let _ = tx_in.send(Inbound::Closed(format!("websocket error: {err}")));
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            outbound,
            inbound,
            read_handle,
            write_handle,
        })
    }

    pub fn close(&self) {
        self.read_handle.abort();
        self.write_handle.abort();
    }
}

/// [`EventBus`] implementation over the outbound channel plus an in-task
/// handler registry. Frames are dispatched synchronously in the UI task, so
/// the engine stays single-threaded.
pub struct ClientBus {
    outbound: mpsc::UnboundedSender<Frame>,
    handlers: HashMap<String, Vec<(ListenerId, EventHandler)>>,
    next_id: u64,
}

impl ClientBus {
    pub fn new(outbound: mpsc::UnboundedSender<Frame>) -> Self {
        Self {
            outbound,
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Invoke the handlers registered for this frame's event. Returns
    /// whether any handler was registered.
    pub fn dispatch(&mut self, frame: &Frame) -> bool {
        match self.handlers.get_mut(&frame.event) {
            Some(listeners) if !listeners.is_empty() => {
                for (_, handler) in listeners.iter_mut() {
                    handler(&frame.data);
                }
                true
            }
            _ => false,
        }
    }
}

impl EventBus for ClientBus {
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SessionError> {
        self.outbound
            .send(Frame::new(event, payload))
            .map_err(|_| SessionError::NotConnected)
    }

    fn on(&mut self, event: &str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for listeners in self.handlers.values_mut() {
            let before = listeners.len();
            listeners.retain(|(listener_id, _)| *listener_id != id);
            removed |= listeners.len() != before;
        }
        removed
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomJoinedPayload {
    room_code: String,
    #[serde(default)]
    player_id: Option<String>,
}

#[derive(Deserialize)]
struct NameAcceptedPayload {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayersUpdatedPayload {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    host_id: Option<String>,
}

#[derive(Deserialize)]
struct SessionErrorPayload {
    message: String,
}

/// Identity and roster state of the websocket session, fed by the
/// session-level frames the server interleaves with the game stream.
pub struct WsSession {
    view: SessionView,
    outbound: mpsc::UnboundedSender<Frame>,
}

impl WsSession {
    pub fn new(outbound: mpsc::UnboundedSender<Frame>) -> Self {
        Self {
            view: SessionView {
                connected: true,
                ..SessionView::default()
            },
            outbound,
        }
    }

    #[must_use]
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    pub fn mark_disconnected(&mut self, reason: String) {
        self.view.connected = false;
        self.view.error = Some(reason);
    }

    /// Consume a session-level frame, updating the view. Returns false when
    /// the frame belongs to the game stream instead.
    pub fn handle_frame(&mut self, frame: &Frame) -> bool {
        match frame.event.as_str() {
            "room-joined" => {
                match RoomJoinedPayload::deserialize(&frame.data) {
                    Ok(payload) => {
                        self.view.room_code = Some(payload.room_code);
                        if payload.player_id.is_some() {
                            self.view.player_id = payload.player_id;
                        }
                        self.view.error = None;
                    }
                    Err(err) => warn!("malformed room-joined frame: {err}"),
                }
                true
            }
            "name-accepted" => {
                match NameAcceptedPayload::deserialize(&frame.data) {
                    Ok(payload) => self.view.player_name = Some(payload.name),
                    Err(err) => warn!("malformed name-accepted frame: {err}"),
                }
                true
            }
            "players-updated" => {
                match PlayersUpdatedPayload::deserialize(&frame.data) {
                    Ok(payload) => {
                        self.view.players = payload.players;
                        self.view.host_id = payload.host_id;
                    }
                    Err(err) => warn!("malformed players-updated frame: {err}"),
                }
                true
            }
            "session-error" => {
                match SessionErrorPayload::deserialize(&frame.data) {
                    Ok(payload) => self.view.error = Some(payload.message),
                    Err(err) => warn!("malformed session-error frame: {err}"),
                }
                true
            }
            _ => false,
        }
    }

    fn send(&self, event: &str, data: Value) -> Result<(), SessionError> {
        if !self.view.connected {
            return Err(SessionError::NotConnected);
        }
        self.outbound
            .send(Frame::new(event, data))
            .map_err(|_| SessionError::NotConnected)
    }
}

impl SessionControl for WsSession {
    fn join_room(&mut self, code: &RoomCode) -> Result<(), SessionError> {
        self.send("join-room", json!({ "code": code.as_str() }))
    }

    fn submit_name(&mut self, name: &str) -> Result<(), SessionError> {
        let name = loteria::session::validate_player_name(name)?;
        self.send("submit-name", json!({ "name": name }))
    }

    fn kick_player(&mut self, player_id: &str) -> Result<(), SessionError> {
        self.send("kick-player", json!({ "playerId": player_id }))
    }

    fn transfer_host(&mut self, player_id: &str) -> Result<(), SessionError> {
        self.send("transfer-host", json!({ "playerId": player_id }))
    }
}
