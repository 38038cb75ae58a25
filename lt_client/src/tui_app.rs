//! TUI application for the Lotería websocket client.
//!
//! Renders whichever screen the engine derives (join, name entry, lobby,
//! board, finished) and turns input-box commands into session or game
//! commands. All state flows through the engine's store; this module only
//! reads it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use loteria::{
    Commander, GameEvent, GamePhase, GameStore, Language, RoomCode, Screen, SessionControl,
    SessionView, SharedGameStore, Subscriptions, WinPattern, active_screen,
    constants::{DECK_SIZE, DRAW_SPEED_CHOICES, MANUAL_DRAW, TABLA_COLS},
};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Position, Rect},
    style::Stylize,
    symbols::scrollbar,
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, Clear, List, ListDirection, ListItem, Padding, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, Table,
    },
};
use std::{cell::RefCell, rc::Rc, time::Duration};
use tokio::time::sleep;

use crate::commands::{UiCommand, parse_command};
use crate::session::{ClientBus, Connection, Frame as WireFrame, Inbound, WsSession};

mod widgets;

use widgets::{ScrollableList, UserInput};

const HELP: &str = "\
join CODE
        Join the room with the 4-character code shown on the TV.
name NAME
        Pick your player name (2-20 characters).
mark N
        Mark board position N (1-16, top-left to bottom-right) once its
        card has been drawn.
loteria
        Claim a win. Only available after the win signal appears.
start [PATTERN] [SPEED]
        Host: start the game. PATTERN is line, corners, center, x, or
        full; SPEED is seconds between draws, 0 for manual.
draw
        Host: reveal the next card (manual draw only).
pause / resume
        Host: pause or resume the draws.
reset
        Host: end the round and return everyone to the lobby.
kick ID
        Host: remove a player from the room.
host ID
        Host: hand host duties to another player.
lang es|en
        Switch the card text language.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);
const DISCONNECT_LINGER: Duration = Duration::from_secs(2);

#[derive(Clone)]
enum RecordKind {
    Ack,
    Alert,
    Error,
    Game,
    You,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Game => "GAME".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        let content = Line::from(msg);
        ListItem::new(content)
    }
}

/// TUI app state.
pub struct TuiApp {
    store: SharedGameStore,
    commander: Commander,
    session: WsSession,
    bus: ClientBus,
    subscriptions: Option<Subscriptions>,
    connection: Connection,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
    /// Alerts raised by store subscribers, drained into the log each tick
    alerts: Rc<RefCell<Vec<String>>>,
    auto_join: Option<RoomCode>,
    auto_join_attempted: bool,
    auto_name: Option<String>,
    auto_name_attempted: bool,
}

impl TuiApp {
    pub fn new(
        connection: Connection,
        auto_join: Option<RoomCode>,
        auto_name: Option<String>,
        language: Language,
    ) -> Self {
        let store = GameStore::shared();
        store.borrow_mut().set_language(language);

        // Edge-triggered alert when the authority signals a claimable win.
        let alerts = Rc::new(RefCell::new(Vec::new()));
        {
            let alerts = Rc::clone(&alerts);
            let mut claim_was_open = false;
            store.borrow_mut().subscribe(move |state| {
                if state.show_win_claim && !claim_was_open {
                    alerts
                        .borrow_mut()
                        .push("¡Lotería! Type `loteria` to claim your win".to_string());
                }
                claim_was_open = state.show_win_claim;
            });
        }

        let mut bus = ClientBus::new(connection.outbound.clone());
        let subscriptions = Subscriptions::bind(&mut bus, &store);
        let session = WsSession::new(connection.outbound.clone());
        let commander = Commander::new(Rc::clone(&store));

        // Fill help menu with help text lines
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        Self {
            store,
            commander,
            session,
            bus,
            subscriptions: Some(subscriptions),
            connection,
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
            alerts,
            auto_join,
            auto_join_attempted: false,
            auto_name,
            auto_name_attempted: false,
        }
    }

    fn push_record(&mut self, kind: RecordKind, content: String) {
        self.log_handle.push(Record::new(kind, content).into());
    }

    /// One-shot auto join/name from the command line, attempted only once
    /// per process.
    fn drive_auto_join(&mut self) {
        if !self.auto_join_attempted
            && self.session.view().connected
            && let Some(code) = self.auto_join.clone()
        {
            self.auto_join_attempted = true;
            self.push_record(RecordKind::You, format!("join {code}"));
            if let Err(err) = self.session.join_room(&code) {
                self.push_record(RecordKind::Error, err.to_string());
            }
        }
        if !self.auto_name_attempted
            && self.session.view().in_room()
            && !self.session.view().has_name()
            && let Some(name) = self.auto_name.clone()
        {
            self.auto_name_attempted = true;
            self.push_record(RecordKind::You, format!("name {name}"));
            if let Err(err) = self.session.submit_name(&name) {
                self.push_record(RecordKind::Error, err.to_string());
            }
        }
    }

    /// Handle user input and send the resulting command.
    fn handle_input(&mut self, input: &str) {
        if input.is_empty() {
            return;
        }
        self.push_record(RecordKind::You, input.to_string());
        match parse_command(input) {
            Ok(command) => {
                if let Err(err) = self.apply_command(command) {
                    self.push_record(RecordKind::Error, err.to_string());
                }
            }
            Err(err) => self.push_record(RecordKind::Error, err.to_string()),
        }
    }

    fn apply_command(&mut self, command: UiCommand) -> Result<()> {
        let view = self.session.view().clone();
        match command {
            UiCommand::Join(code) => self.session.join_room(&code)?,
            UiCommand::Name(name) => self.session.submit_name(&name)?,
            UiCommand::Lang(language) => self.store.borrow_mut().set_language(language),
            UiCommand::Mark(position) => {
                let card_id = {
                    let store = self.store.borrow();
                    store.state().tabla.cell(position).map(|cell| cell.card.id)
                };
                match card_id {
                    Some(card_id) => self.commander.mark_card(&view, &mut self.bus, card_id)?,
                    None => anyhow::bail!("no card at position {}", position + 1),
                }
            }
            UiCommand::Claim => self.commander.claim_win(&view, &mut self.bus)?,
            UiCommand::Draw => {
                self.require_host(&view)?;
                self.commander.draw_card(&view, &mut self.bus)?;
            }
            UiCommand::Pause => {
                self.require_host(&view)?;
                self.commander.pause_game(&view, &mut self.bus)?;
            }
            UiCommand::Resume => {
                self.require_host(&view)?;
                self.commander.resume_game(&view, &mut self.bus)?;
            }
            UiCommand::Reset => {
                self.require_host(&view)?;
                self.commander.reset_game(&view, &mut self.bus)?;
            }
            UiCommand::Start {
                win_pattern,
                draw_speed_secs,
            } => {
                self.require_host(&view)?;
                let settings = self.store.borrow().state().settings.clone();
                let pattern = win_pattern
                    .or_else(|| settings.win_patterns.first().copied())
                    .unwrap_or_default();
                let speed = draw_speed_secs.unwrap_or(settings.draw_speed_secs);
                self.commander
                    .start_game(&view, &mut self.bus, pattern, speed)?;
            }
            UiCommand::Kick(player_id) => {
                self.require_host(&view)?;
                self.session.kick_player(&player_id)?;
            }
            UiCommand::MakeHost(player_id) => {
                self.require_host(&view)?;
                self.session.transfer_host(&player_id)?;
            }
        }
        Ok(())
    }

    /// Host commands are suppressed at the view layer; the authority also
    /// enforces this remotely.
    fn require_host(&self, view: &SessionView) -> Result<()> {
        if view.is_host() {
            Ok(())
        } else {
            anyhow::bail!("only the host can do that")
        }
    }

    fn handle_frame(&mut self, frame: &WireFrame) {
        if self.session.handle_frame(frame) {
            self.record_session_frame(frame);
            return;
        }
        if let Ok(Some(event)) = GameEvent::parse(&frame.event, &frame.data) {
            self.push_record(RecordKind::Game, event.to_string());
        }
        if !self.bus.dispatch(frame) {
            debug!("no handler for frame {}", frame.event);
        }
    }

    fn record_session_frame(&mut self, frame: &WireFrame) {
        let view = self.session.view();
        let record = match frame.event.as_str() {
            "room-joined" => view
                .room_code
                .as_ref()
                .map(|code| (RecordKind::Ack, format!("joined room {code}"))),
            "name-accepted" => view
                .player_name
                .as_ref()
                .map(|name| (RecordKind::Ack, format!("playing as {name}"))),
            "players-updated" => Some((
                RecordKind::Ack,
                format!("{} player(s) in the room", view.players.len()),
            )),
            "session-error" => view
                .error
                .as_ref()
                .map(|error| (RecordKind::Error, error.clone())),
            _ => None,
        };
        if let Some((kind, content)) = record {
            self.push_record(kind, content);
        }
    }

    fn drain_alerts(&mut self) {
        let pending: Vec<String> = self.alerts.borrow_mut().drain(..).collect();
        for alert in pending {
            self.push_record(RecordKind::Alert, alert);
        }
    }

    fn teardown(&mut self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions.unbind(&mut self.bus);
        }
        self.connection.close();
    }

    fn draw_join(&self, frame: &mut ratatui::Frame, area: Rect) {
        let view = self.session.view();
        let mut lines = vec![
            Line::from("Lotería".light_yellow().bold()),
            Line::from(""),
            Line::from("Enter the room code shown on the TV:"),
            Line::from("join CODE".bold().white()),
        ];
        if let Some(error) = &view.error {
            lines.push(Line::from(""));
            lines.push(Line::from(error.clone().light_red()));
        }
        let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" join a room  "),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_name_entry(&self, frame: &mut ratatui::Frame, area: Rect) {
        let view = self.session.view();
        let room = view.room_code.as_deref().unwrap_or("----");
        let lines = vec![
            Line::from(format!("room {room}").light_yellow()),
            Line::from(""),
            Line::from("What's your name?"),
            Line::from(format!("name {}", whoami::username()).bold().white()),
        ];
        let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" pick a name  "),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_lobby(&self, frame: &mut ratatui::Frame, area: Rect) {
        let view = self.session.view();
        let [roster_area, settings_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(area);

        let rows = view.players.iter().map(|player| {
            let host_repr = if Some(&player.id) == view.host_id.as_ref() {
                "★"
            } else {
                ""
            };
            let you_repr = if Some(&player.name) == view.player_name.as_ref() {
                "you"
            } else {
                ""
            };
            let mut row = Row::new(vec![
                Cell::new(Text::from(host_repr).alignment(Alignment::Center)),
                Cell::new(Text::from(player.name.clone()).alignment(Alignment::Left)),
                Cell::new(Text::from(player.id.clone()).alignment(Alignment::Left)),
                Cell::new(Text::from(you_repr).alignment(Alignment::Right)),
            ]);
            if Some(&player.name) == view.player_name.as_ref() {
                row = row.bold().white();
            }
            row
        });
        let roster = Table::new(
            rows,
            [
                Constraint::Max(3),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(1),
            ],
        )
        .block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(format!(
                    " room {}  ",
                    view.room_code.as_deref().unwrap_or("----")
                ))
                .title_bottom(format!(" {} player(s)  ", view.players.len())),
        );
        frame.render_widget(roster, roster_area);

        let store = self.store.borrow();
        let settings = &store.state().settings;
        let patterns = WinPattern::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let speeds = DRAW_SPEED_CHOICES
            .iter()
            .map(|&speed| {
                if speed == MANUAL_DRAW {
                    "manual".to_string()
                } else {
                    format!("{speed}s")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut lines = vec![
            Line::from(format!(
                "pattern: {}",
                settings
                    .win_patterns
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Line::from(if settings.is_manual_draw() {
                "draw: manual".to_string()
            } else {
                format!("draw: every {}s", settings.draw_speed_secs)
            }),
            Line::from(format!("language: {}", settings.language)),
            Line::from(""),
            Line::from(format!("patterns: {patterns}").dim()),
            Line::from(format!("speeds: {speeds}").dim()),
            Line::from(""),
        ];
        if view.is_host() {
            lines.push(Line::from("You are the host!".light_yellow()));
            lines.push(Line::from(vec![
                "Type ".into(),
                "start [pattern] [speed]".bold().white(),
                " when everyone is in".into(),
            ]));
        } else {
            lines.push(Line::from("Waiting for the host to start...".dim()));
        }
        let settings_panel = Paragraph::new(Text::from(lines)).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" game settings  "),
        );
        frame.render_widget(settings_panel, settings_area);
    }

    fn draw_board(&self, frame: &mut ratatui::Frame, area: Rect) {
        let store = self.store.borrow();
        let state = store.state();
        let view = self.session.view();
        let language = state.settings.language;

        let [grid_area, status_area] =
            Layout::vertical([Constraint::Min(6), Constraint::Length(3)]).areas(area);

        let rows = (0..TABLA_COLS).map(|row| {
            let cells = (0..TABLA_COLS).map(|col| {
                let position = row * TABLA_COLS + col;
                match state.tabla.cell(position) {
                    Some(cell) => {
                        let drawn = state.is_drawn(cell.card.id);
                        let status = if cell.marked {
                            "●"
                        } else if drawn {
                            "○"
                        } else {
                            ""
                        };
                        let mut text = Text::from(vec![
                            Line::from(format!("{:>2} {status}", position + 1)),
                            Line::from(cell.card.name(language).to_string()),
                        ]);
                        if cell.marked {
                            text = text.light_yellow().bold();
                        } else if drawn {
                            text = text.light_green();
                        }
                        Cell::new(text)
                    }
                    None => Cell::new(""),
                }
            });
            Row::new(cells).height(3)
        });

        let title = match state.current_card.as_ref() {
            Some(card) => format!(" current card: {}  ", card.name(language)),
            None => " waiting for the first draw  ".to_string(),
        };
        let mut bottom = format!(" {}/{} cards drawn  ", state.drawn_cards.len(), DECK_SIZE);
        if state.phase == GamePhase::Paused {
            bottom.push_str("· PAUSED  ");
        }
        let board = Table::new(rows, [Constraint::Percentage(25); TABLA_COLS])
            .block(
                Block::bordered()
                    .padding(Padding::uniform(1))
                    .title(title)
                    .title_bottom(bottom),
            );
        frame.render_widget(board, grid_area);

        let mut status_lines = Vec::new();
        if let Some(card) = state.current_card.as_ref() {
            let verse = card.verse(language);
            if !verse.is_empty() {
                status_lines.push(Line::from(format!("“{verse}”").dim().italic()));
            }
        }
        if state.pending_win_claim {
            status_lines.push(Line::from("Verifying your win...".light_yellow()));
        } else if state.show_win_claim {
            status_lines.push(Line::from(
                "¡LOTERÍA! Type `loteria` to claim".light_green().bold(),
            ));
        } else if state.phase == GamePhase::Paused && !view.is_host() {
            status_lines.push(Line::from("Game paused".light_yellow()));
        }
        if view.is_host() {
            let hint = if state.phase == GamePhase::Paused {
                "resume — continue the draws"
            } else if state.settings.is_manual_draw() {
                "draw — reveal the next card · pause — take a break"
            } else {
                "pause — stop the automatic draws"
            };
            status_lines.push(Line::from(hint.dim()));
        }
        frame.render_widget(Paragraph::new(Text::from(status_lines)), status_area);
    }

    fn draw_finished(&self, frame: &mut ratatui::Frame, area: Rect) {
        let store = self.store.borrow();
        let state = store.state();
        let view = self.session.view();
        let mut lines = vec![Line::from("Game Over".light_yellow().bold()), Line::from("")];
        match state.winner.as_ref() {
            Some(winner) => {
                lines.push(Line::from(
                    format!("¡Lotería! {} takes the round", winner.name)
                        .light_green()
                        .bold(),
                ));
                if !winner.pattern.is_empty() {
                    let positions = winner
                        .pattern
                        .iter()
                        .map(|position| (position + 1).to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    lines.push(Line::from(format!("winning cells: {positions}").dim()));
                }
            }
            None => lines.push(Line::from("The deck ran out with no winner.")),
        }
        lines.push(Line::from(""));
        if view.is_host() {
            lines.push(Line::from(vec![
                "Type ".into(),
                "reset".bold().white(),
                " to return everyone to the lobby".into(),
            ]));
        } else {
            lines.push(Line::from("Waiting for the host to reset...".dim()));
        }
        let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" results  "),
        );
        frame.render_widget(paragraph, area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area
    fn draw_user_input(&self, frame: &mut ratatui::Frame, area: Rect) {
        let view = self.session.view();
        let title = format!(
            " {}@{}  ",
            view.player_name.as_deref().unwrap_or("anon"),
            view.room_code.as_deref().unwrap_or("----"),
        );
        let user_input = Paragraph::new(self.user_input.value.as_str())
            .block(Block::bordered().title(title.light_green()));
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut ratatui::Frame, area: Rect) {
        let status_indicator = if self.session.view().connected {
            "● Connected".green()
        } else {
            "● Disconnected".red()
        };

        let help_message = vec![
            status_indicator,
            " | press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to record a command, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        let help_message = Paragraph::new(Line::from(help_message));
        frame.render_widget(help_message, area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut ratatui::Frame) {
        let vertical = Layout::vertical([Constraint::Max(29)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(92)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" commands  "));
        frame.render_stateful_widget(help_items, help_menu_area, &mut self.help_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    /// Main draw function - orchestrates rendering of all UI components
    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Top area (screen + log)
            Constraint::Length(3), // User input area
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, user_input_area, help_area] = window.areas(frame.area());

        let [screen_area, log_area] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(top_area);

        let phase = self.store.borrow().state().phase;
        match active_screen(phase, self.session.view()) {
            Screen::JoinRoom => self.draw_join(frame, screen_area),
            Screen::NameEntry => self.draw_name_entry(frame, screen_area),
            Screen::Lobby => self.draw_lobby(frame, screen_area),
            Screen::Board => self.draw_board(frame, screen_area),
            Screen::Finished => self.draw_finished(frame, screen_area),
        }
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            self.drive_auto_join();
            terminal.draw(|frame| self.draw(frame))?;

            // Check for keyboard input
            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match modifiers {
                    KeyModifiers::CONTROL => match code {
                        KeyCode::Home => self.log_handle.jump_to_first(),
                        KeyCode::End => self.log_handle.jump_to_last(),
                        _ => {}
                    },
                    KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
                        KeyCode::Enter => {
                            let user_input = self.user_input.submit();
                            self.handle_input(&user_input);
                        }
                        KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                        KeyCode::Backspace => self.user_input.backspace(),
                        KeyCode::Delete => self.user_input.delete(),
                        KeyCode::Left => self.user_input.move_left(),
                        KeyCode::Right => self.user_input.move_right(),
                        KeyCode::Up => {
                            if self.show_help_menu {
                                self.help_handle.move_up();
                            } else {
                                self.log_handle.move_up();
                            }
                        }
                        KeyCode::Down => {
                            if self.show_help_menu {
                                self.help_handle.move_down();
                            } else {
                                self.log_handle.move_down();
                            }
                        }
                        KeyCode::Home => self.user_input.jump_to_first(),
                        KeyCode::End => self.user_input.jump_to_last(),
                        KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                        KeyCode::Esc => {
                            self.teardown();
                            return Ok(());
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }

            // Pump inbound frames into the session adapter and the engine
            loop {
                match self.connection.inbound.try_recv() {
                    Ok(Inbound::Frame(frame)) => self.handle_frame(&frame),
                    Ok(Inbound::Closed(reason)) => {
                        if let Some(subscriptions) = self.subscriptions.take() {
                            subscriptions.unbind(&mut self.bus);
                        }
                        self.session.mark_disconnected(reason.clone());
                        self.push_record(RecordKind::Error, reason);
                        terminal.draw(|frame| self.draw(frame))?;
                        sleep(DISCONNECT_LINGER).await;
                        self.connection.close();
                        return Ok(());
                    }
                    Err(_) => break,
                }
            }

            self.drain_alerts();
        }
    }
}
