use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hotel_core::{
    forms::{format_date, ROOM_KINDS},
    reports::{self, format_currency, ReportKind},
    AppConfig, ClientForm, HotelStore, ReservationForm, RoomForm, StoreError,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::widgets::{clamp_cursor, step_cursor, Picker, TextInput};

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Clients,
    Rooms,
    Reservations,
    Reports,
}

impl Screen {
    const ALL: [Screen; 4] = [
        Screen::Clients,
        Screen::Rooms,
        Screen::Reservations,
        Screen::Reports,
    ];

    fn title(self) -> &'static str {
        match self {
            Screen::Clients => "Clients",
            Screen::Rooms => "Rooms",
            Screen::Reservations => "Reservations",
            Screen::Reports => "Reports",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|screen| *screen == self)
            .unwrap_or(0)
    }

    fn shifted(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

/// Whether the last status message reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Error,
}

enum AppEvent {
    Input(Event),
    Tick,
}

struct ClientsScreen {
    name: TextInput,
    phone: TextInput,
    email: TextInput,
    focus: usize,
    cursor: usize,
}

impl ClientsScreen {
    const TABLE: usize = 3;

    fn new() -> Self {
        Self {
            name: TextInput::new("Full name"),
            phone: TextInput::new("Phone"),
            email: TextInput::new("E-mail"),
            focus: 0,
            cursor: 0,
        }
    }

    fn form(&self) -> ClientForm {
        ClientForm {
            name: self.name.value().to_string(),
            phone: self.phone.value().to_string(),
            email: self.email.value().to_string(),
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            0 => Some(&mut self.name),
            1 => Some(&mut self.phone),
            2 => Some(&mut self.email),
            _ => None,
        }
    }

    fn clear(&mut self) {
        self.name.clear();
        self.phone.clear();
        self.email.clear();
    }
}

struct RoomsScreen {
    number: TextInput,
    kind: Picker<&'static str>,
    price: TextInput,
    focus: usize,
    cursor: usize,
}

impl RoomsScreen {
    const KIND: usize = 1;
    const TABLE: usize = 3;

    fn new() -> Self {
        let mut kind = Picker::new("Type");
        kind.set_options(
            ROOM_KINDS
                .iter()
                .map(|kind| (*kind, kind.to_string()))
                .collect(),
        );
        Self {
            number: TextInput::new("Number"),
            kind,
            price: TextInput::new("Nightly price"),
            focus: 0,
            cursor: 0,
        }
    }

    fn form(&self) -> RoomForm {
        RoomForm {
            number: self.number.value().to_string(),
            kind: self.kind.selected().map(|kind| kind.to_string()).unwrap_or_default(),
            price: self.price.value().to_string(),
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            0 => Some(&mut self.number),
            2 => Some(&mut self.price),
            _ => None,
        }
    }

    fn clear(&mut self) {
        self.number.clear();
        self.kind.clear();
        self.price.clear();
    }
}

struct ReservationsScreen {
    client: Picker<String>,
    room: Picker<u32>,
    checkin: TextInput,
    checkout: TextInput,
    quote: Option<f64>,
    focus: usize,
    cursor: usize,
}

impl ReservationsScreen {
    const CLIENT: usize = 0;
    const ROOM: usize = 1;
    const TABLE: usize = 4;

    fn new() -> Self {
        Self {
            client: Picker::new("Client"),
            room: Picker::new("Available room"),
            checkin: TextInput::new("Check-in (dd/mm/yyyy)"),
            checkout: TextInput::new("Check-out (dd/mm/yyyy)"),
            quote: None,
            focus: 0,
            cursor: 0,
        }
    }

    fn form(&self) -> ReservationForm {
        ReservationForm {
            client_id: self.client.selected().cloned(),
            room_number: self.room.selected().copied(),
            checkin: self.checkin.value().to_string(),
            checkout: self.checkout.value().to_string(),
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            2 => Some(&mut self.checkin),
            3 => Some(&mut self.checkout),
            _ => None,
        }
    }

    fn clear(&mut self) {
        self.client.clear();
        self.room.clear();
        self.checkin.clear();
        self.checkout.clear();
        self.quote = None;
    }
}

struct ReportsScreen {
    kind: Picker<ReportKind>,
    rows: Vec<(String, String)>,
}

impl ReportsScreen {
    fn new() -> Self {
        let mut kind = Picker::new("Report");
        kind.set_options(
            ReportKind::ALL
                .iter()
                .map(|kind| (*kind, kind.label().to_string()))
                .collect(),
        );
        Self {
            kind,
            rows: Vec::new(),
        }
    }
}

/// One line of a rendered form.
struct FieldView<'a> {
    label: &'a str,
    value: String,
    cursor: Option<usize>,
}

/// Interactive shell over a [`HotelStore`].
pub struct HotelApp {
    store: HotelStore,
    config: AppConfig,
    theme: Theme,
    screen: Screen,
    status: String,
    tone: Tone,
    should_quit: bool,
    clients: ClientsScreen,
    rooms: RoomsScreen,
    reservations: ReservationsScreen,
    reports: ReportsScreen,
}

impl HotelApp {
    pub fn new(store: HotelStore, config: AppConfig, status: String) -> Self {
        let mut app = Self {
            store,
            config,
            theme: Theme::default(),
            screen: Screen::Clients,
            status,
            tone: Tone::Info,
            should_quit: false,
            clients: ClientsScreen::new(),
            rooms: RoomsScreen::new(),
            reservations: ReservationsScreen::new(),
            reports: ReportsScreen::new(),
        };
        app.refresh_reservation_options();
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx, self.config.tick_rate());

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        info!("Hotel manager closed");
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.tone = Tone::Info;
    }

    fn set_success(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.tone = Tone::Success;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.tone = Tone::Error;
    }

    fn report_store_error(&mut self, err: StoreError) {
        error!(?err, "Store operation failed");
        match err {
            StoreError::Persist { .. } | StoreError::Serialize(_) => {
                self.set_error(format!("Change kept in memory but not saved: {err}"))
            }
            other => self.set_error(format!("Error: {other}")),
        }
    }

    /// Rebuild the reservation pickers from current store contents.
    fn refresh_reservation_options(&mut self) {
        let clients = self
            .store
            .clients()
            .iter()
            .map(|client| (client.id.clone(), client.display_name()))
            .collect();
        let rooms = self
            .store
            .available_rooms()
            .map(|room| (room.number, room.display_name()))
            .collect();
        self.reservations.client.set_options(clients);
        self.reservations.room.set_options(rooms);
    }

    fn handle_input(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if self.handle_global_shortcut(&key) {
            return;
        }
        match self.screen {
            Screen::Clients => self.handle_clients_key(key),
            Screen::Rooms => self.handle_rooms_key(key),
            Screen::Reservations => self.handle_reservations_key(key),
            Screen::Reports => self.handle_reports_key(key),
        }
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        if let Some(screen) = screen_for_key(self.screen, key) {
            self.switch_screen(screen);
            return true;
        }
        let quit = match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => key.modifiers == KeyModifiers::CONTROL,
            KeyCode::Esc => true,
            _ => false,
        };
        self.should_quit |= quit;
        quit
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        if screen == Screen::Reservations {
            self.refresh_reservation_options();
        }
        debug!(screen = screen.title(), "Screen switched");
        self.set_status(format!("{} screen", screen.title()));
    }

    fn handle_clients_key(&mut self, key: KeyEvent) {
        let screen = &mut self.clients;
        match key.code {
            KeyCode::Tab => screen.focus = (screen.focus + 1) % (ClientsScreen::TABLE + 1),
            KeyCode::BackTab => {
                screen.focus = (screen.focus + ClientsScreen::TABLE) % (ClientsScreen::TABLE + 1)
            }
            _ if screen.focus == ClientsScreen::TABLE => {
                let len = self.store.clients().len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        screen.cursor = step_cursor(screen.cursor, -1, len)
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        screen.cursor = step_cursor(screen.cursor, 1, len)
                    }
                    KeyCode::Char('e') => self.edit_selected_client(),
                    KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_client(),
                    _ => {}
                }
            }
            KeyCode::Enter => self.register_client(),
            _ => {
                if let Some(input) = screen.focused_input() {
                    edit_text(input, key);
                }
            }
        }
    }

    fn register_client(&mut self) {
        let client = match self.clients.form().validate() {
            Ok(client) => client,
            Err(err) => return self.set_error(err.to_string()),
        };
        let name = client.name.clone();
        match self.store.add_client(client) {
            Ok(()) => {
                self.clients.clear();
                self.clients.focus = 0;
                self.set_success(format!("Client {name} registered"));
            }
            Err(err) => self.report_store_error(err),
        }
        self.refresh_reservation_options();
    }

    fn edit_selected_client(&mut self) {
        let cursor = clamp_cursor(self.clients.cursor, self.store.clients().len());
        let Some(client) = self.store.clients().get(cursor) else {
            return self.set_status("No client selected");
        };
        let form = ClientForm::from_client(client);
        self.clients.name.set(form.name);
        self.clients.phone.set(form.phone);
        self.clients.email.set(form.email);
        self.clients.focus = 0;
        self.set_status("Form filled from selected client");
    }

    fn remove_selected_client(&mut self) {
        let cursor = clamp_cursor(self.clients.cursor, self.store.clients().len());
        let Some(client) = self.store.clients().get(cursor) else {
            return self.set_status("No client selected");
        };
        let (id, name) = (client.id.clone(), client.name.clone());
        match self.store.remove_client(&id) {
            Ok(()) => self.set_success(format!("Client {name} removed")),
            Err(err) => self.report_store_error(err),
        }
        self.clients.cursor = clamp_cursor(cursor, self.store.clients().len());
        self.refresh_reservation_options();
    }

    fn handle_rooms_key(&mut self, key: KeyEvent) {
        let screen = &mut self.rooms;
        match key.code {
            KeyCode::Tab => screen.focus = (screen.focus + 1) % (RoomsScreen::TABLE + 1),
            KeyCode::BackTab => {
                screen.focus = (screen.focus + RoomsScreen::TABLE) % (RoomsScreen::TABLE + 1)
            }
            _ if screen.focus == RoomsScreen::TABLE => {
                let len = self.store.rooms().len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        screen.cursor = step_cursor(screen.cursor, -1, len)
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        screen.cursor = step_cursor(screen.cursor, 1, len)
                    }
                    KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_room(),
                    _ => {}
                }
            }
            KeyCode::Enter => self.register_room(),
            KeyCode::Left if screen.focus == RoomsScreen::KIND => screen.kind.cycle(-1),
            KeyCode::Right if screen.focus == RoomsScreen::KIND => screen.kind.cycle(1),
            _ => {
                if let Some(input) = screen.focused_input() {
                    edit_text(input, key);
                }
            }
        }
    }

    fn register_room(&mut self) {
        let room = match self.rooms.form().validate() {
            Ok(room) => room,
            Err(err) => return self.set_error(err.to_string()),
        };
        let number = room.number;
        match self.store.add_room(room) {
            Ok(()) => {
                self.rooms.clear();
                self.rooms.focus = 0;
                self.set_success(format!("Room {number} registered"));
            }
            Err(err) => self.report_store_error(err),
        }
        self.refresh_reservation_options();
    }

    fn remove_selected_room(&mut self) {
        let cursor = clamp_cursor(self.rooms.cursor, self.store.rooms().len());
        if self.store.rooms().is_empty() {
            return self.set_status("No room selected");
        }
        match self.store.remove_room_at(cursor) {
            Ok(Some(room)) => self.set_success(format!("Room {} removed", room.number)),
            Ok(None) => self.set_status("No room selected"),
            Err(err) => self.report_store_error(err),
        }
        self.rooms.cursor = clamp_cursor(cursor, self.store.rooms().len());
        self.refresh_reservation_options();
    }

    fn handle_reservations_key(&mut self, key: KeyEvent) {
        let screen = &mut self.reservations;
        match key.code {
            KeyCode::Tab => {
                screen.focus = (screen.focus + 1) % (ReservationsScreen::TABLE + 1)
            }
            KeyCode::BackTab => {
                screen.focus = (screen.focus + ReservationsScreen::TABLE)
                    % (ReservationsScreen::TABLE + 1)
            }
            KeyCode::F(5) => self.calculate_quote(),
            _ if screen.focus == ReservationsScreen::TABLE => {
                let len = self.store.reservations().len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        screen.cursor = step_cursor(screen.cursor, -1, len)
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        screen.cursor = step_cursor(screen.cursor, 1, len)
                    }
                    _ => {}
                }
            }
            KeyCode::Enter => self.confirm_reservation(),
            KeyCode::Left | KeyCode::Right if screen.focus <= ReservationsScreen::ROOM => {
                let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                if screen.focus == ReservationsScreen::CLIENT {
                    screen.client.cycle(delta);
                } else {
                    screen.room.cycle(delta);
                }
                screen.quote = None;
            }
            _ => {
                if let Some(input) = screen.focused_input() {
                    edit_text(input, key);
                    screen.quote = None;
                }
            }
        }
    }

    fn calculate_quote(&mut self) {
        let form = self.reservations.form();
        let dates = form.dates();
        let room = form.room_number.and_then(|number| self.store.room(number));
        match (dates, room) {
            (Err(err), _) => self.set_error(err.to_string()),
            (Ok(_), None) => self.set_error("Select a room first"),
            (Ok((checkin, checkout)), Some(room)) => {
                let total = reports::quote(room, checkin, checkout);
                self.reservations.quote = Some(total);
                self.set_status(format!("Total: {}", format_currency(total)));
            }
        }
    }

    fn confirm_reservation(&mut self) {
        let request = match self.reservations.form().validate(&self.store) {
            Ok(request) => request,
            Err(err) => return self.set_error(format!("Reservation failed: {err}")),
        };
        match self.store.make_reservation(
            &request.client_id,
            request.room_number,
            request.checkin,
            request.checkout,
        ) {
            Ok(reservation) => {
                self.reservations.clear();
                self.reservations.focus = 0;
                self.set_success(format!(
                    "Reservation confirmed: room {} for {}",
                    reservation.room_number,
                    format_currency(reservation.total)
                ));
            }
            Err(err) => self.report_store_error(err),
        }
        self.refresh_reservation_options();
    }

    fn handle_reports_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.reports.kind.cycle(-1),
            KeyCode::Right => self.reports.kind.cycle(1),
            KeyCode::Enter => {
                let Some(kind) = self.reports.kind.selected().copied() else {
                    return self.set_error("Choose a report type");
                };
                self.reports.rows = kind.rows(&self.store);
                self.set_status(format!("{} report generated", kind.label()));
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_tabs(frame, rows[0]);
        match self.screen {
            Screen::Clients => self.draw_clients(frame, rows[1]),
            Screen::Rooms => self.draw_rooms(frame, rows[1]),
            Screen::Reservations => self.draw_reservations(frame, rows[1]),
            Screen::Reports => self.draw_reports(frame, rows[1]),
        }
        self.render_help(frame, rows[2]);
        self.render_status(frame, rows[3]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::ALL
            .iter()
            .enumerate()
            .map(|(idx, screen)| Line::from(format!("F{} {}", idx + 1, screen.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.config.hotel_name.clone()),
            )
            .select(self.screen.index())
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn split_form(area: Rect, fields: usize) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(fields as u16 + 2), Constraint::Min(3)])
            .split(area);
        (chunks[0], chunks[1])
    }

    fn draw_clients(&mut self, frame: &mut Frame, area: Rect) {
        let (form_area, table_area) = Self::split_form(area, 3);
        let screen = &self.clients;
        let fields = [&screen.name, &screen.phone, &screen.email].map(text_field);
        self.render_form(frame, form_area, "Register client", &fields, screen.focus);

        let rows: Vec<Row> = self
            .store
            .clients()
            .iter()
            .map(|client| {
                Row::new(vec![
                    Cell::from(client.name.clone()),
                    Cell::from(client.phone.clone()),
                    Cell::from(client.email.clone()),
                ])
            })
            .collect();
        self.render_table(
            frame,
            table_area,
            "Clients",
            ["Name", "Phone", "E-mail"].as_slice(),
            &[
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(40),
            ],
            rows,
            screen.cursor,
            screen.focus == ClientsScreen::TABLE,
        );
    }

    fn draw_rooms(&mut self, frame: &mut Frame, area: Rect) {
        let (form_area, table_area) = Self::split_form(area, 3);
        let screen = &self.rooms;
        let fields = [
            text_field(&screen.number),
            picker_field(&screen.kind),
            text_field(&screen.price),
        ];
        self.render_form(frame, form_area, "Register room", &fields, screen.focus);

        let rows: Vec<Row> = self
            .store
            .rooms()
            .iter()
            .map(|room| {
                let (label, color) = if room.available {
                    ("Yes", self.theme.success)
                } else {
                    ("No", self.theme.danger)
                };
                Row::new(vec![
                    Cell::from(room.number.to_string()),
                    Cell::from(room.kind.clone()),
                    Cell::from(format_currency(room.price)),
                    Cell::from(Span::styled(label, Style::default().fg(color))),
                ])
            })
            .collect();
        self.render_table(
            frame,
            table_area,
            "Rooms",
            ["Number", "Type", "Price", "Available"].as_slice(),
            &[
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
            ],
            rows,
            screen.cursor,
            screen.focus == RoomsScreen::TABLE,
        );
    }

    fn draw_reservations(&mut self, frame: &mut Frame, area: Rect) {
        let (form_area, table_area) = Self::split_form(area, 5);
        let screen = &self.reservations;
        let quote = match screen.quote {
            Some(total) => format_currency(total),
            None => "press F5 to calculate".to_string(),
        };
        let fields = [
            picker_field(&screen.client),
            picker_field(&screen.room),
            text_field(&screen.checkin),
            text_field(&screen.checkout),
            FieldView {
                label: "Total",
                value: quote,
                cursor: None,
            },
        ];
        // The table shares an index with the read-only total row.
        let focus = if screen.focus == ReservationsScreen::TABLE {
            usize::MAX
        } else {
            screen.focus
        };
        self.render_form(frame, form_area, "New reservation", &fields, focus);

        let rows: Vec<Row> = self
            .store
            .reservations()
            .iter()
            .map(|reservation| {
                let client = self
                    .store
                    .client(&reservation.client_id)
                    .map(|client| client.name.clone())
                    .unwrap_or_else(|| "(removed client)".to_string());
                let room = match self.store.room(reservation.room_number) {
                    Some(room) => format!("{} ({})", room.number, room.kind),
                    None => format!("{} (removed)", reservation.room_number),
                };
                Row::new(vec![
                    Cell::from(client),
                    Cell::from(room),
                    Cell::from(format!(
                        "{} a {}",
                        format_date(reservation.checkin),
                        format_date(reservation.checkout)
                    )),
                    Cell::from(format_currency(reservation.total)),
                    Cell::from(reservation.status.clone()),
                ])
            })
            .collect();
        self.render_table(
            frame,
            table_area,
            "Active reservations",
            ["Client", "Room", "Period", "Value", "Status"].as_slice(),
            &[
                Constraint::Percentage(25),
                Constraint::Percentage(20),
                Constraint::Percentage(25),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
            ],
            rows,
            screen.cursor,
            screen.focus == ReservationsScreen::TABLE,
        );
    }

    fn draw_reports(&mut self, frame: &mut Frame, area: Rect) {
        let (form_area, table_area) = Self::split_form(area, 1);
        let fields = [picker_field(&self.reports.kind)];
        self.render_form(frame, form_area, "Report type", &fields, 0);

        let rows: Vec<Row> = self
            .reports
            .rows
            .iter()
            .map(|(description, value)| {
                Row::new(vec![Cell::from(description.clone()), Cell::from(value.clone())])
            })
            .collect();
        self.render_table(
            frame,
            table_area,
            "Report",
            ["Description", "Value"].as_slice(),
            &[Constraint::Percentage(60), Constraint::Percentage(40)],
            rows,
            0,
            false,
        );
    }

    fn render_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        fields: &[FieldView],
        focus: usize,
    ) {
        let label_width = fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let focused = idx == focus;
                let marker = if focused {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                Line::from(vec![
                    marker,
                    Span::styled(format!("{:<label_width$}: ", field.label), label_style),
                    Span::styled(
                        field.value.clone(),
                        Style::default().fg(self.theme.primary_fg),
                    ),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(paragraph, area);

        if let Some(cursor) = fields.get(focus).and_then(|field| field.cursor) {
            // border + marker + padded label + ": "
            let offset = 1 + 2 + label_width + 2 + cursor;
            let x = (area.x + offset as u16).min(area.x + area.width.saturating_sub(2));
            let y = area.y + 1 + focus as u16;
            frame.set_cursor(x, y);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        header: &[&str],
        widths: &[Constraint],
        rows: Vec<Row>,
        cursor: usize,
        focused: bool,
    ) {
        let total = rows.len();
        let mut table_state = TableState::default();
        if focused && total > 0 {
            table_state.select(Some(clamp_cursor(cursor, total)));
        }

        let header = Row::new(header.iter().map(|title| Cell::from(title.to_string())))
            .style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default()
        };
        let table = Table::new(rows, widths.to_vec())
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!("{title} ({total})")),
            )
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let keys = match self.screen {
            Screen::Clients => "Tab next field  Enter register  table: j/k move  e edit  d delete",
            Screen::Rooms => "Tab next field  ←/→ type  Enter register  table: j/k move  d delete",
            Screen::Reservations => "Tab next field  ←/→ choose  F5 calculate total  Enter confirm",
            Screen::Reports => "←/→ report type  Enter generate",
        };
        let paragraph = Paragraph::new(Line::from(vec![
            Span::raw(keys),
            Span::styled(
                "  F1-F4 screens  Esc quit",
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let color = match self.tone {
            Tone::Info => self.theme.primary_fg,
            Tone::Success => self.theme.success,
            Tone::Error => self.theme.danger,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Status · {}", self.store.path().display()));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            self.status.clone(),
            Style::default().fg(color),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn text_field(input: &TextInput) -> FieldView<'_> {
    FieldView {
        label: input.label,
        value: input.value().to_string(),
        cursor: Some(input.cursor()),
    }
}

fn picker_field<K: Clone + PartialEq>(picker: &Picker<K>) -> FieldView<'_> {
    FieldView {
        label: picker.label,
        value: picker.display(),
        cursor: None,
    }
}

fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Left => input.move_cursor(-1),
        KeyCode::Right => input.move_cursor(1),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Char(ch) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                input.insert(ch);
            }
        }
        _ => {}
    }
}

/// Screen selected by a global switching key: F1-F4 jump directly,
/// Ctrl+Left/Right step through the tabs. Tab is left to the forms.
fn screen_for_key(current: Screen, key: &KeyEvent) -> Option<Screen> {
    match key.code {
        KeyCode::F(n @ 1..=4) => Some(Screen::ALL[usize::from(n) - 1]),
        KeyCode::Right if key.modifiers == KeyModifiers::CONTROL => Some(current.shifted(1)),
        KeyCode::Left if key.modifiers == KeyModifiers::CONTROL => Some(current.shifted(-1)),
        _ => None,
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>, tick_rate: Duration) {
    thread::spawn(move || loop {
        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
