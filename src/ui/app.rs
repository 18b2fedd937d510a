//! Application shell hosting the three widgets
//!
//! Plays the role of the page: it owns the widgets, forwards input events to
//! them, pumps their clocks once per frame and carries keybind requests to the
//! async runtime and back.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::core::config::AppConfig;
use crate::core::error::Result;
use crate::core::types::Viewport;
use crate::keyboard::{
    keyboard_layout, FetchOutcome, FetchTicket, Keybind, KeybindClient, KeyboardViz, PageLocation,
};
use crate::particles::ParticleField;
use crate::terminal::{RevealOptions, RevealTracker, TerminalSession};
use crate::ui::state::{Focus, HitTarget, LogCategory, UiState};

/// Pixels per terminal cell used to size the particle viewport
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Target frame interval
pub const FRAME: Duration = Duration::from_millis(16);

type FetchResult = (FetchTicket, Result<Vec<Keybind>>);

/// Viewport in particle pixels for a terminal of `cols` x `rows`
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f32 * CELL_WIDTH, rows as f32 * CELL_HEIGHT)
}

/// Center of a terminal cell in particle pixels
pub fn cell_center(column: u16, row: u16) -> (f32, f32) {
    (
        (column as f32 + 0.5) * CELL_WIDTH,
        (row as f32 + 0.5) * CELL_HEIGHT,
    )
}

pub struct App {
    pub field: ParticleField,
    pub session: TerminalSession,
    pub keyboard: KeyboardViz,
    pub location: PageLocation,
    pub reveal: RevealTracker,
    pub ui: UiState,
    client: KeybindClient,
    runtime: Handle,
    fetch_tx: UnboundedSender<FetchResult>,
    fetch_rx: UnboundedReceiver<FetchResult>,
    started_at: Instant,
    quit: bool,
}

impl App {
    pub fn new(
        config: &AppConfig,
        location: PageLocation,
        cols: u16,
        rows: u16,
        runtime: Handle,
    ) -> Result<Self> {
        let client = KeybindClient::new(
            &config.keyboard.base_url,
            Duration::from_secs(config.keyboard.request_timeout_secs),
        )?;
        let field = ParticleField::new(config.particles.clone(), viewport_for(cols, rows));
        let seed = config.particles.seed.unwrap_or_else(rand::random);
        let session = TerminalSession::new(config.terminal.clone(), seed);
        let keyboard = KeyboardViz::from_location(&location, config.keyboard.default_platform);
        // one terminal row stands in for 100px of page height
        let reveal = RevealTracker::new(RevealOptions {
            threshold: 0.1,
            bottom_margin: -1.0,
        });
        let (fetch_tx, fetch_rx) = unbounded_channel();

        Ok(Self {
            field,
            session,
            keyboard,
            location,
            reveal,
            ui: UiState::new(),
            client,
            runtime,
            fetch_tx,
            fetch_rx,
            started_at: Instant::now(),
            quit: false,
        })
    }

    /// Page load: start the typing script and request the initial keybinds
    pub fn start(&mut self) {
        self.session.start();
        let ticket = self.keyboard.begin_fetch();
        self.spawn_fetch(ticket);
        self.ui.log(
            self.elapsed_ms(),
            format!("Loading {} keybinds", ticket.platform),
            LogCategory::Fetch,
        );
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_ticket(ticket).await;
            // receiver only goes away on shutdown
            let _ = tx.send(result);
        });
    }

    /// One animation frame
    pub fn tick(&mut self) {
        if self.field.enabled() {
            self.field.step();
        }
        let now = self.elapsed_ms();
        self.session.advance(now);
        self.poll_fetches();
    }

    /// Apply any keybind responses that have arrived
    pub fn poll_fetches(&mut self) {
        while let Ok((ticket, result)) = self.fetch_rx.try_recv() {
            let error = result.as_ref().err().map(|e| e.to_string());
            let outcome = self.keyboard.complete_fetch(ticket, result);
            let message = match outcome {
                FetchOutcome::Applied(count) => {
                    self.reveal.reset();
                    self.ui.list_cursor = None;
                    self.ui.list_scroll = 0;
                    format!("{} keybinds for {}", count, ticket.platform)
                }
                FetchOutcome::Failed => format!(
                    "Could not load {} keybinds: {}",
                    ticket.platform,
                    error.unwrap_or_default()
                ),
                FetchOutcome::Stale => continue,
            };
            self.ui.log(self.elapsed_ms(), message, LogCategory::Fetch);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.field.resize(viewport_for(cols, rows));
                self.ui.hitboxes.clear();
                self.hover(None);
                self.ui.log(
                    self.elapsed_ms(),
                    format!("Resized to {}x{}", cols, rows),
                    LogCategory::System,
                );
            }
            Event::FocusLost => self.field.mouse_leave(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab => self.set_focus(self.ui.focus.next()),
            KeyCode::F(2) => self.switch_platform(),
            KeyCode::F(3) => self.cycle_theme(),
            _ => match self.ui.focus {
                Focus::Terminal => self.handle_terminal_key(key),
                Focus::Keyboard => self.handle_keyboard_key(key),
                Focus::Keybinds => self.handle_list_key(key),
            },
        }
    }

    fn handle_terminal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.session.submit();
            }
            KeyCode::Backspace => self.session.pop_input(),
            KeyCode::Char(ch) => self.session.push_input(ch),
            _ => {}
        }
    }

    fn handle_keyboard_key(&mut self, key: KeyEvent) {
        let (d_row, d_col) = match key.code {
            KeyCode::Left => (0, -1),
            KeyCode::Right => (0, 1),
            KeyCode::Up => (-1, 0),
            KeyCode::Down => (1, 0),
            _ => return,
        };
        let (row, col) = self.ui.move_key_cursor(d_row, d_col);
        self.hover(Some(HitTarget::Key(row, col)));
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let delta = match key.code {
            KeyCode::Up => -1,
            KeyCode::Down => 1,
            _ => return,
        };
        let len = self.keyboard.keybinds().len();
        match self.ui.move_list_cursor(delta, len) {
            Some(index) => self.hover(Some(HitTarget::Keybind(index))),
            None => self.hover(None),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let (x, y) = cell_center(mouse.column, mouse.row);
                self.field.mouse_move(x, y);
                let target = self.ui.hit_test(mouse.column, mouse.row);
                self.hover(target);
            }
            MouseEventKind::Down(_) => {
                if let Some(HitTarget::TerminalBody) = self.ui.hit_test(mouse.column, mouse.row) {
                    if self.session.click_body() {
                        self.ui.focus = Focus::Terminal;
                    }
                }
            }
            _ => {}
        }
    }

    /// Route pointer enter/leave to the keyboard widget
    fn hover(&mut self, target: Option<HitTarget>) {
        if self.ui.hovered == target {
            return;
        }
        match self.ui.hovered {
            Some(HitTarget::Key(..)) => self.keyboard.on_key_leave(),
            Some(HitTarget::Keybind(_)) => self.keyboard.clear_highlight(),
            _ => {}
        }
        match target {
            Some(HitTarget::Key(row, col)) => {
                if let Some(key) = keyboard_layout().get(row).and_then(|r| r.get(col)) {
                    self.keyboard.on_key_hover(key);
                }
            }
            Some(HitTarget::Keybind(index)) => {
                if let Some(kb) = self.keyboard.keybinds().get(index).cloned() {
                    self.keyboard.highlight_keybind(&kb);
                }
            }
            _ => {}
        }
        self.ui.hovered = target;
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.ui.focus == Focus::Terminal {
            self.session.blur();
        }
        self.ui.focus = focus;
        if focus == Focus::Terminal {
            self.session.click_body();
        }
    }

    fn switch_platform(&mut self) {
        let platform = self.keyboard.platform().next();
        let ticket = self.keyboard.switch_platform(platform, &mut self.location);
        self.spawn_fetch(ticket);
        self.ui.log(
            self.elapsed_ms(),
            format!("Switched to {} ({})", platform, self.location.href()),
            LogCategory::Fetch,
        );
    }

    fn cycle_theme(&mut self) {
        let theme = self.field.theme().next();
        self.field.set_theme(theme);
        self.ui
            .log(self.elapsed_ms(), format!("Theme: {}", theme), LogCategory::Theme);
    }

    /// Stop pending work before exit
    pub fn shutdown(&mut self) {
        self.session.cancel();
        tracing::info!("Shutting down");
    }
}
