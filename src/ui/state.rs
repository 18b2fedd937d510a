//! UI state for the terminal front end

use ratatui::layout::Rect;
use std::collections::VecDeque;

use crate::keyboard::keyboard_layout;

/// Maximum status log entries to keep
const MAX_LOG_ENTRIES: usize = 50;

/// Pane receiving keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Terminal,
    Keyboard,
    Keybinds,
}

impl Focus {
    pub fn next(&self) -> Focus {
        match self {
            Focus::Terminal => Focus::Keyboard,
            Focus::Keyboard => Focus::Keybinds,
            Focus::Keybinds => Focus::Terminal,
        }
    }
}

/// An entry in the status log
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Milliseconds since start-up
    pub at_ms: u64,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Fetch,
    Theme,
    System,
}

/// Screen region of something the pointer can hover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Key cap at (row, column) of the layout
    Key(usize, usize),
    /// Index into the platform's keybind list
    Keybind(usize),
    TerminalBody,
}

#[derive(Debug, Default)]
pub struct UiState {
    pub focus: Focus,
    /// Keyboard cursor as (row, column) in the layout
    pub key_cursor: Option<(usize, usize)>,
    /// Selected entry of the keybind list
    pub list_cursor: Option<usize>,
    /// First visible line of the keybind list
    pub list_scroll: usize,
    /// Terminal pane scroll, in lines from the top
    pub terminal_scroll: usize,
    pub status_log: VecDeque<LogEntry>,
    /// Hover regions from the last rendered frame
    pub hitboxes: Vec<(Rect, HitTarget)>,
    /// What the pointer hovered last frame
    pub hovered: Option<HitTarget>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            status_log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            ..Self::default()
        }
    }

    /// Add an entry to the status log
    pub fn log(&mut self, at_ms: u64, message: String, category: LogCategory) {
        if self.status_log.len() >= MAX_LOG_ENTRIES {
            self.status_log.pop_front();
        }
        self.status_log.push_back(LogEntry {
            at_ms,
            message,
            category,
        });
    }

    /// Move the keyboard cursor, clamping to the layout
    pub fn move_key_cursor(&mut self, d_row: isize, d_col: isize) -> (usize, usize) {
        let rows = keyboard_layout();
        let (row, col) = self.key_cursor.unwrap_or((0, 0));
        let row = (row as isize + d_row).clamp(0, rows.len() as isize - 1) as usize;
        let max_col = rows[row].len() as isize - 1;
        let col = (col as isize + d_col).clamp(0, max_col) as usize;
        self.key_cursor = Some((row, col));
        (row, col)
    }

    /// Move the list cursor within `len` entries
    pub fn move_list_cursor(&mut self, delta: isize, len: usize) -> Option<usize> {
        if len == 0 {
            self.list_cursor = None;
            return None;
        }
        let current = self.list_cursor.map(|c| c as isize).unwrap_or(-1);
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.list_cursor = Some(next);
        Some(next)
    }

    /// Hit target under a screen cell
    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.hitboxes
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, target)| *target)
    }
}
