//! Scripted typing sequence followed by a free-text prompt

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::TerminalConfig;
use crate::terminal::commands::{interpret, CommandResponse};
use crate::terminal::scheduler::{Millis, Scheduler};

/// One line of terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// A prompt followed by a typed or submitted command
    Command(String),
    /// Muted answer printed after a submitted command
    Response(String),
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Command(text) | OutputLine::Response(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypingStep {
    /// Open a prompt line for the current command, or finish the script
    NextCommand,
    /// Append character `index` of the current command
    TypeChar { index: usize },
    RevealInput,
}

pub struct TerminalSession {
    config: TerminalConfig,
    scheduler: Scheduler<TypingStep>,
    rng: ChaCha8Rng,
    lines: Vec<OutputLine>,
    current_command: usize,
    started: bool,
    typing: bool,
    input: String,
    input_visible: bool,
    input_focused: bool,
    /// Set whenever output changes; the view scrolls to the bottom and clears it
    scroll_to_bottom: bool,
}

impl TerminalSession {
    pub fn new(config: TerminalConfig, seed: u64) -> Self {
        Self {
            config,
            scheduler: Scheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            lines: Vec::new(),
            current_command: 0,
            started: false,
            typing: false,
            input: String::new(),
            input_visible: false,
            input_focused: false,
            scroll_to_bottom: false,
        }
    }

    /// Queue the scripted sequence after the start delay
    pub fn start(&mut self) {
        if self.started {
            tracing::warn!("Terminal script already started");
            return;
        }
        self.started = true;
        self.scheduler
            .schedule(self.config.start_delay_ms, TypingStep::NextCommand);
    }

    /// Run every step due by `now`, returning how many ran
    pub fn advance(&mut self, now: Millis) -> usize {
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_due(now) {
            self.run_step(step);
            ran += 1;
        }
        ran
    }

    /// Fast-forward through whatever is left of the script
    pub fn finish_script(&mut self) {
        while let Some(due) = self.scheduler.next_due() {
            self.advance(due);
        }
    }

    /// Drop all pending steps
    pub fn cancel(&mut self) {
        self.scheduler.cancel_all();
        self.typing = false;
    }

    fn run_step(&mut self, step: TypingStep) {
        match step {
            TypingStep::NextCommand => {
                if self.current_command < self.config.commands.len() {
                    self.typing = true;
                    self.lines.push(OutputLine::Command(String::new()));
                    self.scroll_to_bottom = true;
                    self.run_step(TypingStep::TypeChar { index: 0 });
                } else {
                    self.typing = false;
                    tracing::debug!("Terminal script finished");
                    self.scheduler
                        .schedule(self.config.input_reveal_ms, TypingStep::RevealInput);
                }
            }
            TypingStep::TypeChar { index } => {
                let next = self
                    .config
                    .commands
                    .get(self.current_command)
                    .and_then(|command| command.chars().nth(index));
                match next {
                    Some(ch) => {
                        if let Some(OutputLine::Command(text)) = self.lines.last_mut() {
                            text.push(ch);
                        }
                        let delay = self.char_delay();
                        self.scheduler
                            .schedule(delay, TypingStep::TypeChar { index: index + 1 });
                    }
                    None => {
                        self.current_command += 1;
                        self.scheduler
                            .schedule(self.config.command_pause_ms, TypingStep::NextCommand);
                    }
                }
            }
            TypingStep::RevealInput => {
                self.input_visible = true;
                self.input_focused = true;
            }
        }
    }

    fn char_delay(&mut self) -> Millis {
        self.rng
            .gen_range(self.config.char_delay_min_ms..self.config.char_delay_max_ms)
    }

    /// Click on the terminal body: focus the input unless the script is typing
    pub fn click_body(&mut self) -> bool {
        if self.typing {
            return false;
        }
        self.input_focused = self.input_visible;
        self.input_focused
    }

    pub fn blur(&mut self) {
        self.input_focused = false;
    }

    pub fn push_input(&mut self, ch: char) {
        if self.accepts_input() {
            self.input.push(ch);
        }
    }

    pub fn pop_input(&mut self) {
        if self.accepts_input() {
            self.input.pop();
        }
    }

    pub fn set_input(&mut self, text: &str) {
        if self.accepts_input() {
            self.input = text.to_string();
        }
    }

    fn accepts_input(&self) -> bool {
        self.input_visible && self.input_focused
    }

    /// Enter pressed: run the command in the input field
    ///
    /// Whitespace-only input only clears the field.
    pub fn submit(&mut self) -> Option<CommandResponse> {
        if !self.accepts_input() {
            return None;
        }
        let command = self.input.trim().to_string();
        self.input.clear();
        self.scroll_to_bottom = true;
        if command.is_empty() {
            return None;
        }

        self.lines.push(OutputLine::Command(command.clone()));
        let response = interpret(&command);
        match response.text() {
            Some(text) => self.lines.push(OutputLine::Response(text)),
            None => self.lines.clear(),
        }
        tracing::debug!(command = %command, ?response, "Terminal command");
        Some(response)
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn input_visible(&self) -> bool {
        self.input_visible
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Returns and resets the pending scroll request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    /// Due time of the next scripted step
    pub fn next_due(&self) -> Option<Millis> {
        self.scheduler.next_due()
    }
}
