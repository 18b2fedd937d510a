//! Canned responses for the toy command prompt

pub const HELP_TEXT: &str = "Available commands: help, clear, about, dotfiles";
pub const ABOUT_TEXT: &str = "Duma - Linux & macOS dotfiles enthusiast";
pub const DOTFILES_TEXT: &str = "Check out /dotfiles for my Hyprland and Yabai configs!";

/// What the prompt does with a submitted command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    Help,
    /// Empty the output instead of answering
    Clear,
    About,
    Dotfiles,
    NotFound(String),
}

impl CommandResponse {
    /// Line appended after the echo, if any
    pub fn text(&self) -> Option<String> {
        match self {
            CommandResponse::Help => Some(HELP_TEXT.to_string()),
            CommandResponse::Clear => None,
            CommandResponse::About => Some(ABOUT_TEXT.to_string()),
            CommandResponse::Dotfiles => Some(DOTFILES_TEXT.to_string()),
            CommandResponse::NotFound(command) => {
                Some(format!("bash: {}: command not found", command))
            }
        }
    }
}

/// Match a trimmed command against the known keywords
///
/// Keywords match anywhere in the command, case-insensitively, except
/// `clear` which must be the whole command. `help` wins over everything.
pub fn interpret(command: &str) -> CommandResponse {
    let lower = command.to_lowercase();
    if lower.contains("help") {
        CommandResponse::Help
    } else if lower == "clear" {
        CommandResponse::Clear
    } else if lower.contains("about") {
        CommandResponse::About
    } else if lower.contains("dotfiles") {
        CommandResponse::Dotfiles
    } else {
        CommandResponse::NotFound(command.to_string())
    }
}
