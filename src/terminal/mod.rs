//! Fake terminal: scripted typing, toy command prompt, scroll reveal

pub mod commands;
pub mod reveal;
pub mod scheduler;
pub mod session;

pub use commands::{interpret, CommandResponse};
pub use reveal::{IntersectionEntry, RevealOptions, RevealTracker};
pub use scheduler::{Millis, Scheduler, TaskHandle};
pub use session::{OutputLine, TerminalSession};
