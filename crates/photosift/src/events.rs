//! Structured run events.
//!
//! The engine reports everything a user may want to audit (matches, moves,
//! deletions, skipped files) as an [`Event`] handed to an [`EventSink`].

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: EventLevel,
    pub message: String,
    pub paths: Vec<PathBuf>,
}

impl Event {
    pub fn new(level: EventLevel, message: impl Into<String>, paths: &[&Path]) -> Self {
        Self {
            level,
            message: message.into(),
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for path in &self.paths {
            write!(f, " {}", path.display())?;
        }
        Ok(())
    }
}

pub trait EventSink {
    fn emit(&self, event: Event);

    fn info(&self, message: &str, paths: &[&Path]) {
        self.emit(Event::new(EventLevel::Info, message, paths));
    }

    fn warn(&self, message: &str, paths: &[&Path]) {
        self.emit(Event::new(EventLevel::Warn, message, paths));
    }

    fn error(&self, message: &str, paths: &[&Path]) {
        self.emit(Event::new(EventLevel::Error, message, paths));
    }
}

/// Forwards events to the `log` facade, one record per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        match event.level {
            EventLevel::Info => log::info!("{}", event),
            EventLevel::Warn => log::warn!("{}", event),
            EventLevel::Error => log::error!("{}", event),
        }
    }
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn count(&self, level: EventLevel) -> usize {
        self.events.borrow().iter().filter(|e| e.level == level).count()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}
