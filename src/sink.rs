//! Outputs the link client reports to.
//!
//! The host wires these to whatever it displays: a status line, a log of
//! received text and the enabled state of its "connect" trigger. Closures
//! implement all three traits directly.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Receives short human-readable state and error strings.
pub trait StatusSink: Send + Sync {
    /// Replace the current status.
    fn set_status(&self, status: &str);
}

/// Accumulates received text.
pub trait LogSink: Send + Sync {
    /// Append text, already terminated by a newline.
    fn append(&self, text: &str);
}

/// The enable toggle on the host's connect trigger.
pub trait ConnectControl: Send + Sync {
    /// Enable or disable the trigger.
    fn set_enabled(&self, enabled: bool);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn set_status(&self, status: &str) {
        self(status)
    }
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn append(&self, text: &str) {
        self(text)
    }
}

impl<F> ConnectControl for F
where
    F: Fn(bool) + Send + Sync,
{
    fn set_enabled(&self, enabled: bool) {
        self(enabled)
    }
}

/// In-memory status line that remembers every status it was given.
#[derive(Debug, Default)]
pub struct StatusLine {
    history: RwLock<Vec<String>>,
}

impl StatusLine {
    /// Create an empty status line.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent status.
    pub fn current(&self) -> Option<String> {
        self.history.read().last().cloned()
    }

    /// Every status in order.
    pub fn history(&self) -> Vec<String> {
        self.history.read().clone()
    }
}

impl StatusSink for StatusLine {
    fn set_status(&self, status: &str) {
        self.history.write().push(status.to_string());
    }
}

/// In-memory text log.
#[derive(Debug, Default)]
pub struct TextLog {
    text: RwLock<String>,
}

impl TextLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far.
    pub fn contents(&self) -> String {
        self.text.read().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.text.write())
    }
}

impl LogSink for TextLog {
    fn append(&self, text: &str) {
        self.text.write().push_str(text);
    }
}

/// Connect trigger state held in memory.
#[derive(Debug)]
pub struct ControlState {
    enabled: AtomicBool,
    disabled_count: AtomicUsize,
}

impl ControlState {
    /// Create an enabled control.
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            disabled_count: AtomicUsize::new(0),
        }
    }

    /// Whether the trigger is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// How many times the trigger has been disabled.
    pub fn disabled_count(&self) -> usize {
        self.disabled_count.load(Ordering::SeqCst)
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectControl for ControlState {
    fn set_enabled(&self, enabled: bool) {
        if !enabled {
            self.disabled_count.fetch_add(1, Ordering::SeqCst);
        }
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}
