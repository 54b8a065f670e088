//! Turning an [`ActionDescriptor`] into exactly one OS-level effect.
//!
//! The OS itself sits behind [`OsActions`]. Every call it makes is
//! fire-and-forget from here: launched processes are never waited on, and
//! any error is logged and reported in the [`AuditRecord`] rather than
//! propagated to the acquisition loop.

use chrono::Local;

use crate::action::{AccessibilityCommand, ActionDescriptor};
use crate::audit::{AuditRecord, DispatchOutcome};
use crate::error::Result;
use crate::gesture::GestureName;

// ---------------------------------------------------------------------------
// OS collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKey {
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

pub trait OsActions {
    /// Start the executable at `path` without waiting for it.
    fn spawn_detached(&mut self, path: &str) -> Result<()>;

    fn media_key(&mut self, key: MediaKey) -> Result<()>;

    /// Modifier + key zoom shortcut (Ctrl `+` / Ctrl `-`).
    fn zoom(&mut self, direction: ZoomDirection) -> Result<()>;

    /// Vertical wheel scroll. Positive scrolls up.
    fn scroll(&mut self, delta: i32) -> Result<()>;
}

/// Logs each call instead of touching the OS.
#[derive(Debug, Default)]
pub struct DryRunActions;

impl OsActions for DryRunActions {
    fn spawn_detached(&mut self, path: &str) -> Result<()> {
        tracing::info!(path, "dry run: would launch");
        Ok(())
    }

    fn media_key(&mut self, key: MediaKey) -> Result<()> {
        tracing::info!(?key, "dry run: would press media key");
        Ok(())
    }

    fn zoom(&mut self, direction: ZoomDirection) -> Result<()> {
        tracing::info!(?direction, "dry run: would zoom");
        Ok(())
    }

    fn scroll(&mut self, delta: i32) -> Result<()> {
        tracing::info!(delta, "dry run: would scroll");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// dispatch
// ---------------------------------------------------------------------------

/// Perform `action` through `os`. Never fails; failures become the outcome.
pub fn dispatch<A: OsActions + ?Sized>(
    os: &mut A,
    action: &ActionDescriptor,
    scroll_amount: i32,
) -> DispatchOutcome {
    use AccessibilityCommand::*;

    let result = match action {
        ActionDescriptor::Launch(path) => os.spawn_detached(path),
        ActionDescriptor::Accessibility(cmd) => match cmd {
            VolumeUp => os.media_key(MediaKey::VolumeUp),
            VolumeDown => os.media_key(MediaKey::VolumeDown),
            ZoomIn => os.zoom(ZoomDirection::In),
            ZoomOut => os.zoom(ZoomDirection::Out),
            ScrollUp => os.scroll(scroll_amount),
            ScrollDown => os.scroll(-scroll_amount),
        },
        ActionDescriptor::Unrecognized(text) => {
            tracing::info!(action = %text, "unhandled action");
            return DispatchOutcome::Unhandled;
        }
    };

    match result {
        Ok(()) => DispatchOutcome::Dispatched,
        Err(e) => {
            tracing::warn!(action = %action, error = %e, "action execution failed");
            DispatchOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Owns the OS backend and stamps each attempt with an audit record.
pub struct Dispatcher<A> {
    os: A,
    scroll_amount: i32,
}

impl<A: OsActions> Dispatcher<A> {
    pub fn new(os: A, scroll_amount: i32) -> Self {
        Self { os, scroll_amount }
    }

    pub fn fire(&mut self, gesture: GestureName, action: &ActionDescriptor) -> AuditRecord {
        let outcome = dispatch(&mut self.os, action, self.scroll_amount);
        let record = AuditRecord {
            at: Local::now(),
            gesture,
            action: action.to_string(),
            outcome,
        };
        if record.outcome == DispatchOutcome::Dispatched {
            tracing::info!(gesture = %gesture, action = %action, "gesture triggered");
        }
        record
    }

    pub fn backend(&self) -> &A {
        &self.os
    }
}

// ---------------------------------------------------------------------------
// Recording fake
// ---------------------------------------------------------------------------
