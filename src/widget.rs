//! The [`Widget`] and [`Message`] capabilities, and the [`Context`] they
//! receive when the host routes keys and timers to them.

use crate::key::Key;
use crate::scheduler::{ScheduleHandle, Scheduler};
use crate::vars::VarStore;
use anyhow::Result;

/// Request a repaint. Calls before the next paint coalesce into one.
pub trait Redraw {
    fn request_redraw(&mut self);
}

/// A [`Redraw`] that just remembers whether anything asked for a repaint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedrawFlag {
    requested: bool,
}

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Clear the flag, returning whether a repaint was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}

impl Redraw for RedrawFlag {
    fn request_redraw(&mut self) {
        self.requested = true;
    }
}

/// Host ports handed to widgets and user callbacks.
///
/// Messages appended from inside a callback are queued here and picked up by
/// the [`MessageLog`](crate::MessageLog) once the current call returns.
pub struct Context<'a> {
    scheduler: &'a mut dyn Scheduler,
    redraw: &'a mut dyn Redraw,
    vars: &'a mut dyn VarStore,
    appended: Vec<Box<dyn Message>>,
}

impl<'a> Context<'a> {
    pub fn new(
        scheduler: &'a mut dyn Scheduler,
        redraw: &'a mut dyn Redraw,
        vars: &'a mut dyn VarStore,
    ) -> Self {
        Self {
            scheduler,
            redraw,
            vars,
            appended: Vec::new(),
        }
    }

    pub fn scheduler(&mut self) -> &mut dyn Scheduler {
        &mut *self.scheduler
    }

    pub fn request_redraw(&mut self) {
        self.redraw.request_redraw();
    }

    pub fn vars(&self) -> &dyn VarStore {
        &*self.vars
    }

    pub fn vars_mut(&mut self) -> &mut dyn VarStore {
        &mut *self.vars
    }

    /// Queue `message` for appending to the log.
    pub fn append(&mut self, message: impl Message + 'static) {
        self.appended.push(Box::new(message));
    }

    pub fn append_boxed(&mut self, message: Box<dyn Message>) {
        self.appended.push(message);
    }

    pub(crate) fn take_appended(&mut self) -> Vec<Box<dyn Message>> {
        std::mem::take(&mut self.appended)
    }
}

/// Anything that can be laid out and receive keys.
pub trait Widget {
    /// Append this widget's text lines to `lines`.
    fn render(&self, lines: &mut Vec<String>);

    /// Handle one key press. Returns `true` when the key was consumed.
    fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool>;
}

/// An entry in the [`MessageLog`](crate::MessageLog).
pub trait Message: Widget {
    /// Called once, right after the log appends the message.
    fn setup(&mut self, ctx: &mut Context<'_>) -> Result<()>;

    /// Called for every fired schedule handle. Returns `true` when the handle
    /// belonged to this message.
    fn on_timer(&mut self, _handle: ScheduleHandle, _ctx: &mut Context<'_>) -> Result<bool> {
        Ok(false)
    }

    /// Called when a newer message is appended. Frozen messages never see
    /// keys again.
    fn freeze(&mut self) {}
}
