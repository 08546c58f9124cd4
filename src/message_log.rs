//! [`MessageLog`]: an append-only list of messages where only the newest
//! one is interactive.

use crate::key::Key;
use crate::scheduler::ScheduleHandle;
use crate::widget::{Context, Message, Widget};
use anyhow::Result;
use tracing::debug;

struct Entry {
    message: Box<dyn Message>,
    frozen: bool,
}

/// Appending a message freezes the previous one for good; keys only ever
/// reach the last entry. Entries are never removed.
#[derive(Default)]
pub struct MessageLog {
    entries: Vec<Entry>,
    display_active: bool,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message`, make it the interactive entry, and set it up.
    ///
    /// Messages that callbacks queue on `ctx` while this runs are appended
    /// after it, in order.
    pub fn append(&mut self, message: impl Message + 'static, ctx: &mut Context<'_>) -> Result<()> {
        self.append_boxed(Box::new(message), ctx)
    }

    pub fn append_boxed(&mut self, message: Box<dyn Message>, ctx: &mut Context<'_>) -> Result<()> {
        self.push(message, ctx)?;
        self.flush(ctx)
    }

    /// Route a key to the interactive message.
    pub fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool> {
        let Some(entry) = self.entries.last_mut() else {
            return Ok(false);
        };
        if entry.frozen {
            return Ok(false);
        }
        let consumed = entry.message.handle_key(key, ctx)?;
        self.flush(ctx)?;
        Ok(consumed)
    }

    /// Deliver a fired schedule handle to the message that owns it.
    ///
    /// Frozen messages still receive their timers so a reveal that was
    /// running when they were frozen can finish.
    pub fn on_timer(&mut self, handle: ScheduleHandle, ctx: &mut Context<'_>) -> Result<bool> {
        let mut owned = false;
        for entry in &mut self.entries {
            if entry.message.on_timer(handle, ctx)? {
                owned = true;
                break;
            }
        }
        if owned {
            self.flush(ctx)?;
        }
        Ok(owned)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the only entry that accepts keys.
    pub fn interactive_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    pub fn is_interactive(&self, index: usize) -> bool {
        self.interactive_index() == Some(index)
            && self.entries.get(index).is_some_and(|entry| !entry.frozen)
    }

    /// Whether the host has painted at least once. Appends only request a
    /// redraw after that.
    pub fn is_display_active(&self) -> bool {
        self.display_active
    }

    pub fn set_display_active(&mut self, active: bool) {
        self.display_active = active;
    }

    fn push(&mut self, message: Box<dyn Message>, ctx: &mut Context<'_>) -> Result<()> {
        if let Some(previous) = self.entries.last_mut() {
            previous.frozen = true;
            previous.message.freeze();
        }
        debug!(index = self.entries.len(), "message appended");

        self.entries.push(Entry {
            message,
            frozen: false,
        });
        if self.display_active {
            ctx.request_redraw();
        }
        if let Some(entry) = self.entries.last_mut() {
            entry.message.setup(ctx)?;
        }
        Ok(())
    }

    /// Append everything callbacks queued. Every queued message is appended
    /// even when an earlier setup fails; the first error is returned.
    fn flush(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let mut first_err = None;
        loop {
            let appended = ctx.take_appended();
            if appended.is_empty() {
                break;
            }
            for message in appended {
                if let Err(err) = self.push(message, ctx) {
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Widget for MessageLog {
    fn render(&self, lines: &mut Vec<String>) {
        for entry in &self.entries {
            entry.message.render(lines);
        }
    }

    fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool> {
        MessageLog::handle_key(self, key, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessagePart, TextMessage};
    use crate::scheduler::TimerQueue;
    use crate::vars::GlobalVars;
    use crate::widget::RedrawFlag;
    use std::time::Duration;

    fn instant(text: &str) -> TextMessage {
        TextMessage::new([MessagePart::new(text).delay(Duration::ZERO)])
    }

    #[test]
    fn test_only_last_message_is_interactive() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut log = MessageLog::new();

        for text in ["m1", "m2", "m3"] {
            log.append(instant(text), &mut ctx).unwrap();
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.interactive_index(), Some(2));
        assert!(!log.is_interactive(0));
        assert!(!log.is_interactive(1));
        assert!(log.is_interactive(2));
    }

    #[test]
    fn test_keys_reach_only_the_last_message() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut log = MessageLog::new();

        log.append(instant("first"), &mut ctx).unwrap();
        log.append(instant("second"), &mut ctx).unwrap();
        assert!(log.handle_key(Key::ADVANCE, &mut ctx).unwrap());

        let mut lines = Vec::new();
        log.render(&mut lines);
        assert_eq!(
            lines,
            vec![
                "first".to_owned(),
                crate::messages::CONTINUE_PROMPT.to_owned(),
                "second".to_owned(),
            ]
        );
    }

    #[test]
    fn test_callback_appends_are_flushed() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut log = MessageLog::new();

        let first = instant("question").on_complete(|_, ctx| {
            ctx.append(instant("answer"));
            Ok(())
        });
        log.append(first, &mut ctx).unwrap();
        assert_eq!(log.len(), 1);

        assert!(log.handle_key(Key::ADVANCE, &mut ctx).unwrap());
        assert_eq!(log.len(), 2);
        assert!(log.is_interactive(1));
    }

    #[test]
    fn test_failed_setup_keeps_later_appends() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut log = MessageLog::new();

        let first = instant("question").on_complete(|_, ctx| {
            ctx.append(TextMessage::new([MessagePart::new("")
                .delay(Duration::ZERO)
                .before_type(|_, _, ctx| {
                    ctx.vars().get("missing")?;
                    Ok(())
                })]));
            ctx.append(instant("after"));
            Ok(())
        });
        log.append(first, &mut ctx).unwrap();

        let err = log.handle_key(Key::ADVANCE, &mut ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::Error>(),
            Some(&crate::Error::MissingVariable("missing".into()))
        );
        assert_eq!(log.len(), 3);
        assert!(log.is_interactive(2));
    }

    #[test]
    fn test_redraw_only_after_display_active() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut log = MessageLog::new();
        let silent = crate::messages::ButtonMessage::new(Vec::<crate::messages::ButtonOption>::new());

        {
            let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
            log.append(TextMessage::new(Vec::<MessagePart>::new()), &mut ctx).unwrap();
        }
        assert!(!redraw.take());

        log.set_display_active(true);
        {
            let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
            log.append(silent, &mut ctx).unwrap();
        }
        assert!(redraw.take());
    }

    #[test]
    fn test_timers_route_to_owner() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut log = MessageLog::new();

        {
            let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
            let typed = TextMessage::new([MessagePart::new("ab").delay(Duration::from_millis(5))]);
            log.append(typed, &mut ctx).unwrap();
        }
        let handle = timers.pop_next().unwrap();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        assert!(log.on_timer(handle, &mut ctx).unwrap());
        assert!(!log.on_timer(handle, &mut ctx).unwrap());
    }
}
