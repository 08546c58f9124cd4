//! [`ButtonMessage`]: a fixed set of options, each firing a callback.

use crate::key::Key;
use crate::widget::{Context, Message, Widget};
use anyhow::Result;
use tracing::debug;

/// Invoked with the message and the option that was activated.
pub type OnActivate = Box<dyn Fn(&ButtonMessage, &ButtonOption, &mut Context<'_>) -> Result<()>>;

pub struct ButtonOption {
    label: String,
    on_activate: OnActivate,
}

impl ButtonOption {
    pub fn new(
        label: impl Into<String>,
        on_activate: impl Fn(&ButtonMessage, &ButtonOption, &mut Context<'_>) -> Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            on_activate: Box::new(on_activate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Options laid out one per line. Up/Down/Tab move the highlight, the
/// advance key activates the highlighted option.
///
/// Activation is not exclusive: an option can fire again for as long as the
/// message is interactive.
pub struct ButtonMessage {
    options: Vec<ButtonOption>,
    selected: usize,
    frozen: bool,
}

impl ButtonMessage {
    pub fn new(options: impl IntoIterator<Item = ButtonOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            selected: 0,
            frozen: false,
        }
    }

    pub fn options(&self) -> &[ButtonOption] {
        &self.options
    }

    /// Index of the highlighted option.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Fire the callback of the option at `index`, if there is one.
    pub fn activate(&self, index: usize, ctx: &mut Context<'_>) -> Result<()> {
        let Some(option) = self.options.get(index) else {
            return Ok(());
        };
        debug!(label = %option.label, "option activated");
        (option.on_activate)(self, option, ctx)
    }

    fn select(&mut self, index: usize, ctx: &mut Context<'_>) {
        if index != self.selected {
            self.selected = index;
            ctx.request_redraw();
        }
    }
}

impl Widget for ButtonMessage {
    fn render(&self, lines: &mut Vec<String>) {
        for (i, option) in self.options.iter().enumerate() {
            let marker = if i == self.selected && !self.frozen { '>' } else { ' ' };
            lines.push(format!("{marker} [ {} ]", option.label));
        }
    }

    fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool> {
        if self.frozen || self.options.is_empty() {
            return Ok(false);
        }
        let count = self.options.len();
        match key {
            Key::Up => self.select((self.selected + count - 1) % count, ctx),
            Key::Down | Key::Tab => self.select((self.selected + 1) % count, ctx),
            Key::ADVANCE => self.activate(self.selected, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Message for ButtonMessage {
    fn setup(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerQueue;
    use crate::vars::{GlobalVars, VarStore};
    use crate::widget::RedrawFlag;

    fn recording_option(label: &str) -> ButtonOption {
        ButtonOption::new(label, |_, option, ctx| {
            let seen = ctx.vars().get("seen").unwrap_or_default().to_owned();
            ctx.vars_mut().set("seen", seen + option.label());
            Ok(())
        })
    }

    fn message() -> ButtonMessage {
        ButtonMessage::new(["1", "2", "3"].map(recording_option))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut buttons = message();

        assert!(buttons.handle_key(Key::Up, &mut ctx).unwrap());
        assert_eq!(buttons.selected(), 2);
        assert!(buttons.handle_key(Key::Down, &mut ctx).unwrap());
        assert_eq!(buttons.selected(), 0);
        assert!(buttons.handle_key(Key::Tab, &mut ctx).unwrap());
        assert_eq!(buttons.selected(), 1);
        assert!(!buttons.handle_key(Key::Char('x'), &mut ctx).unwrap());
    }

    #[test]
    fn test_activation_can_repeat() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut buttons = message();
        {
            let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
            buttons.handle_key(Key::Down, &mut ctx).unwrap();
            buttons.handle_key(Key::ADVANCE, &mut ctx).unwrap();
            buttons.handle_key(Key::ADVANCE, &mut ctx).unwrap();
            buttons.activate(0, &mut ctx).unwrap();
            buttons.activate(9, &mut ctx).unwrap();
        }
        assert_eq!(vars.get("seen"), Ok("221"));
    }

    #[test]
    fn test_render_marks_selection() {
        let buttons = message();
        let mut lines = Vec::new();
        buttons.render(&mut lines);
        assert_eq!(lines, vec!["> [ 1 ]", "  [ 2 ]", "  [ 3 ]"]);
    }

    #[test]
    fn test_frozen_ignores_keys() {
        let mut timers = TimerQueue::new();
        let mut redraw = RedrawFlag::new();
        let mut vars = GlobalVars::new();
        let mut ctx = Context::new(&mut timers, &mut redraw, &mut vars);
        let mut buttons = message();

        buttons.freeze();
        assert!(!buttons.handle_key(Key::ADVANCE, &mut ctx).unwrap());
        assert!(buttons.is_frozen());
    }
}
