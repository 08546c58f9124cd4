//! [`TextMessage`]: a queue of [`MessagePart`]s revealed one after another.
//!
//! ```text
//! Idle ──advance──▶ Typing ──finished──▶ AwaitingInput ──confirm──┐
//!                     ▲    └──finished──▶ AwaitingContinue ─enter─┤
//!                     └───────auto_advance / next part────────────┘
//!                                         queue empty ──▶ Completed
//! ```

use crate::event::TypewriterEvent;
use crate::key::Key;
use crate::messages::MessagePart;
use crate::scheduler::ScheduleHandle;
use crate::typewriter::{Typewriter, TypewriterConfig};
use crate::widget::{Context, Message, Widget};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tracing::debug;

/// Shown under a revealed part that waits for the advance key.
pub const CONTINUE_PROMPT: &str = "[Press ENTER to continue]";

/// Invoked once, when the last part has been consumed.
pub type OnComplete = Box<dyn FnOnce(&mut TextMessage, &mut Context<'_>) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextState {
    Idle,
    Typing,
    AwaitingInput,
    AwaitingContinue,
    Completed,
}

pub struct TextMessage {
    parts: VecDeque<MessagePart>,
    active: Option<MessagePart>,
    state: TextState,
    local_vars: HashMap<String, String>,
    prompt_visible: bool,
    on_complete: Option<OnComplete>,
    typewriter: Typewriter,
    inbox: Rc<RefCell<VecDeque<TypewriterEvent>>>,
    frozen: bool,
}

impl TextMessage {
    pub fn new(parts: impl IntoIterator<Item = MessagePart>) -> Self {
        Self::with_config(parts, TypewriterConfig::default())
    }

    pub fn with_config(parts: impl IntoIterator<Item = MessagePart>, config: TypewriterConfig) -> Self {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let mut typewriter = Typewriter::new(config);

        let fragments = Rc::clone(&inbox);
        typewriter.on_fragment_typed(move |text| {
            fragments
                .borrow_mut()
                .push_back(TypewriterEvent::fragment(text));
        });
        let finished = Rc::clone(&inbox);
        typewriter.on_finished_typing(move |_| {
            finished
                .borrow_mut()
                .push_back(TypewriterEvent::FinishedTyping);
        });

        Self {
            parts: parts.into_iter().collect(),
            active: None,
            state: TextState::Idle,
            local_vars: HashMap::new(),
            prompt_visible: false,
            on_complete: None,
            typewriter,
            inbox,
            frozen: false,
        }
    }

    pub fn on_complete(
        mut self,
        callback: impl FnOnce(&mut TextMessage, &mut Context<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> TextState {
        self.state
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn typewriter_mut(&mut self) -> &mut Typewriter {
        &mut self.typewriter
    }

    /// The part currently being revealed or waited on.
    pub fn active_part(&self) -> Option<&MessagePart> {
        self.active.as_ref()
    }

    pub fn remaining_parts(&self) -> usize {
        self.parts.len()
    }

    /// Input captured by parts that store locally.
    pub fn local_var(&self, name: &str) -> Option<&str> {
        self.local_vars.get(name).map(String::as_str)
    }

    pub fn local_vars(&self) -> &HashMap<String, String> {
        &self.local_vars
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Start the next part, or complete the message if none are left.
    ///
    /// Has no effect once the message is completed.
    pub fn advance(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.step(ctx)?;
        self.pump(ctx)
    }

    fn step(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.state == TextState::Completed {
            return Ok(());
        }
        self.hide_prompt(ctx);

        let Some(mut part) = self.parts.pop_front() else {
            debug!("text message completed");
            self.active = None;
            self.state = TextState::Completed;
            if let Some(callback) = self.on_complete.take() {
                callback(self, ctx)?;
            }
            return Ok(());
        };

        if let Some(hook) = part.before_type.take() {
            hook(self, &mut part, ctx)?;
        }
        debug!(remaining = self.parts.len(), "advancing to next part");
        self.state = TextState::Typing;
        self.typewriter
            .type_text(&part.text, part.symbol_delay, part.append, ctx.scheduler());
        self.active = Some(part);
        Ok(())
    }

    /// React to everything the typewriter emitted, in order.
    fn pump(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        loop {
            let event = self.inbox.borrow_mut().pop_front();
            match event {
                None => return Ok(()),
                Some(TypewriterEvent::FragmentTyped(_)) => ctx.request_redraw(),
                Some(TypewriterEvent::FinishedTyping) => self.finished_typing(ctx)?,
            }
        }
    }

    fn finished_typing(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(part) = self.active.as_ref() else {
            return Ok(());
        };
        let captures = part.capture_key.is_some();
        let auto_advance = part.auto_advance;

        if captures {
            self.typewriter.enable_input_capture();
            self.state = TextState::AwaitingInput;
            ctx.request_redraw();
        } else if auto_advance {
            self.step(ctx)?;
        } else {
            self.state = TextState::AwaitingContinue;
            self.show_prompt(ctx);
        }
        Ok(())
    }

    fn confirm_input(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(part) = self.active.as_ref() else {
            return Ok(());
        };
        let Some(key) = part.capture_key.clone() else {
            return Ok(());
        };
        let globally = part.capture_globally;
        let keep = part.keep_captured_text;

        let value = self.typewriter.input_value().unwrap_or_default().to_owned();
        debug!(%key, globally, "input captured");
        if globally {
            ctx.vars_mut().set(&key, value);
        } else {
            self.local_vars.insert(key, value);
        }
        self.typewriter.disable_input_capture(keep);
        self.step(ctx)
    }

    fn show_prompt(&mut self, ctx: &mut Context<'_>) {
        if !self.prompt_visible {
            self.prompt_visible = true;
            ctx.request_redraw();
        }
    }

    fn hide_prompt(&mut self, ctx: &mut Context<'_>) {
        if self.prompt_visible {
            self.prompt_visible = false;
            ctx.request_redraw();
        }
    }
}

impl Widget for TextMessage {
    fn render(&self, lines: &mut Vec<String>) {
        self.typewriter.render(lines);
        if self.prompt_visible {
            lines.push(CONTINUE_PROMPT.to_owned());
        }
    }

    fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool> {
        if self.frozen {
            return Ok(false);
        }

        let consumed = if self.typewriter.is_typing() && key == Key::ADVANCE {
            self.typewriter.skip(ctx.scheduler());
            true
        } else if self.state == TextState::AwaitingInput && key == Key::CONFIRM {
            self.confirm_input(ctx)?;
            true
        } else if self.state == TextState::AwaitingContinue && key == Key::ADVANCE {
            self.step(ctx)?;
            true
        } else {
            self.typewriter.handle_key(key, ctx)?
        };

        self.pump(ctx)?;
        Ok(consumed)
    }
}

impl Message for TextMessage {
    fn setup(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.state != TextState::Idle {
            return Ok(());
        }
        self.advance(ctx)
    }

    fn on_timer(&mut self, handle: ScheduleHandle, ctx: &mut Context<'_>) -> Result<bool> {
        if !self.typewriter.on_timer(handle, ctx.scheduler()) {
            return Ok(false);
        }
        self.pump(ctx)?;
        Ok(true)
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }
}
