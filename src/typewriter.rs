//! Incremental text reveal with skip and input capture.
//!
//! A [`Typewriter`] owns one display buffer. [`Typewriter::type_text`]
//! reveals a string into it one symbol per scheduled step;
//! [`Typewriter::skip`] flushes whatever is left in one go. Once a reveal is
//! complete the owner may switch the typewriter into [`InputMode::Capture`],
//! where keys edit a line of input shown after the revealed text.

use crate::key::Key;
use crate::scheduler::{ScheduleHandle, Scheduler};
use crate::signal::Signal;
use crate::widget::{Context, Widget};
use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, trace};

/// Delay between symbols when a reveal does not ask for one (30 per second).
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_nanos(1_000_000_000 / 30);

/// Drawn at the edit position while capturing input.
pub const CARET: char = '▏';

/// Pacing for a [`Typewriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Used when `type_text` is called without an explicit delay.
    pub default_delay: Duration,
    /// Each timed step is shifted by a random amount within ±`jitter`.
    pub jitter: Duration,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            default_delay: DEFAULT_TYPING_DELAY,
            jitter: Duration::ZERO,
        }
    }
}

/// Whether keys drive the reveal or edit captured input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Display,
    Capture,
}

/// One in-flight reveal. `cursor` only moves forward.
#[derive(Debug)]
struct TypingJob {
    symbols: Vec<char>,
    delay: Duration,
    cursor: usize,
    pending: Option<ScheduleHandle>,
}

/// Single-line editable buffer; `cursor` counts chars, not bytes.
#[derive(Debug, Default)]
struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    fn render(&self) -> String {
        let mut line = self.text.clone();
        line.insert(self.byte_index(self.cursor), CARET);
        line
    }
}

/// Reveals text into a display buffer at a configurable pace.
///
/// Observers registered through [`on_fragment_typed`](Self::on_fragment_typed)
/// and [`on_finished_typing`](Self::on_finished_typing) are invoked
/// synchronously in registration order. For every `type_text` call that is
/// not preempted, fragments arrive in reveal order and `finished_typing` is
/// the last notification.
pub struct Typewriter {
    config: TypewriterConfig,
    text: String,
    edit: Option<EditBuffer>,
    job: Option<TypingJob>,
    fragment_typed: Signal<str>,
    finished_typing: Signal<()>,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            text: String::new(),
            edit: None,
            job: None,
            fragment_typed: Signal::new(),
            finished_typing: Signal::new(),
        }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn on_fragment_typed(&mut self, slot: impl FnMut(&str) + 'static) {
        self.fragment_typed.connect(slot);
    }

    pub fn on_finished_typing(&mut self, slot: impl FnMut(&()) + 'static) {
        self.finished_typing.connect(slot);
    }

    /// The revealed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True while a reveal is in progress or a step is pending.
    pub fn is_typing(&self) -> bool {
        self.job.is_some()
    }

    pub fn input_mode(&self) -> InputMode {
        if self.edit.is_some() {
            InputMode::Capture
        } else {
            InputMode::Display
        }
    }

    /// The text typed so far while capturing input.
    pub fn input_value(&self) -> Option<&str> {
        self.edit.as_ref().map(|edit| edit.text.as_str())
    }

    /// Reveal `text`, preempting any reveal still in flight.
    ///
    /// A zero delay reveals the whole string synchronously as one fragment.
    /// Otherwise each symbol lands one scheduled step after the previous one.
    /// `None` falls back to the configured default delay. Unless `append` is
    /// set the display buffer is cleared first.
    pub fn type_text(
        &mut self,
        text: &str,
        symbol_delay: Option<Duration>,
        append: bool,
        scheduler: &mut dyn Scheduler,
    ) {
        self.preempt(scheduler);
        if !append {
            self.text.clear();
        }

        let delay = symbol_delay.unwrap_or(self.config.default_delay);
        debug!(symbols = text.chars().count(), ?delay, append, "typing");

        if delay.is_zero() {
            self.text.push_str(text);
            self.fragment_typed.emit(text);
            self.finished_typing.emit(&());
            return;
        }

        let symbols: Vec<char> = text.chars().collect();
        if symbols.is_empty() {
            self.finished_typing.emit(&());
            return;
        }

        let pending = scheduler.schedule_once(step_delay(&self.config, delay));
        self.job = Some(TypingJob {
            symbols,
            delay,
            cursor: 0,
            pending: Some(pending),
        });
    }

    /// Reveal the next symbol if `handle` is this typewriter's pending step.
    ///
    /// Returns `false` for handles it does not own.
    pub fn on_timer(&mut self, handle: ScheduleHandle, scheduler: &mut dyn Scheduler) -> bool {
        let config = self.config;
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if job.pending != Some(handle) {
            return false;
        }
        job.pending = None;

        let symbol = job.symbols[job.cursor];
        job.cursor += 1;
        let done = job.cursor == job.symbols.len();
        if done {
            self.job = None;
        } else {
            job.pending = Some(scheduler.schedule_once(step_delay(&config, job.delay)));
        }

        trace!(%symbol, done, "symbol typed");
        self.text.push(symbol);
        let mut buf = [0u8; 4];
        self.fragment_typed.emit(symbol.encode_utf8(&mut buf));
        if done {
            self.finished_typing.emit(&());
        }
        true
    }

    /// Reveal everything left at once. No-op when nothing is being typed.
    pub fn skip(&mut self, scheduler: &mut dyn Scheduler) {
        let Some(mut job) = self.job.take() else {
            return;
        };
        if let Some(handle) = job.pending.take() {
            scheduler.cancel(handle);
        }

        let rest: String = job.symbols[job.cursor..].iter().collect();
        debug!(skipped = job.symbols.len() - job.cursor, "typing skipped");
        self.text.push_str(&rest);
        self.fragment_typed.emit(&rest);
        self.finished_typing.emit(&());
    }

    /// Start capturing input after the revealed text.
    ///
    /// Ignored while a reveal is still running or capture is already on.
    pub fn enable_input_capture(&mut self) {
        if self.is_typing() || self.edit.is_some() {
            return;
        }
        debug!("input capture enabled");
        self.edit = Some(EditBuffer::default());
    }

    /// Stop capturing input and return what was typed.
    ///
    /// With `keep_typed` the input becomes part of the display text; otherwise
    /// the display text is left as it was before capture started.
    pub fn disable_input_capture(&mut self, keep_typed: bool) -> Option<String> {
        let edit = self.edit.take()?;
        debug!(keep_typed, "input capture disabled");
        if keep_typed {
            self.text.push_str(&edit.text);
        }
        Some(edit.text)
    }

    /// Drop any in-flight reveal without notifying observers.
    fn preempt(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(job) = self.job.take() {
            if let Some(handle) = job.pending {
                scheduler.cancel(handle);
            }
            debug!(remaining = job.symbols.len() - job.cursor, "typing preempted");
        }
    }
}

impl Widget for Typewriter {
    fn render(&self, lines: &mut Vec<String>) {
        let mut text = self.text.clone();
        if let Some(edit) = &self.edit {
            text.push_str(&edit.render());
        }
        lines.extend(text.split('\n').map(str::to_owned));
    }

    fn handle_key(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<bool> {
        if self.is_typing() {
            if key == Key::ADVANCE {
                self.skip(ctx.scheduler());
                return Ok(true);
            }
            return Ok(false);
        }

        let Some(edit) = self.edit.as_mut() else {
            return Ok(false);
        };
        match key {
            Key::Char(ch) => edit.insert(ch),
            Key::Backspace => edit.backspace(),
            Key::Delete => edit.delete(),
            Key::Left => edit.left(),
            Key::Right => edit.right(),
            Key::Home => edit.cursor = 0,
            Key::End => edit.cursor = edit.char_len(),
            _ => return Ok(false),
        }
        ctx.request_redraw();
        Ok(true)
    }
}

fn step_delay(config: &TypewriterConfig, delay: Duration) -> Duration {
    if config.jitter.is_zero() {
        return delay;
    }
    let jitter = config.jitter.as_secs_f64();
    let offset = rand::thread_rng().gen_range(-jitter..=jitter);
    Duration::try_from_secs_f64((delay.as_secs_f64() + offset).max(0.0)).unwrap_or(delay)
}
