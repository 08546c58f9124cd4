use crate::input_reader::{TerminalEvent, spawn_reader};
use crate::key::Key;
use crate::message_log::MessageLog;
use crate::scheduler::{ScheduleHandle, TimerQueue};
use crate::terminal::TerminalSession;
use crate::vars::GlobalVars;
use crate::widget::{Context, Message, Redraw, RedrawFlag, Widget};
use anyhow::{Result, anyhow};
use tokio::time::Instant;
use tracing::{debug, info};

/// The host runtime: owns the message log together with the ports it needs
/// (timers, redraw flag, global variables) and routes keys and fired timers
/// into it.
///
/// Everything except [`Stage::run`] works without a terminal, which is how the
/// tests drive whole dialogues.
#[derive(Default)]
pub struct Stage {
    log: MessageLog,
    timers: TimerQueue,
    vars: GlobalVars,
    redraw: RedrawFlag,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the log.
    pub fn start(&mut self, message: impl Message + 'static) -> Result<()> {
        self.start_boxed(Box::new(message))
    }

    pub fn start_boxed(&mut self, message: Box<dyn Message>) -> Result<()> {
        let mut ctx = Context::new(&mut self.timers, &mut self.redraw, &mut self.vars);
        self.log.append_boxed(message, &mut ctx)
    }

    /// Deliver one key press to the interactive message.
    pub fn press(&mut self, key: Key) -> Result<bool> {
        let mut ctx = Context::new(&mut self.timers, &mut self.redraw, &mut self.vars);
        self.log.handle_key(key, &mut ctx)
    }

    /// Type each char of `text` as a key press.
    pub fn type_str(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.press(Key::Char(ch))?;
        }
        Ok(())
    }

    pub fn fire(&mut self, handle: ScheduleHandle) -> Result<bool> {
        let mut ctx = Context::new(&mut self.timers, &mut self.redraw, &mut self.vars);
        self.log.on_timer(handle, &mut ctx)
    }

    /// Fire every timer due at `now`. Returns how many fired.
    pub fn fire_due(&mut self, now: Instant) -> Result<usize> {
        let mut fired = 0;
        while let Some(handle) = self.timers.pop_due(now) {
            self.fire(handle)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Fire the earliest pending timer without waiting for it.
    pub fn fire_next(&mut self) -> Result<bool> {
        match self.timers.pop_next() {
            Some(handle) => {
                self.fire(handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fast-forward until no timers are pending.
    ///
    /// Fails if more than `limit` timers fire, which means something keeps
    /// rescheduling itself.
    pub fn run_until_idle(&mut self, limit: usize) -> Result<usize> {
        let mut fired = 0;
        while self.fire_next()? {
            fired += 1;
            if fired > limit {
                return Err(anyhow!("More than {} timers fired without going idle", limit));
            }
        }
        Ok(fired)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.log.render(&mut lines);
        lines
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn vars(&self) -> &GlobalVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut GlobalVars {
        &mut self.vars
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_requested()
    }

    /// Clear the redraw flag, returning whether a repaint was requested.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    /// Drive the log from a live terminal until the user quits.
    ///
    /// `q`/`Q` quits when the interactive message does not want it; Ctrl+C
    /// always quits.
    pub async fn run(&mut self, terminal: &mut TerminalSession) -> Result<()> {
        let mut events = spawn_reader();

        terminal.paint(&self.render())?;
        self.log.set_display_active(true);
        self.redraw.take();
        info!("stage running");

        loop {
            let deadline = self.timers.next_deadline();
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        TerminalEvent::Key(Key::Interrupt) => break,
                        TerminalEvent::Key(key) => {
                            let consumed = self.press(key)?;
                            if !consumed && matches!(key, Key::Char('q' | 'Q')) {
                                break;
                            }
                        }
                        TerminalEvent::Resize => self.redraw.request_redraw(),
                    }
                }
                () = sleep_until(deadline) => {
                    self.fire_due(Instant::now())?;
                }
            }

            if self.redraw.take() {
                terminal.paint(&self.render())?;
            }
        }

        debug!(messages = self.log.len(), "stage stopped");
        Ok(())
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
