use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// The tick interval elapsed.
    Tick,
    /// Nothing happened within the poll timeout.
    Idle,
}

/// Polls the terminal and interleaves periodic ticks.
pub struct Events {
    poll_timeout: Duration,
    tick: Duration,
    last_tick: Instant,
}

impl Events {
    pub fn new(poll_timeout: Duration, tick: Duration) -> Self {
        Self {
            poll_timeout,
            tick,
            last_tick: Instant::now(),
        }
    }

    pub fn next_event(&mut self) -> color_eyre::Result<AppEvent> {
        if self.last_tick.elapsed() >= self.tick {
            self.last_tick = Instant::now();
            return Ok(AppEvent::Tick);
        }

        let timeout = self
            .poll_timeout
            .min(self.tick.saturating_sub(self.last_tick.elapsed()));
        if !event::poll(timeout)? {
            return Ok(AppEvent::Idle);
        }

        match event::read()? {
            // Windows reports releases too.
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(AppEvent::Key(key)),
            _ => Ok(AppEvent::Idle),
        }
    }
}
