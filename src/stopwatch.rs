// Interactive stopwatch.
//
// One tick: recompute the elapsed seconds, flip the glyph, draw a single
// line, then wait up to one tick interval for a key. The drawn line is
// cleared before the next draw so the display reads as a live clock.
// Raw mode is held only while the loop runs.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::duration::format_clock;
use crate::terminal::{Key, RawMode, Style, Terminal};

pub const TICK: Duration = Duration::from_millis(500);

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Result of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Stopped by the user; whole seconds elapsed.
    Stopped(u64),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Dot,
}

impl Glyph {
    fn flip(self) -> Self {
        match self {
            Glyph::Empty => Glyph::Dot,
            Glyph::Dot => Glyph::Empty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Glyph::Empty => "[ ]",
            Glyph::Dot => "[•]",
        }
    }
}

pub struct CaptureSession {
    start: Instant,
    glyph: Glyph,
}

impl CaptureSession {
    pub fn start(clock: &impl Clock) -> Self {
        CaptureSession {
            start: clock.now(),
            glyph: Glyph::Empty,
        }
    }

    pub fn elapsed(&self, clock: &impl Clock) -> u64 {
        clock.now().saturating_duration_since(self.start).as_secs()
    }

    /// Advances to the next frame and returns what to draw.
    fn tick(&mut self, clock: &impl Clock) -> (Glyph, u64) {
        self.glyph = self.glyph.flip();
        (self.glyph, self.elapsed(clock))
    }
}

pub fn render<T: Terminal + ?Sized>(term: &mut T, glyph: Glyph, elapsed: u64) -> Result<()> {
    term.write(glyph.as_str(), Style::Indicator)?;
    term.write(&format!(" {}", format_clock(elapsed)), Style::Error)?;
    term.write(&" ".repeat(15), Style::Plain)?;
    term.write("^X", Style::KeyHint)?;
    term.write(" Stop", Style::Plain)?;
    term.write(&" ".repeat(6), Style::Plain)?;
    term.write("^C", Style::KeyHint)?;
    term.write_line(" Cancel", Style::Plain)
}

/// Runs the stopwatch until a stop or cancel key arrives.
pub fn run<T, C>(term: &mut T, clock: &C, tick: Duration) -> Result<Capture>
where
    T: Terminal + ?Sized,
    C: Clock,
{
    let mut term = RawMode::enter(term)?;
    let mut session = CaptureSession::start(clock);
    tracing::debug!("capture session started");

    loop {
        let (glyph, elapsed) = session.tick(clock);
        render(&mut *term, glyph, elapsed)?;
        let key = wait_for_signal(&mut *term, clock, clock.now() + tick)?;
        term.overwrite_previous_line()?;

        match key {
            Some(Key::Stop) => {
                let elapsed = session.elapsed(clock);
                tracing::debug!(elapsed, "capture session stopped");
                return Ok(Capture::Stopped(elapsed));
            }
            Some(Key::Cancel) => {
                tracing::debug!("capture session cancelled");
                return Ok(Capture::Cancelled);
            }
            Some(Key::Other) | None => {}
        }
    }
}

/// Polls until `deadline` or a stop/cancel key. Unrelated keys keep the
/// wait going so the line is redrawn once per tick.
fn wait_for_signal<T, C>(term: &mut T, clock: &C, deadline: Instant) -> Result<Option<Key>>
where
    T: Terminal + ?Sized,
    C: Clock,
{
    loop {
        let remaining = deadline.saturating_duration_since(clock.now());
        if remaining.is_zero() {
            return Ok(None);
        }
        match term.poll_key(remaining)? {
            Some(Key::Other) => continue,
            other => return Ok(other),
        }
    }
}
