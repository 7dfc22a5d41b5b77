// Terminal capability surface used by the commands and the stopwatch.
//
// `Console` is the real implementation: crossterm for colours, raw mode
// and key polling, dialoguer for line prompts. Tests provide their own
// scripted implementation of the trait.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use dialoguer::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Label,
    Id,
    Error,
    Success,
    /// Background block behind the stopwatch glyph.
    Indicator,
    /// Key hints such as `^X`.
    KeyHint,
}

/// Key signals understood by the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Ctrl+X: stop timing and continue to the confirmation.
    Stop,
    /// Ctrl+C: abandon everything.
    Cancel,
    Other,
}

impl Key {
    const STOP_BYTE: u8 = 0x18;
    const CANCEL_BYTE: u8 = 0x03;

    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::STOP_BYTE => Key::Stop,
            Self::CANCEL_BYTE => Key::Cancel,
            _ => Key::Other,
        }
    }

    /// Crossterm reports control chords as a letter plus a modifier; fold
    /// them back into the control byte the terminal would have sent.
    fn from_event(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() && key.modifiers.contains(KeyModifiers::CONTROL) => {
                Self::from_byte(c.to_ascii_lowercase() as u8 & 0x1f)
            }
            _ => Key::Other,
        }
    }
}

pub trait Terminal {
    fn write(&mut self, text: &str, style: Style) -> Result<()>;

    fn write_line(&mut self, text: &str, style: Style) -> Result<()> {
        self.write(text, style)?;
        self.write("\n", Style::Plain)
    }

    /// Moves up one line and clears it, so the next write replaces it.
    fn overwrite_previous_line(&mut self) -> Result<()>;

    /// Blocking read of one line; an empty answer is returned as "".
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    fn set_raw_mode(&mut self, enabled: bool) -> Result<()>;

    /// Waits up to `timeout` for a key press; `None` when the time ran out.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>>;
}

/// Raw mode held for the lifetime of the guard. Dropping it restores line
/// input on every exit path.
pub struct RawMode<'a, T: Terminal + ?Sized> {
    term: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawMode<'a, T> {
    pub fn enter(term: &'a mut T) -> Result<Self> {
        term.set_raw_mode(true)?;
        Ok(RawMode { term })
    }
}

impl<T: Terminal + ?Sized> Deref for RawMode<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.term
    }
}

impl<T: Terminal + ?Sized> DerefMut for RawMode<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.term
    }
}

impl<T: Terminal + ?Sized> Drop for RawMode<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.term.set_raw_mode(false) {
            tracing::warn!(error = %e, "failed to leave raw mode");
        }
    }
}

/// Stdout-backed terminal.
pub struct Console {
    out: io::Stdout,
    raw: bool,
}

impl Console {
    pub fn new() -> Self {
        Console {
            out: io::stdout(),
            raw: false,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for Console {
    fn write(&mut self, text: &str, style: Style) -> Result<()> {
        let (fg, bg) = match style {
            Style::Plain => (None, None),
            Style::Label => (Some(Color::Magenta), None),
            Style::Id => (Some(Color::Blue), None),
            Style::Error => (Some(Color::Red), None),
            Style::Success => (Some(Color::Green), None),
            Style::Indicator => (None, Some(Color::DarkRed)),
            Style::KeyHint => (Some(Color::Black), Some(Color::Grey)),
        };
        if let Some(fg) = fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        // Raw mode disables output post-processing, so newlines need an
        // explicit carriage return.
        if self.raw {
            self.out.write_all(text.replace('\n', "\r\n").as_bytes())?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn overwrite_previous_line(&mut self) -> Result<()> {
        execute!(
            self.out,
            cursor::MoveToPreviousLine(1),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("failed to read answer")?;
        Ok(answer)
    }

    fn set_raw_mode(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            terminal::enable_raw_mode().context("failed to enter raw mode")?;
        } else {
            terminal::disable_raw_mode().context("failed to leave raw mode")?;
        }
        self.raw = enabled;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(Key::from_event(key))),
            _ => Ok(Some(Key::Other)),
        }
    }
}
