use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{prelude::*, widgets::*};
use std::{
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::{
    countdown::{Screen, Wait},
    error::Result,
};

// ============================================================================
// Cancellation Input
// ============================================================================

pub trait Interrupts {
    /// Waits up to `timeout` for input; true when the user asked to cancel.
    fn poll_cancel(&mut self, timeout: Duration) -> io::Result<bool>;
}

pub struct KeyboardInterrupts;

impl Interrupts for KeyboardInterrupts {
    fn poll_cancel(&mut self, timeout: Duration) -> io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(is_cancel_key(key)),
            _ => Ok(false),
        }
    }
}

// Raw mode swallows SIGINT, so Ctrl+C arrives as a key.
pub fn is_cancel_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

// ============================================================================
// Terminal Screen
// ============================================================================

pub const CANCEL_HINT: &str = "Ctrl+C, q or Esc to cancel";

pub trait RawMode {
    fn enable(&mut self) -> io::Result<()>;
    fn disable(&mut self) -> io::Result<()>;
}

pub struct CrosstermRawMode;

impl RawMode for CrosstermRawMode {
    fn enable(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn disable(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }
}

/// Restores the cooked main screen when a countdown session ends.
///
/// The guard exists as soon as raw mode is on, so a failure while switching
/// screens still drops it and leaves raw mode.
pub struct AltScreenGuard<W: Write, M: RawMode> {
    out: W,
    raw: M,
}

impl<W: Write, M: RawMode> AltScreenGuard<W, M> {
    pub fn enter(out: W, mut raw: M) -> io::Result<Self> {
        raw.enable()?;
        let mut guard = Self { out, raw };
        execute!(guard.out, EnterAlternateScreen, Hide)?;
        debug!("entered alternate screen");
        Ok(guard)
    }
}

impl<W: Write, M: RawMode> Drop for AltScreenGuard<W, M> {
    fn drop(&mut self) {
        if let Err(e) = self.raw.disable() {
            warn!(error = %e, "failed to leave raw mode");
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            warn!(error = %e, "failed to leave alternate screen");
        }
        debug!("restored main screen");
    }
}

type StdoutGuard = AltScreenGuard<Stdout, CrosstermRawMode>;

pub struct TerminalScreen<B: Backend, I: Interrupts> {
    terminal: Terminal<B>,
    interrupts: I,
    _guard: Option<StdoutGuard>,
}

pub type Tty = TerminalScreen<CrosstermBackend<Stdout>, KeyboardInterrupts>;

/// Takes over the real terminal for the length of a countdown session.
pub fn open() -> Result<Tty> {
    let guard = AltScreenGuard::enter(io::stdout(), CrosstermRawMode)?;
    let mut screen = TerminalScreen::with_backend(CrosstermBackend::new(io::stdout()), KeyboardInterrupts)?;
    screen._guard = Some(guard);
    Ok(screen)
}

impl<B: Backend, I: Interrupts> TerminalScreen<B, I> {
    pub fn with_backend(backend: B, interrupts: I) -> Result<Self> {
        Ok(Self { terminal: Terminal::new(backend)?, interrupts, _guard: None })
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend, I: Interrupts> Screen for TerminalScreen<B, I> {
    fn size(&mut self) -> Result<(u16, u16)> {
        let area = self.terminal.size()?;
        Ok((area.width, area.height))
    }

    fn clear(&mut self) -> Result<()> {
        self.terminal.clear()?;
        Ok(())
    }

    /// Draws the frame from the top; the cancel hint takes the bottom row
    /// whenever the frame leaves it free.
    fn show(&mut self, frame: &[String]) -> Result<()> {
        let lines: Vec<Line> = frame.iter().map(|l| Line::from(l.as_str())).collect();
        self.terminal.draw(|f| {
            let area = f.size();
            f.render_widget(Paragraph::new(lines), area);
            if area.height > 0 && frame.len() < area.height as usize {
                let bottom = Rect { y: area.bottom() - 1, height: 1, ..area };
                let hint = Paragraph::new(CANCEL_HINT)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                f.render_widget(hint, bottom);
            }
        })?;
        Ok(())
    }

    fn wait_until(&mut self, deadline: Instant) -> Result<Wait> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(Wait::Elapsed);
            }
            if self.interrupts.poll_cancel(deadline - now)? {
                return Ok(Wait::Cancelled);
            }
        }
    }
}

/// Wipes the cooked-mode screen and homes the cursor.
pub fn clear_stdout<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    out.flush()
}
