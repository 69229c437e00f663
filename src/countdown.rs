//! The per-second countdown loop.
//!
//! Each tick fully clears the screen, drops a quarter of the terminal height
//! in blank lines, and prints the remaining `MM:SS` in the selected style,
//! every row centered on its own. Ticks are scheduled against absolute
//! deadlines measured from the start of the run so render cost never
//! accumulates into drift.

use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

use crate::{
    error::Result,
    font::{Style, center},
};

pub const TICK: Duration = Duration::from_secs(1);

// ============================================================================
// Screen Contract
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Elapsed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Cancelled,
}

/// Everything the loop needs from the terminal.
pub trait Screen {
    /// Current (width, height) in cells.
    fn size(&mut self) -> Result<(u16, u16)>;
    fn clear(&mut self) -> Result<()>;
    fn show(&mut self, frame: &[String]) -> Result<()>;
    /// Blocks until `deadline`, or returns early with [`Wait::Cancelled`]
    /// when the user aborts.
    fn wait_until(&mut self, deadline: Instant) -> Result<Wait>;
}

// ============================================================================
// Frame Composition
// ============================================================================

/// `MM:SS`, zero padded. Minutes widen past two digits instead of wrapping.
pub fn format_token(minutes: i64, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

pub fn compose_frame(token: &str, style: Style, width: u16, height: u16) -> Vec<String> {
    let mut frame = vec![String::new(); height as usize / 4];
    frame.extend(style.render(token).iter().map(|line| center(line, width as usize)));
    frame
}

// ============================================================================
// Loop
// ============================================================================

/// Counts `minutes` down to `00:00`, one frame per second.
///
/// A non-positive duration renders nothing and returns at once.
pub fn run<S: Screen>(screen: &mut S, minutes: i64, style: Style) -> Result<Outcome> {
    if minutes <= 0 {
        debug!(minutes, "empty countdown");
        return Ok(Outcome::Finished);
    }

    info!(minutes, %style, "countdown started");
    screen.clear()?;

    let start = Instant::now();
    let mut ticks: u32 = 0;

    for minute in (0..minutes).rev() {
        for second in (0..60).rev() {
            screen.clear()?;
            let (width, height) = screen.size()?;
            let token = format_token(minute, second);
            trace!(%token, width, height, "frame");
            screen.show(&compose_frame(&token, style, width, height))?;

            ticks += 1;
            if screen.wait_until(start + TICK * ticks)? == Wait::Cancelled {
                info!(%token, "countdown cancelled");
                return Ok(Outcome::Cancelled);
            }
        }
    }

    info!(minutes, "countdown finished");
    Ok(Outcome::Finished)
}
