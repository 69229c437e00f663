//! Interactive menu driving the countdowns.

use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::{
    countdown::{self, Outcome, Screen, compose_frame, format_token},
    error::Result,
    font::Style,
    terminal::clear_stdout,
};

pub const DEFAULT_WORK: u32 = 25;
pub const DEFAULT_LONG_BREAK: u32 = 10;
pub const DEFAULT_SHORT_BREAK: u32 = 5;

// ============================================================================
// Presets & Sessions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presets {
    pub work: u32,
    pub long_break: u32,
    pub short_break: u32,
}

impl Default for Presets {
    fn default() -> Self {
        Self { work: DEFAULT_WORK, long_break: DEFAULT_LONG_BREAK, short_break: DEFAULT_SHORT_BREAK }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub label: &'static str,
    pub minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Pomodoro,
    LongBreak,
    ShortBreak,
    Custom,
    Options,
}

impl Choice {
    fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::Pomodoro),
            2 => Some(Self::LongBreak),
            3 => Some(Self::ShortBreak),
            4 => Some(Self::Custom),
            5 => Some(Self::Options),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::LongBreak => "Long Break",
            Self::ShortBreak => "Short Break",
            Self::Custom => "Custom Duration",
            Self::Options => "Options",
        }
    }
}

const CHOICES: [Choice; 5] = [Choice::Pomodoro, Choice::LongBreak, Choice::ShortBreak, Choice::Custom, Choice::Options];

enum Flow {
    Continue,
    Restart,
    Quit,
}

// ============================================================================
// Menu
// ============================================================================

/// Reads choices from `input`, writes prompts to `output`, and opens a fresh
/// screen through `open_screen` for every countdown it starts.
pub struct Menu<R, W, F> {
    input: R,
    output: W,
    open_screen: F,
    style: Style,
    presets: Presets,
}

impl<R, W, F, S> Menu<R, W, F>
where
    R: BufRead,
    W: Write,
    F: FnMut() -> Result<S>,
    S: Screen,
{
    pub fn new(input: R, output: W, open_screen: F, style: Style, presets: Presets) -> Self {
        Self { input, output, open_screen, style, presets }
    }

    /// Loops over the menu until input runs out. Unreadable input restarts
    /// the session from the font banner.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Using font: {}", self.style)?;
        loop {
            match self.round()? {
                Flow::Continue => {}
                Flow::Restart => writeln!(self.output, "Using font: {}", self.style)?,
                Flow::Quit => break,
            }
        }
        debug!("input closed, leaving menu");
        Ok(())
    }

    fn round(&mut self) -> Result<Flow> {
        for (i, choice) in CHOICES.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, choice.label())?;
        }

        let Some(line) = self.prompt("Option: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(number) = line.trim().parse::<i64>() else {
            writeln!(self.output, "Invalid input. Please enter a number.")?;
            return Ok(Flow::Restart);
        };

        let p = self.presets;
        match Choice::from_number(number) {
            Some(Choice::Pomodoro) => self.start(&[Session { label: "Pomodoro", minutes: p.work.into() }], false)?,
            Some(Choice::LongBreak) => {
                self.start(&[Session { label: "Long Break", minutes: p.long_break.into() }], false)?
            }
            Some(Choice::ShortBreak) => {
                self.start(&[Session { label: "Short Break", minutes: p.short_break.into() }], false)?
            }
            Some(Choice::Custom) => {
                let Some(line) = self.prompt("Duration (mins): ")? else {
                    return Ok(Flow::Quit);
                };
                match line.trim().parse::<i64>() {
                    Ok(minutes) => self.start(&[Session { label: "Custom Duration", minutes }], false)?,
                    Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
                }
            }
            Some(Choice::Options) => {
                if self.ask_auto_break()? {
                    self.start(
                        &[
                            Session { label: "Pomodoro", minutes: p.work.into() },
                            Session { label: "Long Break", minutes: p.long_break.into() },
                        ],
                        true,
                    )?;
                }
            }
            None => writeln!(self.output, "Valid options are: 1, 2, 3, 4, 5")?,
        }

        Ok(Flow::Continue)
    }

    /// Runs `sessions` back to back on one screen; a cancel ends them all.
    ///
    /// A finished run leaves its `00:00` frame on the main screen, since the
    /// alternate screen it was drawn on goes away with the session.
    fn start(&mut self, sessions: &[Session], auto: bool) -> Result<()> {
        let (outcome, last_frame) = {
            let mut screen = (self.open_screen)()?;
            let mut outcome = Outcome::Finished;
            for session in sessions {
                info!(label = session.label, minutes = session.minutes, "starting session");
                outcome = countdown::run(&mut screen, session.minutes, self.style)?;
                if outcome == Outcome::Cancelled {
                    break;
                }
            }

            let mut last_frame = None;
            if outcome == Outcome::Finished && sessions.iter().any(|s| s.minutes > 0) {
                let (width, height) = screen.size()?;
                last_frame = Some(compose_frame(&format_token(0, 0), self.style, width, height));
            }
            (outcome, last_frame)
        };

        match outcome {
            Outcome::Cancelled => {
                clear_stdout(&mut self.output)?;
                let notice = if auto { "Auto mode canceled" } else { "Countdown canceled" };
                writeln!(self.output, "{notice}")?;
            }
            Outcome::Finished => {
                if let Some(frame) = last_frame {
                    clear_stdout(&mut self.output)?;
                    for line in frame {
                        writeln!(self.output, "{line}")?;
                    }
                }
            }
        }
        Ok(())
    }

    fn ask_auto_break(&mut self) -> Result<bool> {
        loop {
            let Some(line) = self.prompt("Automatically select break after pomodoro? [Y]es/[N]o ")? else {
                return Ok(false);
            };
            match line.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Invalid option, please enter 'Y' or 'N'.")?,
            }
        }
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::tests::RecordingScreen;
    use std::{cell::RefCell, io::Cursor, rc::Rc};

    type Frames = Rc<RefCell<Vec<usize>>>;

    /// Runs the menu over `input`, returning its output and the frame count
    /// of every screen it opened.
    fn drive(input: &str, presets: Presets, cancel_at: Option<usize>) -> (String, Vec<usize>) {
        let opened: Frames = Rc::new(RefCell::new(Vec::new()));
        let mut output = Vec::new();
        {
            let log = Rc::clone(&opened);
            let open = move || {
                let mut screen = RecordingScreen::new(80, 24);
                screen.cancel_at = cancel_at;
                log.borrow_mut().push(0);
                Ok(CountingScreen { inner: screen, log: Rc::clone(&log) })
            };
            let mut menu = Menu::new(Cursor::new(input.to_string()), &mut output, open, Style::Digital, presets);
            menu.run().unwrap();
        }
        let frames = opened.borrow().clone();
        (String::from_utf8(output).unwrap(), frames)
    }

    struct CountingScreen {
        inner: RecordingScreen,
        log: Frames,
    }

    impl Screen for CountingScreen {
        fn size(&mut self) -> Result<(u16, u16)> {
            self.inner.size()
        }

        fn clear(&mut self) -> Result<()> {
            self.inner.clear()
        }

        fn show(&mut self, frame: &[String]) -> Result<()> {
            self.inner.show(frame)?;
            if let Some(count) = self.log.borrow_mut().last_mut() {
                *count += 1;
            }
            Ok(())
        }

        fn wait_until(&mut self, deadline: std::time::Instant) -> Result<countdown::Wait> {
            self.inner.wait_until(deadline)
        }
    }

    fn short() -> Presets {
        Presets { work: 1, long_break: 1, short_break: 1 }
    }

    #[test]
    fn prints_banner_and_menu() {
        let (out, opened) = drive("", Presets::default(), None);
        assert!(out.starts_with("Using font: digital\n1. Pomodoro\n2. Long Break\n3. Short Break\n"));
        assert!(out.contains("4. Custom Duration\n5. Options\nOption: "));
        assert!(opened.is_empty());
    }

    #[test]
    fn non_numeric_choice_restarts_the_session() {
        let (out, opened) = drive("abc\n", Presets::default(), None);
        assert!(out.contains("Option: Invalid input. Please enter a number.\nUsing font: digital\n1. Pomodoro\n"));
        assert_eq!(out.matches("Using font: ").count(), 2);
        assert_eq!(out.matches("Option: ").count(), 2);
        assert!(opened.is_empty());
    }

    #[test]
    fn out_of_range_choice_does_not_repeat_banner() {
        let (out, _) = drive("7\n", Presets::default(), None);
        assert_eq!(out.matches("Using font: ").count(), 1);
    }

    #[test]
    fn out_of_range_choice_lists_options() {
        let (out, opened) = drive("9\n", Presets::default(), None);
        assert!(out.contains("Valid options are: 1, 2, 3, 4, 5"));
        assert!(opened.is_empty());
    }

    #[test]
    fn presets_run_their_durations() {
        let presets = Presets { work: 3, long_break: 2, short_break: 1 };
        let (out, opened) = drive("1\n2\n3\n", presets, None);
        assert_eq!(opened, vec![180, 120, 60]);
        assert!(!out.contains("finished"));
        assert_eq!(out.matches(&final_frame()).count(), 3);
    }

    /// What a finished run leaves behind on the 80x24 recording screen.
    fn final_frame() -> String {
        let mut text = String::from("\x1b[1;1H\x1b[2J");
        for line in compose_frame("00:00", Style::Digital, 80, 24) {
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn finished_run_leaves_final_frame_before_menu() {
        let (out, _) = drive("3\n", short(), None);
        let frame = out.find(&final_frame()).unwrap();
        let menu_again = out.rfind("1. Pomodoro\n").unwrap();
        assert!(frame < menu_again);
        assert!(!out.contains("canceled"));
    }

    #[test]
    fn custom_duration_prompts_for_minutes() {
        let (out, opened) = drive("4\n2\n", Presets::default(), None);
        assert!(out.contains("Duration (mins): "));
        assert_eq!(opened, vec![120]);
    }

    #[test]
    fn custom_zero_or_negative_renders_nothing() {
        let (out, opened) = drive("4\n0\n4\n-3\n", Presets::default(), None);
        assert_eq!(opened, vec![0, 0]);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn custom_non_numeric_duration_is_rejected() {
        let (out, opened) = drive("4\nsoon\n", Presets::default(), None);
        assert!(out.contains("Duration (mins): Invalid input. Please enter a number."));
        assert!(opened.is_empty());
    }

    #[test]
    fn auto_mode_chains_work_and_long_break() {
        let presets = Presets { work: 2, long_break: 1, short_break: 3 };
        let (out, opened) = drive("5\ny\n", presets, None);
        assert_eq!(opened, vec![180]);
        assert_eq!(out.matches(&final_frame()).count(), 1);
        assert!(!out.contains("finished"));
    }

    #[test]
    fn auto_prompt_repeats_until_yes_or_no() {
        let (out, opened) = drive("5\nmaybe\nN\n", short(), None);
        assert!(out.contains("Invalid option, please enter 'Y' or 'N'."));
        assert!(opened.is_empty());
    }

    #[test]
    fn auto_mode_cancelled_during_break_returns_to_menu() {
        let (out, opened) = drive("5\ny\n", short(), Some(70));
        assert_eq!(opened, vec![70]);

        let notice = out.find("Auto mode canceled\n").unwrap();
        let clear = out.find("\x1b[2J").unwrap();
        assert!(clear < notice);
        assert!(out[notice..].contains("1. Pomodoro\n"));
        assert!(!out.contains(&final_frame()));
    }

    #[test]
    fn single_countdown_cancel_also_returns_to_menu() {
        let (out, opened) = drive("1\n3\n", short(), Some(10));
        assert_eq!(opened, vec![10, 10]);
        assert_eq!(out.matches("Countdown canceled\n").count(), 2);
        assert_eq!(out.matches("Option: ").count(), 3);
    }
}
