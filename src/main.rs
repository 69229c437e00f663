mod countdown;
mod error;
mod font;
mod menu;
mod terminal;

use clap::Parser;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::Result;
use font::{DEFAULT_STYLE, Style};
use menu::{DEFAULT_LONG_BREAK, DEFAULT_SHORT_BREAK, DEFAULT_WORK, Menu, Presets};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "🍅 figtimer - Pomodoro countdown in large terminal text")]
struct Args {
    /// Style used to draw the countdown
    #[arg(short, long, value_name = "STYLE", conflicts_with = "random")]
    font: Option<String>,
    /// Pick a style at random
    #[arg(long)]
    random: bool,
    /// Print the supported styles and exit
    #[arg(long)]
    list_fonts: bool,
    #[arg(short, long, value_parser = parse_minutes)]
    work: Option<u32>,
    #[arg(short, long, value_parser = parse_minutes)]
    long_break: Option<u32>,
    #[arg(short, long, value_parser = parse_minutes)]
    short_break: Option<u32>,
}

impl Args {
    fn style(&self) -> Result<Style> {
        if self.random {
            return Ok(Style::random());
        }
        match &self.font {
            Some(name) => name.parse(),
            None => Ok(DEFAULT_STYLE),
        }
    }

    fn presets(&self) -> Presets {
        Presets {
            work: self.work.unwrap_or(DEFAULT_WORK),
            long_break: self.long_break.unwrap_or(DEFAULT_LONG_BREAK),
            short_break: self.short_break.unwrap_or(DEFAULT_SHORT_BREAK),
        }
    }
}

/// Whole minutes from `25`, `25m`, `1h` or `1h30m`.
fn parse_minutes(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim().to_lowercase();
    let mut total: u32 = 0;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'h' => {
                let hours = num.parse::<u32>().map_err(|_| "Invalid hours")?;
                total = hours.checked_mul(60).and_then(|m| total.checked_add(m)).ok_or("Duration too large")?;
                num.clear();
            }
            'm' => {
                let mins = num.parse::<u32>().map_err(|_| "Invalid minutes")?;
                total = total.checked_add(mins).ok_or("Duration too large")?;
                num.clear();
            }
            _ => return Err("Invalid format".into()),
        }
    }

    if !num.is_empty() {
        let mins = num.parse::<u32>().map_err(|_| "Invalid minutes")?;
        total = total.checked_add(mins).ok_or("Duration too large")?;
    }

    if total > 0 { Ok(total) } else { Err("Duration must be > 0".into()) }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.list_fonts {
        for style in Style::ALL {
            println!("{style}");
        }
        return Ok(());
    }

    let style = args.style()?;
    let presets = args.presets();
    info!(%style, ?presets, "starting");

    Menu::new(io::stdin().lock(), io::stdout(), terminal::open, style, presets).run()
}
