//! Terminal styling used by the text report.
//!
//! Formatters never touch escape codes directly; they ask a [`Palette`] to
//! style a fragment with a named [`Tone`] and to draw tables. Swap
//! [`AnsiPalette`] for [`PlainPalette`] to get the same report without color.

use owo_colors::{OwoColorize, Style};
use tabled::{builder::Builder, settings::Style as TableStyle};

/// Named styles the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Red,
    RedBold,
    White,
    GreenBold,
    CyanBold,
    YellowBold,
    OrangeBold,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Red => Style::new().red(),
            Tone::RedBold => Style::new().red().bold(),
            Tone::White => Style::new().white(),
            Tone::GreenBold => Style::new().green().bold(),
            Tone::CyanBold => Style::new().cyan().bold(),
            Tone::YellowBold => Style::new().yellow().bold(),
            Tone::OrangeBold => Style::new().truecolor(255, 165, 0).bold(),
        }
    }
}

/// Styling and table drawing capability handed to a formatter.
pub trait Palette {
    fn colorize(&self, text: &str, tone: Tone) -> String;
    fn render_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String;
}

/// ANSI colors via owo-colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPalette;

impl Palette for AnsiPalette {
    fn colorize(&self, text: &str, tone: Tone) -> String {
        text.style(tone.style()).to_string()
    }

    fn render_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        unicode_table(headers, rows)
    }
}

/// Leaves text untouched. Used for `--no-color`, `NO_COLOR` and file output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn colorize(&self, text: &str, _tone: Tone) -> String {
        text.to_string()
    }

    fn render_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        unicode_table(headers, rows)
    }
}

/// Picks a palette for the requested color setting.
pub fn palette_for(color: bool) -> Box<dyn Palette> {
    if color {
        Box::new(AnsiPalette)
    } else {
        Box::new(PlainPalette)
    }
}

fn unicode_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    builder.build().with(TableStyle::modern()).to_string()
}
