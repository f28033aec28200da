// Terminal output for one analysis cycle
use crate::model::PriceStatistics;
use std::fmt::Display;
use std::io::{self, Write};

pub fn show_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Stock Analysis Application")?;
    writeln!(
        out,
        "Analyze stock performance and get data-driven insights for informed investment decisions.\n"
    )
}

pub fn show_fetching<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Fetching data...")
}

pub fn show_statistics<W: Write>(out: &mut W, stats: &PriceStatistics) -> io::Result<()> {
    let json = serde_json::to_string_pretty(stats).map_err(io::Error::other)?;
    writeln!(out, "\n== Price Statistics ==")?;
    writeln!(out, "{}", json)
}

pub fn show_analysis<W: Write>(out: &mut W, company: &str, model: &str, narrative: &str) -> io::Result<()> {
    writeln!(out, "\n== Analysis of {} ({}) ==", company, model)?;
    writeln!(out, "{}\n", narrative.trim_end())
}

pub fn show_error<W: Write>(out: &mut W, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "❌ {}\n", err)
}
