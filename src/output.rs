use std::io::{self, Write};

use serde::Serialize;

use crate::app::{AlbumAction, SyncReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_sync(report: &SyncReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_sync(report: &SyncReport) -> io::Result<()> {
        let mut stdout = io::stdout();
        Self::write_summary(&mut stdout, report)
    }

    pub fn write_summary<W: Write>(out: &mut W, report: &SyncReport) -> io::Result<()> {
        writeln!(out, "gallery sync summary")?;
        writeln!(
            out,
            "  extracted: {}  already present: {}  failed: {}",
            report.count(AlbumAction::Extracted),
            report.count(AlbumAction::Present),
            report.count(AlbumAction::ExtractionFailed) + report.count(AlbumAction::FetchFailed),
        )?;
        writeln!(out, "  downloaded bytes: {}", report.downloaded_bytes)?;
        if let Some(err) = &report.catalog_error {
            writeln!(out, "  catalog unavailable: {err}")?;
        }
        for item in &report.items {
            if item.action == AlbumAction::NotOwned {
                continue;
            }
            write!(out, "  {}/{} ({})", item.year, item.name, item.action.as_str())?;
            match &item.error {
                Some(err) => writeln!(out, ": {err}")?,
                None => writeln!(out)?,
            }
        }
        if report.aborted {
            writeln!(out, "  run stopped early after a failed download")?;
        }
        Ok(())
    }
}
