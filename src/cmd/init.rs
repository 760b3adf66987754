use crate::data::AppSettings;
use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    let stdout = std::io::stdout();
    init_in(&dir, &mut stdout.lock())
}

/// Creates `dir`, writes the defaults and reports to `out`.
pub(crate) fn init_in<W: Write>(dir: &Path, out: &mut W) -> Result<()> {
    fs::create_dir_all(dir)?;
    run_in_dir(dir)?;
    writeln!(out, "Config initialized in {}.", dir.display())?;
    Ok(())
}

/// Writes the default config.yaml into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)
}
