use crate::data::persistence::{is_json_path, read_file};
use crate::data::{AppSettings, DumpFormat};
use crate::wizard::{Session, WizardEvent};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

pub fn run(script: &Path, format: Option<DumpFormat>) -> Result<()> {
    let settings = AppSettings::load()?;
    let events = load_script(script)?;
    let format = format.unwrap_or(settings.dump_format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    replay(&settings, events, format, &mut out)
}

/// Reads a list of events from a `.json` file, or YAML for anything else.
pub(crate) fn load_script(path: &Path) -> Result<Vec<WizardEvent>> {
    if !path.exists() {
        anyhow::bail!("script {} does not exist", path.display());
    }
    read_file(path, is_json_path(path))
        .with_context(|| format!("failed to load replay script {}", path.display()))
}

/// Dispatches `events` in order against a fresh session. Rejected events are
/// reported and skipped.
pub(crate) fn replay<W: Write>(
    settings: &AppSettings,
    events: Vec<WizardEvent>,
    format: DumpFormat,
    out: &mut W,
) -> Result<()> {
    let mut session = Session::new(settings);
    let total = events.len();
    let mut rejected = 0;

    for (i, event) in events.into_iter().enumerate() {
        let n = i + 1;
        let name = event.name();
        if let Err(e) = session.dispatch(event) {
            warn!(event = n, kind = name, error = %e, "event rejected");
            writeln!(out, "event {n}: {e}")?;
            rejected += 1;
        }
    }
    info!(total, rejected, step = %session.step(), "replay finished");

    if session.step().is_terminal() {
        writeln!(out, "{}", session.record().render(format)?)?;
    } else {
        writeln!(out, "wizard stopped at step {}", session.step())?;
    }
    Ok(())
}
