use crate::data::AppSettings;
use crate::ui::wizard_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use tracing::info;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    let format = settings.dump_format;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(settings);
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result?;

    let session = app.session();
    if session.step().is_terminal() {
        info!("onboarding completed");
        println!("{}", session.record().render(format)?);
    } else {
        info!(step = %session.step(), "onboarding abandoned");
    }
    Ok(())
}
