use std::io;
use std::process::{ExitCode, ExitStatus};

use clap::Parser;
use tracing::info;

mod app;
mod cli;
mod config;
mod error;
mod events;
mod git;
mod logging;
mod plan;
mod rebase;
mod text_layout;
mod theme;
mod tui;
mod ui;

use app::{App, SessionOutcome};
use cli::Cli;
use config::AppConfig;
use error::AppError;
use git::GitCli;
use rebase::Rebaser;
use theme::Theme;
use tui::{Tui, TuiTerminal};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("rebase-tui: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, AppError> {
    let config = AppConfig::load(cli.config.as_deref())?.apply_cli(cli);
    logging::init(config.log_file.as_deref()).map_err(AppError::Logging)?;

    let git = GitCli::new(&config.git_program).with_workdir(config.git_workdir.clone());
    let theme = config
        .theme_file
        .as_deref()
        .map(Theme::load_or_default)
        .unwrap_or_default();
    let app = App::from_history(git.list_commits(config.max_commits));

    let outcome = {
        let mut tui = Tui::enter()?;
        let result = run_app(tui.terminal_mut(), app, &theme);
        tui.restore()?;
        result?
    };

    match outcome {
        SessionOutcome::Quit => Ok(ExitCode::SUCCESS),
        SessionOutcome::Rebase(entries) => {
            let status = Rebaser::new(&git).run(&entries)?;
            Ok(exit_code_for(status))
        }
    }
}

fn run_app(terminal: &mut TuiTerminal, mut app: App, theme: &Theme) -> io::Result<SessionOutcome> {
    while app.running {
        terminal.draw(|frame| ui::render(frame, &app, theme))?;
        app.handle_event(events::next_event()?);
    }
    let outcome = app.into_outcome();
    if let SessionOutcome::Rebase(entries) = &outcome {
        info!(entries = entries.len(), "session finished with rebase request");
    }
    Ok(outcome)
}

/// The rebase's exit status becomes ours.
fn exit_code_for(status: ExitStatus) -> ExitCode {
    ExitCode::from(exit_status_byte(status))
}

fn exit_status_byte(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }
    1
}
