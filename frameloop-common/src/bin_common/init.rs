use std::path::Path;

use color_eyre::{
    config::{HookBuilder, Theme},
    eyre::{self, Context},
};
use fern_format::{Format, Stream};
use log::LevelFilter;

/// Installs the eyre report hook and a panic hook that reports to both stderr and the
/// log.
pub fn init_eyre() -> eyre::Result<()> {
    let stderr_theme = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        Theme::dark()
    } else {
        Theme::new()
    };

    let (stderr_panic_hook, eyre_hook) =
        HookBuilder::default().theme(stderr_theme).into_hooks();
    eyre_hook
        .install()
        .wrap_err("failed to install eyre hook")?;

    // the log file never gets escape codes
    let (log_panic_hook, _) = HookBuilder::default().theme(Theme::new()).into_hooks();

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("{}", stderr_panic_hook.panic_report(info));
        log::error!(target: "panic", "{}", log_panic_hook.panic_report(info));
    }));

    Ok(())
}

/// Stdout shows per-step chaining details only when asked for.
pub fn stdout_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Logs to stdout at `stdout_level`, and everything down to debug into `logfile` if
/// given.
pub fn init_logger(logfile: Option<&Path>, stdout_level: LevelFilter) -> eyre::Result<()> {
    logger(logfile, stdout_level)?
        .apply()
        .wrap_err("failed to set the logger")
}

fn logger(logfile: Option<&Path>, stdout_level: LevelFilter) -> eyre::Result<fern::Dispatch> {
    let stdout = fern::Dispatch::new()
        .level(stdout_level)
        .format(Format::new().color_if_supported(Stream::Stdout).callback())
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        // image decoders can be chatty
        .level_for("png", LevelFilter::Warn)
        .chain(stdout);

    if let Some(logfile) = logfile {
        let file = fern::log_file(logfile)
            .wrap_err_with(|| format!("failed to open the log file at: {logfile:?}"))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(Format::new().thread_names().callback())
                .chain(file),
        );
    }

    Ok(dispatch)
}
