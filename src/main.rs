//! `pitch` binary.

use std::process::ExitCode;

use clap::Parser;
use pitch::cli::{resolve_project_root, Cli, CommandDispatcher, Commands};
use pitch::shell::is_ci;
use pitch::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Diagnostics go to stderr so stdout stays clean for `--json` output.
///
/// `--debug` wins over `RUST_LOG`; without either only info and above
/// from this crate is shown.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pitch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pitch=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Prompts are only offered on a terminal session outside CI, and never
/// for `install --non-interactive`.
fn wants_prompts(cli: &Cli) -> bool {
    let opted_out = matches!(&cli.command, Some(Commands::Install(args)) if args.non_interactive);
    !opted_out && !is_ci()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::debug!("Parsed arguments: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(wants_prompts(&cli), OutputMode::from_flags(cli.verbose, cli.quiet));
    let result = resolve_project_root(cli.project.as_deref()).and_then(|root| {
        CommandDispatcher::new(root)
            .with_config(cli.config.clone())
            .dispatch(&cli, ui.as_mut())
    });

    match result {
        Ok(result) => ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
