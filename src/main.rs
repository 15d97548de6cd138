mod cli;
mod command;
mod error;
mod pdf;
mod picker;
mod search;
mod select;
mod viewer;

use clap::Parser;
use cli::Cli;
use picker::Picker;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pdf_picker={}", default_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Picker::from_cli(&cli).and_then(|picker| picker.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            command::notify(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn error_line(e: &error::Error) -> String {
    format!("error: {}", e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_line_is_prefixed() {
        let e = error::Error::ToolNotFound {
            role: "Selector",
            command: "fzf".to_string(),
        };
        assert_eq!(error_line(&e), "error: Selector (fzf) not found!");
    }
}
