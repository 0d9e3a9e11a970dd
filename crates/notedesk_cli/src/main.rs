//! Console entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, load the notes file.
//! - Hand stdin/stdout to the menu loop.

mod menu;

use log::{info, warn};
use menu::Menu;
use notedesk_core::{init_from_config, CoreConfig, NoteService, RepoError, ServiceError};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("✗ {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_from_config(&config) {
        eprintln!("✗ logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        notedesk_core::core_version()
    );

    let mut service = NoteService::new(config.note_file());
    let loaded = service.reload();

    let stdout = io::stdout();
    let interactive = stdout.is_terminal();
    let mut menu = Menu::new(io::stdin().lock(), stdout.lock(), service, interactive);

    let outcome = match loaded {
        Ok(summary) => menu.report_load(&summary),
        Err(err) => {
            warn!(
                "event=cli_load module=cli status=error error_code={}",
                load_error_code(&err)
            );
            menu.report_load_error(&err)
        }
    }
    .and_then(|()| menu.run());

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("✗ console error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Repo(RepoError::Io { .. }) => "read_failed",
        ServiceError::Repo(RepoError::Codec(_)) => "invalid_header",
        _ => "load_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::load_error_code;
    use notedesk_core::{CodecError, RepoError, ServiceError};
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn load_errors_map_to_stable_codes() {
        let io_err = ServiceError::Repo(RepoError::Io {
            path: PathBuf::from("notes.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(load_error_code(&io_err), "read_failed");

        let header_err = ServiceError::Repo(RepoError::Codec(CodecError::InvalidHeader(
            "x".to_string(),
        )));
        assert_eq!(load_error_code(&header_err), "invalid_header");
    }
}
