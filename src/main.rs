use std::process::ExitCode;

use smartmv::{exit_code, output as out, SmartmvError};

mod app;
mod logging;

fn main() -> ExitCode {
    let args = smartmv::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // failing groups were already printed one by one
            let reported = matches!(
                e.downcast_ref::<SmartmvError>(),
                Some(SmartmvError::ExternalCommandFailure { .. })
            );
            if !reported {
                out::print_error(&format!("{e:#}"));
            }
            ExitCode::from(u8::try_from(exit_code(&e)).unwrap_or(1))
        }
    }
}
