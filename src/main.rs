use std::process::ExitCode;

fn main() -> ExitCode {
    ecoml::logging::init();
    match ecoml::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
