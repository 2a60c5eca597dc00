use std::process::ExitCode;

fn main() -> ExitCode {
    bizpulse_cli::run()
}
