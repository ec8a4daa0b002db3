use std::process::ExitCode;

fn main() -> ExitCode {
    cafeteria_cli::run()
}
