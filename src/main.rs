use std::process::ExitCode;

fn main() -> ExitCode {
    webcam_settings_lib::run()
}
