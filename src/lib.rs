pub mod camera;
pub mod cli;
pub mod config;
pub mod logging;
pub mod settings;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use tracing::{debug, info};

use camera::backend::CameraBackend;
use camera::error::Result;
use camera::manager::CameraManager;
use config::AppConfig;

/// Create the camera backend for the current platform.
///
/// When `DUMMY_CAMERA=1` is set, a simulated camera is used instead.
fn create_backend(config: &AppConfig) -> Result<Box<dyn CameraBackend>> {
    if config.dummy_backend {
        info!("Using simulated camera backend");
        return Ok(Box::new(camera::dummy::DummyBackend::new()));
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(camera::platform::WindowsBackend::new()?))
    }

    #[cfg(not(target_os = "windows"))]
    {
        info!("No native camera backend on this platform");
        Ok(Box::new(camera::backend::NullBackend))
    }
}

/// Build the camera manager selected by `config`.
pub fn create_manager(config: &AppConfig) -> Result<CameraManager> {
    Ok(CameraManager::new(create_backend(config)?))
}

fn run_with<I, T>(config: &AppConfig, args: I, out: &mut dyn Write) -> cli::error::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let manager = create_manager(config)?;
    cli::commands::run(args, &manager, out)
}

/// Process exit status for a run: 0 on success, 1 after reporting the error
/// on stderr.
fn exit_status(result: &cli::error::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            debug!("Run failed: {e:?}");
            eprintln!("{e}");
            1
        }
    }
}

/// Process entry point: runs one command from the process arguments.
pub fn run() -> ExitCode {
    let config = AppConfig::from_env();
    logging::init(&config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run_with(&config, std::env::args_os().skip(1), &mut out);
    ExitCode::from(exit_status(&result))
}
