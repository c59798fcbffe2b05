use std::ffi::OsString;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::camera::device::CameraDevice;
use crate::camera::error::CameraError;
use crate::camera::manager::CameraManager;
use crate::cli::adjust::{adjusted_value, effective_step, Direction};
use crate::cli::args::Options;
use crate::cli::error::{CliError, Result};
use crate::settings::store;

const PROGRAM_NAME: &str = "webcam-settings";

/// State handed to a command handler for one run.
pub struct Context<'a> {
    pub manager: &'a CameraManager,
    pub options: &'a Options,
    pub out: &'a mut dyn Write,
}

/// A CLI command keyword bound to its handler.
pub struct Command {
    pub keyword: &'static str,
    pub description: &'static str,
    pub handler: fn(&mut Context<'_>) -> Result<()>,
}

/// Every known command, in help order.
pub static COMMANDS: &[Command] = &[
    Command {
        keyword: "names",
        description: "List the names of all available cameras",
        handler: names,
    },
    Command {
        keyword: "describe",
        description: "Print the properties of one camera (--camera) or all cameras",
        handler: describe,
    },
    Command {
        keyword: "save",
        description: "Save the settings of one camera (--camera) or all cameras to --file",
        handler: save,
    },
    Command {
        keyword: "load",
        description: "Restore camera settings from --file, optionally only for --camera",
        handler: load,
    },
    Command {
        keyword: "increment",
        description: "Increase --property of --camera by its step or by --step",
        handler: increment,
    },
    Command {
        keyword: "decrement",
        description: "Decrease --property of --camera by its step or by --step",
        handler: decrement,
    },
];

/// Parse `args` (without the program name) and run the single command
/// they name, writing command output to `out`.
pub fn run<I, T>(args: I, manager: &CameraManager, out: &mut dyn Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = std::iter::once(OsString::from(PROGRAM_NAME)).chain(args.into_iter().map(Into::into));
    let options = Options::parse_from_args(args)?;

    if options.help {
        return write_help(out);
    }

    let command = select_command(&options.commands)?;
    debug!("Running command '{}'", command.keyword);

    let mut context = Context {
        manager,
        options: &options,
        out,
    };
    (command.handler)(&mut context)
}

/// Resolve the one command word of a run.
pub fn select_command(words: &[String]) -> Result<&'static Command> {
    let word = match words {
        [] => {
            return Err(CliError::Argument(
                "At least one command is required.".to_string(),
            ))
        }
        [word] => word,
        _ => {
            return Err(CliError::Argument(format!(
                "Only one command per run is possible. Found: {}",
                words.join(", ")
            )))
        }
    };

    COMMANDS
        .iter()
        .find(|c| c.keyword == word.as_str())
        .ok_or_else(|| CliError::Argument(format!("Command '{word}' is not known.")))
}

fn write_help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", Options::render_help().trim_end())?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    let width = COMMANDS.iter().map(|c| c.keyword.len()).max().unwrap_or(0);
    for command in COMMANDS {
        writeln!(out, "  {:width$}  {}", command.keyword, command.description)?;
    }
    Ok(())
}

/// Cameras a `save` or `describe` run works on: the `--camera` option, or
/// every enumerable camera. A camera named by `--camera` must bind; during
/// a sweep over all cameras unbindable ones are skipped.
fn selected_cameras(context: &Context<'_>) -> Result<Vec<CameraDevice>> {
    if let Some(name) = &context.options.camera {
        return Ok(vec![context.manager.camera_by_name(name)?]);
    }

    let mut cameras = Vec::new();
    for name in context.manager.camera_names()? {
        match context.manager.camera_by_name(&name) {
            Ok(camera) => cameras.push(camera),
            Err(e @ CameraError::DeviceBinding(_)) => warn!("Skipping '{name}': {e}"),
            Err(e) => return Err(e.into()),
        }
    }
    if cameras.is_empty() {
        return Err(CameraError::NoDevices.into());
    }
    Ok(cameras)
}

fn names(context: &mut Context<'_>) -> Result<()> {
    for name in context.manager.camera_names()? {
        writeln!(context.out, "{name}")?;
    }
    Ok(())
}

fn describe(context: &mut Context<'_>) -> Result<()> {
    for camera in selected_cameras(context)? {
        let mut details = Vec::with_capacity(camera.properties().len());
        let mut summary = Vec::with_capacity(camera.properties().len());

        for property in camera.properties() {
            let dto = property.to_dto()?;
            let mode = match (dto.can_adapt_automatically, dto.is_automatically_adapting) {
                (false, _) => "",
                (true, true) => " (auto)",
                (true, false) => " (manual)",
            };
            summary.push(format!("{}={}{mode}", dto.name, dto.value));

            let auto = match (dto.can_adapt_automatically, dto.is_automatically_adapting) {
                (false, _) => "unsupported",
                (true, true) => "on",
                (true, false) => "off",
            };
            details.push(format!(
                "  {} {}: range {}..{}, default {}, step {}, auto {auto}",
                property.group(),
                dto.name,
                dto.min_value,
                dto.max_value,
                dto.default,
                dto.stepping_delta,
            ));
        }

        writeln!(context.out, "Camera {}: {}", camera.name(), summary.join(", "))?;
        for line in details {
            writeln!(context.out, "{line}")?;
        }
    }
    Ok(())
}

fn save(context: &mut Context<'_>) -> Result<()> {
    let path = context.options.require_file("save")?;
    let snapshots = selected_cameras(context)?
        .iter()
        .map(CameraDevice::to_dto)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    store::save_cameras(path, &snapshots)?;
    info!("Saved {} camera(s) to {}", snapshots.len(), path.display());
    Ok(())
}

fn load(context: &mut Context<'_>) -> Result<()> {
    let path = context.options.require_file("load")?;
    let snapshots = store::load_cameras(path)?;

    let filter = context.options.camera.as_deref();
    for snapshot in snapshots
        .iter()
        .filter(|s| filter.map_or(true, |name| s.name == name))
    {
        let camera = context.manager.camera_by_name(&snapshot.name)?;
        camera.restore_dto(snapshot)?;
        writeln!(context.out, "Restored {}", snapshot.name)?;
    }
    Ok(())
}

fn increment(context: &mut Context<'_>) -> Result<()> {
    step_property(context, "increment", Direction::Up)
}

fn decrement(context: &mut Context<'_>) -> Result<()> {
    step_property(context, "decrement", Direction::Down)
}

fn step_property(context: &mut Context<'_>, keyword: &str, direction: Direction) -> Result<()> {
    let camera_name = context.options.require_camera(keyword)?;
    let property_name = context.options.require_property(keyword)?;

    let camera = context.manager.camera_by_name(camera_name)?;
    let property = camera.property_by_name(property_name)?;

    let step = effective_step(property.increment_size(), context.options.step);
    let current = property.value()?;
    let value = adjusted_value(
        current,
        step,
        direction,
        property.min_value(),
        property.max_value(),
    );
    property.set_value(value)?;

    debug!("{camera_name}/{property_name}: {current} -> {value} (step {step})");
    writeln!(context.out, "{camera_name}: {property_name} = {value}")?;
    Ok(())
}
