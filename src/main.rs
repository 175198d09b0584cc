mod config;
mod dump;

use std::thread;
use std::time::Duration;

use clap::Parser;
use rm_input::{ContactFields, Coord, CoordMode, InputDevices, PointerFields};

use config::{Cli, Command, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(&cli);

    if let Command::Dump { device } = &cli.command {
        let path = match device.as_str() {
            "pen" => &config.pen_device,
            "touch" => &config.touch_device,
            "keys" => &config.key_device,
            other => return Err(format!("Unknown device '{}' (pen, touch, keys)", other).into()),
        };
        return dump::run_dump(path);
    }

    let profile = config.model.profile();
    log::info!(
        "rm-input starting (model={}, pen={}, touch={}, keys={}, coords={})",
        profile.name,
        config.pen_device.display(),
        config.touch_device.display(),
        config.key_device.display(),
        config.coords
    );
    let devices = InputDevices::open(profile, &config.paths());
    if !matches!(cli.command, Command::Listen) {
        devices.sync();
    }

    match cli.command {
        Command::Listen => listen(&devices, config.coords),
        Command::Tap { x, y } => tap(&devices, point(config.coords, x, y)),
        Command::Key { code } => {
            devices.submit_key(code, true)?;
            devices.submit_key(code, false)?;
            Ok(())
        }
        Command::Pen { x, y, pressure } => pen(&devices, point(config.coords, x, y), pressure),
        Command::Dump { .. } => Ok(()),
    }
}

fn point(mode: CoordMode, x: i32, y: i32) -> Coord {
    Coord { mode, x, y }
}

fn listen(devices: &InputDevices, mode: CoordMode) -> Result<(), BoxError> {
    devices.on_pointer(mode, |r| {
        log::info!(
            "pointer pen={} touch={} x={} y={} pressure={}",
            r.pen_down,
            r.touch_down,
            r.x,
            r.y,
            r.pressure
        );
    });
    devices.on_touch(mode, |c| {
        log::info!("contact id={} x={} y={}", c.tracking_id, c.x, c.y);
    });
    devices.on_key(|code, down| {
        log::info!("key {} {}", code, if down { "down" } else { "up" });
    });

    devices.start_listening()?;
    while devices.is_listening() {
        thread::sleep(Duration::from_secs(1));
    }
    Err("listener stopped".into())
}

fn tap(devices: &InputDevices, at: Coord) -> Result<(), BoxError> {
    let id = devices.begin_contact()?;
    devices.submit_contact(id, at, ContactFields::X | ContactFields::Y)?;
    thread::sleep(Duration::from_millis(50));
    devices.end_contact(id)?;
    log::info!("Tapped ({}, {}) as contact {}", at.x, at.y, id);
    Ok(())
}

fn pen(devices: &InputDevices, at: Coord, pressure: i32) -> Result<(), BoxError> {
    devices.submit_pointer(true, true, at, pressure, PointerFields::all())?;
    thread::sleep(Duration::from_millis(50));
    devices.submit_pointer(
        false,
        false,
        at,
        0,
        PointerFields::PEN | PointerFields::TOUCH | PointerFields::PRESSURE,
    )?;
    log::info!("Pen touched ({}, {}) at pressure {}", at.x, at.y, pressure);
    Ok(())
}
