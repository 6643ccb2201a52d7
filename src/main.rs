extern crate docopt;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate sensehat_env;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

use std::process;

use docopt::Docopt;

const USAGE: &'static str = "
Reading Sense HAT environmental sensors

Usage:
  sensehat-env [<device>] [options]
  sensehat-env (-h | --help)
  sensehat-env (-v | --version)

Options:
  -h --help                    Show this help text.
  --layout <layout>            HTS221 temperature calibration layout, 10 or 8 [default: 10]
  --humidity-address <addr>    HTS221 I2C address [default: 95] (=0x5F)
  --pressure-address <addr>    LPS25H I2C address [default: 92] (=0x5C)
  --temperature                Show temperature from the humidity sensor.
  --pressure-temperature       Show temperature from the pressure sensor.
  --humidity                   Show humidity.
  --pressure                   Show pressure.
  --json                       Print all readings as a JSON status payload.
  -v --version                 Show version.

Without a selection flag every reading is shown. <device> defaults to /dev/i2c-1.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_device: Option<String>,
    flag_layout: String,
    flag_humidity_address: u8,
    flag_pressure_address: u8,
    flag_temperature: bool,
    flag_pressure_temperature: bool,
    flag_humidity: bool,
    flag_pressure: bool,
    flag_json: bool,
    flag_version: bool,
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This program can run only on Linux")
}

#[cfg(target_os = "linux")]
fn main() {
    env_logger::init();

    let args: Args = Docopt::new(USAGE).and_then(|d| d.deserialize()).unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("sensehat-env {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(target_os = "linux")]
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    use sensehat_env::{CalibrationLayout, Config, SenseHat, DEFAULT_BUS};

    let config = Config {
        layout: args.flag_layout.parse::<CalibrationLayout>()?,
        humidity_address: args.flag_humidity_address,
        pressure_address: args.flag_pressure_address,
    };
    let device = args
        .arg_device
        .clone()
        .unwrap_or_else(|| format!("/dev/i2c-{}", DEFAULT_BUS));

    let mut sense = SenseHat::open_path(&device, config)?;

    if args.flag_json {
        let readings = sense.read_all()?.rounded(2);
        println!("{}", serde_json::to_string(&readings)?);
        sense.close();
        return Ok(());
    }

    let all = !(args.flag_temperature
        || args.flag_pressure_temperature
        || args.flag_humidity
        || args.flag_pressure);

    if all || args.flag_temperature {
        println!("temperature_from_humidity: {:.2}", sense.temperature_from_humidity()?);
    }
    if all || args.flag_pressure_temperature {
        println!("temperature_from_pressure: {:.2}", sense.temperature_from_pressure()?);
    }
    if all || args.flag_humidity {
        println!("humidity: {:.2}", sense.humidity()?);
    }
    if all || args.flag_pressure {
        println!("pressure: {:.2}", sense.pressure()?);
    }
    sense.close();
    Ok(())
}
