use std::env::args;
use std::io::Write;
use std::process::exit;

use config_traits::{StdConfig, StdConfigLoad1};
use gumdrop::Options;
use ledpwm_cycle::cancel::exit_code_for;
use ledpwm_cycle::{prepare, CancelToken, CycleError, IndicatorSink, LogSink};
use ledpwm_platform::error::PlatformError;
use ledpwm_platform::KeyboardIndicators;
use log::LevelFilter;

use crate::cli_opts::CliStart;
use crate::config::Config;

mod cli_opts;
mod config;

fn main() {
    let args: Vec<String> = args().skip(1).collect();

    let parsed = match CliStart::parse_args_default(&args) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("Try 'ledpwm --help' for more information");
            exit(1);
        }
    };

    if parsed.help {
        println!("Light a keyboard LED at a controllable brightness via PWM\n");
        println!("Usage: ledpwm [OPTIONS]\n");
        println!("{}", CliStart::usage());
        return;
    }

    if parsed.version {
        println!("ledpwm v{}", env!("CARGO_PKG_VERSION"));
        println!("ledpwm_cycle v{}", ledpwm_cycle::VERSION);
        println!("ledpwm_platform v{}", ledpwm_platform::VERSION);
        return;
    }

    let mut logger = env_logger::Builder::new();
    logger
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .filter(
            None,
            if parsed.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .init();

    let code = match do_parsed(&parsed) {
        Ok(signal) => exit_code_for(signal),
        Err(err) => {
            eprintln!("ledpwm: {}", err);
            if err
                .downcast_ref::<CycleError>()
                .is_some_and(CycleError::is_configuration)
            {
                eprintln!("Try 'ledpwm --help' for more information");
            }
            1
        }
    };
    exit(code);
}

/// Runs until a stop signal arrives, returning its number
fn do_parsed(parsed: &CliStart) -> Result<i32, Box<dyn std::error::Error>> {
    let request = parsed.startup_request();
    // Fail on bad options before anything is read or written
    request.validate()?;

    let mut config = Config::new().load();
    config.apply_cli(parsed);

    let cancel = CancelToken::new();
    cancel.register_signals()?;

    let input = config.input.clone();
    let dry_run = parsed.dry_run;
    let restore_trigger = config.restore_trigger;
    let mut controller = prepare(
        &request,
        &config.cycle,
        config.timer().build(),
        |led| -> Result<Box<dyn IndicatorSink>, CycleError> {
            if dry_run {
                return Ok(Box::new(LogSink::new()));
            }
            let leds = KeyboardIndicators::connect(led, input.as_deref())
                .map_err(PlatformError::into_connection)?
                .restore_triggers(restore_trigger);
            Ok(Box::new(leds))
        },
    )?;

    Ok(controller.run(&cancel)?)
}
