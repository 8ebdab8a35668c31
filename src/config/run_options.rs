use std::{env, path::PathBuf, str::FromStr};

use getopts::{Matches, Options};
use tracing::{error, warn};

use crate::{backwash::ds::WaterQualityParameters, config::CONFIG_FILE, error::AppError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// Run the prediction service
    Serve,
    /// Ask the prediction service for a forecast, simulating locally if it is unreachable
    #[default]
    Forecast,
}

#[derive(Clone, Debug, Default)]
pub struct Args {
    pub cfg_file: PathBuf,
    // test helper
    pub cfg_str: Option<String>,
    pub command: Command,
    pub seed: Option<u64>,
    /// Skip the remote call and simulate locally
    pub offline: bool,
    pub params: WaterQualityParameters,
    pub help: bool,
}

pub fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "config file", "FILE");
    opts.optopt("s", "seed", "PRNG seed for reproducible runs", "N");
    opts.optflag("o", "offline", "simulate locally without calling the prediction API");
    opts.optopt("", "turbidity", "turbidity (NTU)", "VALUE");
    opts.optopt("", "ph", "pH", "VALUE");
    opts.optopt("", "temperature", "temperature (°C)", "VALUE");
    opts.optopt("", "flow-rate", "flow rate (GPM)", "VALUE");
    opts.optopt("", "inlet-pressure", "inlet pressure (PSIG)", "VALUE");
    opts.optflag("h", "help", "print this help");
    opts
}

pub fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] [serve|forecast]", program);
    print!("{}", opts.usage(&brief));
}

pub fn get_args() -> Result<Args, AppError> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "backwash".to_owned());
    let opts = options();
    let parsed = parse_args(args.get(1..).unwrap_or_default(), &opts);
    match &parsed {
        Ok(parsed) if parsed.help => print_usage(&program, &opts),
        Err(_) => print_usage(&program, &opts),
        Ok(_) => {}
    }
    parsed
}

/// Unknown options are an error. Unparsable values and commands are reported and replaced by defaults.
pub fn parse_args(args: &[String], opts: &Options) -> Result<Args, AppError> {
    let mut parsed = Args { cfg_file: default_cfg_file(), ..Default::default() };
    let matches = opts.parse(args).map_err(|f| {
        error!("Error parsing arguments: {}", f);
        AppError::from(f)
    })?;

    parsed.help = matches.opt_present("h");
    parsed.offline = matches.opt_present("o");
    if let Some(cfg_file) = matches.opt_str("c") {
        parsed.cfg_file = PathBuf::from(cfg_file);
    }
    parsed.seed = opt_value(&matches, "seed");
    parsed.command = match matches.free.first().map(|s| s.as_str()) {
        Some("serve") => Command::Serve,
        Some("forecast") | None => Command::Forecast,
        Some(other) => {
            warn!("Unknown command '{}'. Proceeding with forecast.", other);
            Command::Forecast
        }
    };

    let params = &mut parsed.params;
    params.turbidity = opt_value(&matches, "turbidity").unwrap_or(params.turbidity);
    params.ph = opt_value(&matches, "ph").unwrap_or(params.ph);
    params.temperature = opt_value(&matches, "temperature").unwrap_or(params.temperature);
    params.flow_rate = opt_value(&matches, "flow-rate").unwrap_or(params.flow_rate);
    params.inlet_pressure = opt_value(&matches, "inlet-pressure").unwrap_or(params.inlet_pressure);
    Ok(parsed)
}

fn opt_value<T: FromStr>(matches: &Matches, name: &str) -> Option<T> {
    let raw = matches.opt_str(name)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid value '{}' for --{}.", raw, name);
            None
        }
    }
}

pub fn default_cfg_file() -> PathBuf {
    match env::current_dir() {
        Ok(dir) => dir.join(CONFIG_FILE),
        Err(_) => PathBuf::from(CONFIG_FILE),
    }
}
