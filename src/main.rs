use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use starlink_history::{
    get_closest_sat, get_last_position, ingest, Config, Coordinate, Error, RecordStore,
};

const SATELLITE_ID_LEN: usize = 24;

#[derive(Parser)]
#[command(name = "starlink-history")]
#[command(about = "Where were the Starlink satellites?", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raw historical dump (JSON)
    #[arg(long, global = true, env = "STARLINK_DATA")]
    data: Option<PathBuf>,

    /// Normalized store written by `ingest`
    #[arg(long, global = true, env = "STARLINK_STORE")]
    store: Option<PathBuf>,

    /// Timezone for dates given without an offset
    #[arg(long, global = true, env = "STARLINK_TZ", value_parser = parse_tz)]
    tz: Option<Tz>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the raw dump and replace the store
    Ingest,

    /// Last known position of a satellite
    LastPosition {
        /// 24 character satellite id
        satellite_id: String,

        /// Instant to look at, defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Satellite closest to a coordinate
    Closest {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,

        #[arg(allow_hyphen_values = true)]
        longitude: f64,

        /// Exact observation instant, defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Summary of the store
    Info,
}

fn parse_tz(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| e.to_string())
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(tz) = self.tz {
            config.timezone = tz;
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match &cli.command {
        Commands::Ingest => run_ingest(&config),
        Commands::LastPosition { satellite_id, at } => {
            run_last_position(&config, satellite_id, at.as_deref())
        }
        Commands::Closest {
            latitude,
            longitude,
            at,
        } => run_closest(&config, Coordinate::new(*latitude, *longitude), at.as_deref()),
        Commands::Info => run_info(&config),
    }
}

/// Instant given on the command line, or now.
fn resolve_time(config: &Config, at: Option<&str>) -> Result<DateTime<Utc>> {
    let parsed = config.parse_time(at.unwrap_or_default())?;
    Ok(parsed.unwrap_or_else(|| Utc::now().trunc_subsecs(0)))
}

fn open_store(config: &Config) -> Result<RecordStore> {
    RecordStore::load(&config.store_path).with_context(|| {
        format!(
            "Unable to read store {}, run `ingest` first",
            config.store_path.display()
        )
    })
}

fn run_ingest(config: &Config) -> Result<()> {
    let store = ingest::load_raw_file(&config.data_path)
        .with_context(|| format!("Unable to ingest {}", config.data_path.display()))?;
    store
        .save(&config.store_path)
        .with_context(|| format!("Unable to write {}", config.store_path.display()))?;
    println!(
        "Stored {} records for {} satellites",
        store.len(),
        store.satellite_ids().len()
    );
    Ok(())
}

/// Ids are counted in characters, not bytes.
fn check_satellite_id(satellite_id: &str) -> Result<()> {
    if satellite_id.chars().count() != SATELLITE_ID_LEN {
        bail!("Satellite ids must be {} chars long", SATELLITE_ID_LEN);
    }
    Ok(())
}

fn run_last_position(config: &Config, satellite_id: &str, at: Option<&str>) -> Result<()> {
    check_satellite_id(satellite_id)?;
    let at_time = resolve_time(config, at)?;
    let store = open_store(config)?;

    match get_last_position(&store, satellite_id, at_time) {
        Some(position) => println!(
            "Last position of {} at {}: lat {}, lon {}",
            satellite_id, at_time, position.latitude, position.longitude
        ),
        None => println!("No position known for {} at {}", satellite_id, at_time),
    }
    Ok(())
}

fn run_closest(config: &Config, coordinate: Coordinate, at: Option<&str>) -> Result<()> {
    if !coordinate.is_valid() {
        bail!("Coordinates out of range: latitude in [-90, 90], longitude in [-180, 180]");
    }
    let at_time = resolve_time(config, at)?;
    let store = open_store(config)?;

    match get_closest_sat(&store, &coordinate, at_time) {
        Ok(Some(closest)) => println!(
            "Closest satellite id {} distance (kms) {:.2}",
            closest.satellite_id, closest.distance_km
        ),
        Ok(None) => println!("No satellite position usable at {}", at_time),
        Err(e @ Error::NoDataForTime(_)) => {
            let hint = store
                .time_range()
                .map(|(first, last)| format!(", observations span {} to {}", first, last))
                .unwrap_or_default();
            bail!("{}{}", e, hint);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn run_info(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    println!("Records:    {}", store.len());
    println!("Satellites: {}", store.satellite_ids().len());
    println!("Instants:   {}", store.timestamps().len());
    if let Some((first, last)) = store.time_range() {
        println!("From:       {}", first);
        println!("To:         {}", last);
    }
    Ok(())
}
