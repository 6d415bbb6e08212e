use std::error::Error;
use std::path::PathBuf;

use agency_hours::config::Config;
use agency_hours::dev_mode::{self, DevMode};
use agency_hours::ingest::arcgis;
use agency_hours::listing::{self, AgencyView};
use agency_hours::logging::{self, LogSource};
use agency_hours::verify;

const USAGE: &str = "Usage: agency_hours [--json] [--verify] [--fixture PATH] [--at CODE HH:MM] [SEARCH...]";

#[derive(Debug, Default)]
struct Args {
    json: bool,
    verify: bool,
    dev: DevMode,
    search: Vec<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--verify" => args.verify = true,
            "--fixture" => {
                let path = raw.next().ok_or("--fixture needs a path")?;
                args.dev.fixture = Some(PathBuf::from(path));
            }
            "--at" => {
                let day = raw.next().ok_or("--at needs a day code")?;
                let time = raw.next().ok_or("--at needs a time")?;
                let moment = dev_mode::parse_moment(&day, &time)
                    .ok_or_else(|| format!("cannot read '{} {}' as a day code and HH:MM", day, time))?;
                args.dev.pinned = Some(moment);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => args.search.push(arg),
        }
    }

    Ok(args)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    logging::init_logger(config.level()?, config.log_file.as_deref(), config.console_timestamps);
    let zone = config.zone()?;
    logging::debug(
        LogSource::Config,
        None,
        &format!("Feed {} evaluated in {}", config.api_url, config.timezone),
    );

    if args.dev.is_active() {
        logging::info(LogSource::System, None, "Development mode: offline feed or pinned clock in use");
    }

    let collection = match &args.dev.fixture {
        Some(path) => {
            logging::info(LogSource::System, None, &format!("Replaying feed from {}", path.display()));
            dev_mode::load_fixture(path)
        }
        None => {
            let client = reqwest::blocking::Client::builder()
                .timeout(config.request_timeout())
                .build()?;
            arcgis::fetch_feed(&client, &config.api_url)
        }
    };
    let collection = match collection {
        Ok(c) => c,
        Err(e) => {
            logging::log_feed_failure("Agency directory fetch", &e);
            return Err(e.into());
        }
    };

    let agencies = arcgis::map_features(&collection, &zone);

    if args.verify {
        let report = verify::verify_agencies(&agencies);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            verify::print_summary(&report);
        }
        return Ok(());
    }

    let now = args.dev.clock(zone).now();
    let views = listing::build_views(&agencies, now);
    let query = args.search.join(" ");
    let shown: Vec<&AgencyView> = listing::filter_views(&views, &query);

    if args.json {
        println!("{}", listing::render_json(&shown)?);
    } else {
        print!("{}", listing::render_text(&shown));
        logging::info(
            LogSource::System,
            None,
            &format!("{}/{} agencies shown", shown.len(), views.len()),
        );
    }

    Ok(())
}
