/// `wxmap`: fetch one hour of regional weather and print the map shading.
///
/// Usage:
///   wxmap [--config PATH] [--hour H] [--geojson PATH]
///
/// Without `--geojson` only the legend is printed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use wxmap_service::config::ServiceConfig;
use wxmap_service::geo;
use wxmap_service::ingest::kma;
use wxmap_service::logging::{self, DataSource};
use wxmap_service::model::WxError;
use wxmap_service::regions::RegionResolver;
use wxmap_service::shading::legend::build_legend;
use wxmap_service::snapshot::paint_features;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    hour: Option<u32>,
    geojson: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--geojson" => args.geojson = Some(PathBuf::from(value()?)),
            "--hour" => {
                let raw = value()?;
                args.hour = Some(raw.parse().map_err(|_| format!("invalid hour '{}'", raw))?);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), WxError> {
    let config = ServiceConfig::load(args.config.as_deref())?;
    logging::init_logger(
        config.logging.min_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    let regions = config.region_config()?;
    let target = kma::target_hour(kma::kst_now(), args.hour)?;
    logging::info(
        DataSource::System,
        None,
        &format!("Fetching {} regions for {}", regions.regions().len(), target.format("%Y-%m-%d %H:00")),
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.kma.timeout_secs))
        .build()
        .map_err(|e| WxError::Request(e.to_string()))?;
    let snapshot = kma::fetch_snapshot(&client, &config.kma, &regions, target)?;

    let range = snapshot.range();
    println!("Temperature range: {:.1}°C .. {:.1}°C", range.min, range.max);
    for entry in build_legend(&snapshot) {
        println!(
            "{:<10} {:>6.1}°C  {:<18} {:>5.1}%",
            entry.region, entry.temperature_c, entry.css_color, entry.bar_width_pct
        );
    }

    if let Some(path) = args.geojson {
        let features = geo::load_features(&path)?;
        let resolver = RegionResolver::new(&regions);
        for paint in paint_features(&snapshot, &resolver, &features) {
            println!(
                "{}\t{}",
                paint.feature_name.as_deref().unwrap_or("<unnamed>"),
                paint.fill.color().to_css_string()
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("usage: wxmap [--config PATH] [--hour H] [--geojson PATH]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wxmap: {}", e);
            ExitCode::FAILURE
        }
    }
}
