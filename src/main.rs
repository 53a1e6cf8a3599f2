// SPDX-License-Identifier: MPL-2.0
use photomap::config;
use photomap::host::HttpImageHost;
use photomap::pipeline::Pipeline;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = pico_args::Arguments::from_env();

    let listing_flag: Option<String> = args.opt_value_from_str("--listing-url").unwrap();
    let output: Option<PathBuf> = args.opt_value_from_str("--output").unwrap();
    let concurrency: Option<usize> = args.opt_value_from_str("--concurrency").unwrap();
    let pretty = args.contains("--pretty");
    let listing_positional = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());

    let config = config::load().unwrap_or_default();
    let listing_url = listing_flag
        .or(listing_positional)
        .or_else(|| config.listing_url.clone())
        .unwrap_or_else(|| config::DEFAULT_LISTING_URL.to_string());
    let max_in_flight = concurrency
        .or(config.max_in_flight)
        .unwrap_or(config::DEFAULT_MAX_IN_FLIGHT);

    let host = match HttpImageHost::new(listing_url) {
        Ok(host) => host,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut pipeline = Pipeline::new(host, max_in_flight);
    let collection = match pipeline.refresh().await {
        Ok(collection) => collection,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(collection)
    } else {
        serde_json::to_string(collection)
    };
    let json = match json {
        Ok(json) => json,
        Err(err) => {
            eprintln!("Failed to serialize feature collection: {err}");
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("Failed to write {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{json}"),
    }

    ExitCode::SUCCESS
}
