pub mod error;
pub mod export;
pub mod ingest;
pub mod labels;
pub mod model;
pub mod motion;
pub mod pipeline;
pub mod sequencer;
pub mod temporal;

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use log::info;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use error::{AnomalyKind, FeatureError, SequenceAnomaly};
pub use model::{AisRecord, EnrichedRecord, FutureTarget, Motion, RawTable};
pub use pipeline::{engineer_features, FeatureConfig, FeatureTable, DEFAULT_HORIZON};

#[derive(Debug)]
pub struct Config {
    pub paths: Vec<String>,
    pub delimiter: u8,
    pub output_dir: PathBuf,
    pub features: FeatureConfig,
}

fn command() -> Command {
    Command::new("ais-features")
        .version("0.1")
        .about("engineer motion features and future position targets from AIS exports [csv]")
        .arg(
            Arg::new("paths")
                .short('f')
                .long("file-path")
                .action(ArgAction::Append)
                .required(true)
                .help("AIS file to process, may be repeated"),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .default_value("|")
                .help("single byte column delimiter of input and output"),
        )
        .arg(
            Arg::new("horizon")
                .short('H')
                .long("horizon")
                .value_parser(value_parser!(usize))
                .default_value("3")
                .help("number of reports ahead for the future position targets"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("directory for the engineered tables"),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .action(ArgAction::SetTrue)
                .help("enrich vessels on the calling thread only"),
        )
}

pub fn get_arg() -> Result<Config> {
    config_from(command().get_matches())
}

fn config_from(matches: clap::ArgMatches) -> Result<Config> {
    let paths = matches
        .get_many::<String>("paths")
        .unwrap_or_default()
        .cloned()
        .collect::<Vec<String>>();

    let delimiter = matches
        .get_one::<String>("delimiter")
        .map(String::as_str)
        .unwrap_or("|");
    let delimiter = match delimiter.as_bytes() {
        [b] => *b,
        _ => return Err(anyhow!("delimiter must be a single byte, got '{delimiter}'")),
    };

    let horizon = matches
        .get_one::<usize>("horizon")
        .copied()
        .unwrap_or(DEFAULT_HORIZON);
    let features = FeatureConfig {
        horizon,
        parallel: !matches.get_flag("sequential"),
    };
    features.validate()?;

    let output_dir = matches
        .get_one::<PathBuf>("output_dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    // Files run in parallel; two inputs sharing a stem would write one output.
    let mut outputs = HashSet::new();
    for path in &paths {
        let out = output_path(Path::new(path), &output_dir);
        if !outputs.insert(out.clone()) {
            return Err(anyhow!(
                "{} would overwrite {} written for another input",
                path,
                out.display()
            ));
        }
    }

    Ok(Config {
        paths,
        delimiter,
        output_dir,
        features,
    })
}

pub fn run(config: Config) -> Result<()> {
    info!("config is {:?}", config);

    config
        .paths
        .par_iter()
        .map(|x| process_file(Path::new(x), &config).map(|_| ()))
        .collect::<Result<_>>()
}

/// Output path of the engineered table for one input file.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ais".to_string());
    output_dir.join(format!("{stem}_features.csv"))
}

/// Side table of sequence anomalies next to an engineered table.
pub fn anomalies_path(features_path: &Path) -> PathBuf {
    features_path.with_extension("anomalies.csv")
}

/// Runs one input file as an independent batch and returns where the
/// engineered table was written.
pub fn process_file(path: &Path, config: &Config) -> Result<PathBuf> {
    let table = ingest::read_file(path, config.delimiter)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let features = engineer_features(&table, &config.features)
        .with_context(|| format!("failed to engineer features for {}", path.display()))?;

    let out = output_path(path, &config.output_dir);
    let file = File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
    export::write_table(&features, file, config.delimiter)?;

    let side_table = anomalies_path(&out);
    if features.anomalies.is_empty() {
        // Drop the side table of an earlier run on the same input.
        match fs::remove_file(&side_table) {
            Ok(()) => info!("removed stale {}", side_table.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to remove {}", side_table.display()))
            }
        }
    } else {
        let file = File::create(&side_table)
            .with_context(|| format!("failed to create {}", side_table.display()))?;
        export::write_anomalies(&features, file, config.delimiter)?;
    }

    info!(
        "{} has {} records from {} vessels, written to {}",
        path.display(),
        features.rows.len(),
        features.vessel_count,
        out.display()
    );

    Ok(out)
}
