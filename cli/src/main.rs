//! Car Price Prediction CLI
//!
//! Loads the model artifact once, then answers a single command: predict a
//! price, list the accepted choices for the categorical inputs, or describe
//! the artifact.

use carprice::config::DEFAULT_CONFIG_PATH;
use carprice::{
    Artifact, CategoricalField, Config, EncoderSet, FeatureRow, PriceError, PricePipeline,
    PricePrediction, Result,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "carprice")]
#[command(about = "Predict used car prices (in lacs) from a trained model", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Artifact path, overriding the config
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the price of one car
    Predict {
        #[command(flatten)]
        car: CarArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the accepted values of the categorical inputs
    Options {
        /// Only this field (brand_model, city, Transmission, price_type)
        #[arg(long)]
        field: Option<String>,
    },
    /// Show what the loaded artifact contains
    Inspect,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct CarArgs {
    /// Brand and model, e.g. "Maruti Swift"
    #[arg(long)]
    brand_model: String,
    #[arg(long)]
    city: String,
    /// Model year
    #[arg(long)]
    year: i32,
    /// Mileage in km
    #[arg(long)]
    mileage: u32,
    /// Engine size in cc
    #[arg(long)]
    engine: u32,
    /// Manual or Automatic, as listed by `options`
    #[arg(long)]
    transmission: String,
    /// Fixed or Negotiable, as listed by `options`
    #[arg(long)]
    price_type: String,
}

impl From<CarArgs> for FeatureRow {
    fn from(car: CarArgs) -> Self {
        FeatureRow {
            brand_model: car.brand_model,
            city: car.city,
            model_year: car.year,
            mileage_in_km: car.mileage,
            engine_in_cc: car.engine,
            transmission: car.transmission,
            price_type: car.price_type,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        artifact,
        command,
        ..
    } = cli;

    let session = || -> Result<(Config, PathBuf, PricePipeline)> {
        let config = Config::load_or_default(&config_path)?;
        let artifact_path = artifact.clone().unwrap_or_else(|| config.artifact.path.clone());
        let pipeline = PricePipeline::new(Artifact::load(&artifact_path)?);
        Ok((config, artifact_path, pipeline))
    };

    match command {
        Commands::Init { force } => init_config(&config_path, force)?,
        Commands::Predict { car, format } => {
            let (config, _, pipeline) = session()?;
            let row = FeatureRow::from(car);
            config.bounds.check(&row)?;
            let price = pipeline.predict(&row)?;
            log::info!("{} in {} -> {}", row.brand_model, row.city, price);
            println!("{}", render_prediction(price, &row, format)?);
        }
        Commands::Options { field } => {
            let (_, _, pipeline) = session()?;
            println!(
                "{}",
                render_options(pipeline.artifact().encoders(), field.as_deref())?
            );
        }
        Commands::Inspect => {
            let (_, artifact_path, pipeline) = session()?;
            println!("Artifact: {}", artifact_path.display());
            println!("{}", pipeline.artifact().summary());
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(PriceError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// JSON form of a prediction: the price next to the input fields.
#[derive(Serialize)]
struct PredictionOutput<'a> {
    price_lacs: f64,
    #[serde(flatten)]
    row: &'a FeatureRow,
}

fn render_prediction(
    price: PricePrediction,
    row: &FeatureRow,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "Predicted Price: {}\nPrediction successful",
            price
        )),
        OutputFormat::Json => {
            let output = PredictionOutput {
                price_lacs: (price.lacs() * 100.0).round() / 100.0,
                row,
            };
            serde_json::to_string(&output).map_err(|e| PriceError::Inference(e.to_string()))
        }
    }
}

fn render_options(encoders: &EncoderSet, only: Option<&str>) -> Result<String> {
    let fields = match only {
        None => CategoricalField::ALL.to_vec(),
        Some(name) => {
            let field = CategoricalField::from_name(name).ok_or_else(|| {
                let known: Vec<_> = CategoricalField::ALL.iter().map(|f| f.name()).collect();
                PriceError::InvalidParameter(format!(
                    "unknown field {:?}, expected one of {}",
                    name,
                    known.join(", ")
                ))
            })?;
            vec![field]
        }
    };

    let sections: Vec<String> = fields
        .into_iter()
        .map(|field| {
            let mut section = format!("{}:", field.name());
            for class in encoders.classes(field) {
                section.push_str("\n  ");
                section.push_str(class);
            }
            section
        })
        .collect();
    Ok(sections.join("\n"))
}
