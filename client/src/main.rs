//! Orchard Harvest Width Estimator - command line form
//!
//! Collects the scan parameters, asks the prediction service for the
//! projected size distribution and prints it as a bar chart.

use clap::Parser;
use orchard_estimator::{render_screen, ClientConfig, HttpTransport, SubmissionController, TextChart};
use shared::{Diameter, FormInput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "orchard-estimator", version, about = "Fruit Harvest Width Estimator")]
struct Args {
    /// Date the orchard was scanned (YYYY-MM-DD)
    #[arg(long)]
    scan_date: String,

    /// Planned harvest date (YYYY-MM-DD)
    #[arg(long)]
    harvest_date: String,

    /// Growth rate in mm/day, e.g. 0.05
    #[arg(long)]
    growth_rate: String,

    /// Smallest fruit diameter to include (mm)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(20..=120))]
    min_diameter: u8,

    /// Largest fruit diameter to include (mm)
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u8).range(20..=120))]
    max_diameter: u8,

    /// Prediction service base URL, overrides configuration
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG set there reaches the filter
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orchard_estimator=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::load()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    tracing::debug!("Prediction endpoint: {}", config.predict_url());

    let controller = SubmissionController::new(HttpTransport::from_config(&config)?);

    let form = FormInput {
        scan_date: args.scan_date,
        harvest_date: args.harvest_date,
        growth_rate: args.growth_rate,
        min_diameter: Diameter::clamped(i64::from(args.min_diameter)),
        max_diameter: Diameter::clamped(i64::from(args.max_diameter)),
    };

    let screen = controller.submit_form(&form).await;
    print!("{}", render_screen(&TextChart::default(), &screen));

    if screen.error_message().is_some() {
        std::process::exit(1);
    }
    Ok(())
}
