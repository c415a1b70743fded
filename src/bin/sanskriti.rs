//! sanskriti: dashboard data CLI
//!
//! Inspect datasets and images through the same cached, failure-tolerant
//! layer the dashboard uses.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sanskriti::dance::{self, card, DanceRecord};
use sanskriti::{
    Config, Dashboard, ImageResource, ImageSubject, Resolution, SanskritiError, Secrets,
};

/// Sanskriti dashboard data CLI
#[derive(Parser)]
#[command(name = "sanskriti")]
#[command(version)]
#[command(about = "Indian culture and tourism dashboard data")]
struct Args {
    /// Config file (default: ~/.sanskriti/config.toml, then /etc/sanskriti/config.toml)
    #[arg(short, long, env = "SANSKRITI_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List logical dataset names
    Datasets,

    /// Load a dataset and print its rows as JSON
    Load {
        /// Logical dataset name (e.g. "festivals", "state_tourism")
        name: String,
        /// Print at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fetch one staged image
    Image {
        /// Symbolic stage (e.g. DANCE_IMAGES)
        stage: String,
        /// Path inside the stage
        path: String,
    },

    /// Resolve the image of a logical subject
    Resolve {
        #[command(subcommand)]
        subject: SubjectArg,
    },

    /// List the states with dance forms
    States,

    /// Show the featured dance of a state
    Featured {
        /// State name (e.g. "Uttar Pradesh")
        state: String,
    },
}

#[derive(Subcommand)]
enum SubjectArg {
    /// A festival by name
    Festival { name: String },
    /// A dance form of a state
    Dance { state: String, dance: String },
    /// A heritage site in a city
    Heritage { city: String, site: String },
    /// A file name stored in a dataset row
    File { stage: String, file: String },
}

impl From<SubjectArg> for ImageSubject {
    fn from(arg: SubjectArg) -> Self {
        match arg {
            SubjectArg::Festival { name } => ImageSubject::festival(name),
            SubjectArg::Dance { state, dance } => ImageSubject::dance(state, dance),
            SubjectArg::Heritage { city, site } => ImageSubject::heritage(city, site),
            SubjectArg::File { stage, file } => ImageSubject::stored_file(stage, file),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let token = Secrets::load()?.token().ok_or_else(|| {
        SanskritiError::Configuration(
            "no store token: set SNOWFLAKE_TOKEN or [snowflake] token in secrets.toml".into(),
        )
    })?;

    let dashboard = Dashboard::builder()
        .source(Arc::new(config.snowflake_client(token)?))
        .config(&config)
        .build()?;

    match args.command {
        Command::Datasets => {
            let catalog = dashboard.catalog();
            for entry in catalog.tables() {
                println!("{:<34} {}", entry.name(), entry.table);
            }
            for (alias, target) in catalog.aliases() {
                println!("{alias:<34} -> {target}");
            }
            for name in catalog.composite_names() {
                println!("{name:<34} (composite)");
            }
        }

        Command::Load { name, limit } => {
            let table = dashboard.load(&name).await;
            let table = match limit {
                Some(n) => table.head(n),
                None => table.as_ref().clone(),
            };
            println!("{}", serde_json::to_string_pretty(&table)?);
        }

        Command::Image { stage, path } => match dashboard.get_image(&stage, &path).await {
            Some(resource) => print_resource(&resource),
            None => println!("not found"),
        },

        Command::Resolve { subject } => {
            match dashboard.resolve_image(&subject.into()).await {
                Resolution::Found { key, resource } => {
                    println!("key: {key}");
                    print_resource(&resource);
                }
                Resolution::NotFound => println!("not found"),
            }
        }

        Command::States => {
            let records = DanceRecord::from_table(&*dashboard.load("dance").await);
            for state in dance::state_choices(&records).iter().skip(1) {
                println!("{state}");
            }
        }

        Command::Featured { state } => {
            let records = DanceRecord::from_table(&*dashboard.load("dance").await);
            match dance::select_featured(&records, &state) {
                Some(featured) => {
                    println!("{}", featured.main.dance);
                    if let Some(description) = card::main_description(featured.main) {
                        println!("  {description}");
                    }
                    for other in &featured.others {
                        println!(
                            "- {}: {}",
                            card::card_title(other),
                            card::card_description(other)
                        );
                    }
                }
                None => println!("no dance data available for {state}"),
            }
        }
    }

    for diagnostic in dashboard.diagnostics().drain() {
        eprintln!("warning: {}", diagnostic.message);
    }

    Ok(())
}

fn print_resource(resource: &ImageResource) {
    match resource {
        ImageResource::Url(url) => println!("url: {url}"),
        ImageResource::Bytes(bytes) => println!("bytes: {}", bytes.len()),
    }
}
