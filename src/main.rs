use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use janmabhoomi::api::{self, AppState};
use janmabhoomi::{
    Coordinates, Explorer, ExplorerConfig, KnowledgeCard, Language, LocationInput,
    LocationResolver, NominatimClient, WikipediaClient, languages, logging, web,
};

#[derive(Parser)]
#[command(
    name = "janmabhoomi",
    version,
    about = "Discover the local stories of Indian places"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the knowledge card for a place
    Explore {
        /// Place name, e.g. "Hyderabad"
        #[arg(short, long, conflicts_with = "at")]
        place: Option<String>,
        /// Coordinates to reverse geocode, e.g. "17.385,78.4867"
        #[arg(long, allow_hyphen_values = true)]
        at: Option<Coordinates>,
        /// english, hindi or telugu (or en, hi, te)
        #[arg(short, long)]
        lang: Option<Language>,
        /// Print the card as JSON
        #[arg(long)]
        json: bool,
        /// Write <place>_summary.txt
        #[arg(short, long)]
        download: bool,
        /// Where --download writes to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the city at some coordinates
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        at: Coordinates,
    },
    /// Print the languages spoken in a place
    Languages {
        #[arg(short, long)]
        place: String,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ExplorerConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Explore {
            place,
            at,
            lang,
            json,
            download,
            output_dir,
        } => {
            let input = match (place, at) {
                (Some(name), _) => LocationInput::Name(name),
                (None, Some(coordinates)) => LocationInput::Coordinates(coordinates),
                (None, None) => bail!("Give a place with --place or coordinates with --at"),
            };
            let language = match lang {
                Some(language) => language,
                None => config.defaults.language.parse()?,
            };
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));

            run_explore(&config, input, language, json, download.then_some(output_dir)).await
        }
        Command::Locate { at } => {
            let geocoder = NominatimClient::new(&config.geocoding)?;
            println!("{}", LocationResolver::city_name(&geocoder, at).await);
            Ok(())
        }
        Command::Languages { place } => {
            println!("{}", languages::detect_joined(&place));
            Ok(())
        }
        Command::Serve { port } => run_serve(config, port).await,
    }
}

async fn run_explore(
    config: &ExplorerConfig,
    input: LocationInput,
    language: Language,
    json: bool,
    download_dir: Option<PathBuf>,
) -> Result<()> {
    let place = match input {
        LocationInput::Name(name) => name,
        coordinates => {
            let geocoder = NominatimClient::new(&config.geocoding)?;
            LocationResolver::resolve_place(&geocoder, coordinates)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
    };

    let encyclopedia = WikipediaClient::new(&config.encyclopedia)?;
    let explorer =
        Explorer::new(encyclopedia).with_wiki_base_url(&config.encyclopedia.wiki_base_url);
    let card = explorer
        .explore_named(&place, language)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        println!("{card}");
    }

    if let Some(dir) = download_dir {
        write_download(&card, &dir)?;
    }
    Ok(())
}

fn write_download(card: &KnowledgeCard, dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(card.export_file_name());
    std::fs::write(&path, card.to_text())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

async fn run_serve(config: ExplorerConfig, port: Option<u16>) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(port) = port {
        server.port = port;
    }

    let explorer = Explorer::new(WikipediaClient::new(&config.encyclopedia)?)
        .with_wiki_base_url(&config.encyclopedia.wiki_base_url);
    let geocoder = NominatimClient::new(&config.geocoding)?;
    let language: Language = config.defaults.language.parse()?;

    info!("Starting JanmaBhoomi {} API", janmabhoomi::VERSION);
    let state = Arc::new(AppState::new(explorer, geocoder, language));
    web::run(&server, api::router(state)).await
}
