//! ArtVaani CLI - listings, cultural content and verification from the terminal
//!
//! Reads local photos and recordings, sends them to the ArtVaani API as
//! data URIs, and prints the generated content.

mod api;
mod config;
mod media;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use tracing_subscriber::EnvFilter;

use api::{
    ArtVaaniClient, AudioRequest, InsightsRequest, ListingRequest, VerificationRequest,
};
use config::Config;
use media::MediaKind;

#[derive(Parser)]
#[command(name = "artvaani")]
#[command(about = "ArtVaani CLI - AI content flows for artisans", long_about = None)]
#[command(version)]
struct Cli {
    /// Log requests and encoding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Show current configuration
    Config,

    /// Generate a product listing from a photo and description
    Listing {
        /// Product photo (jpg, png, webp, gif, heic)
        #[arg(long)]
        photo: PathBuf,
        /// What the artisan says about the product
        #[arg(short, long)]
        description: String,
        /// Output language (defaults to the configured language)
        #[arg(short, long)]
        language: Option<String>,
        /// Who the listing is written for
        #[arg(short, long)]
        audience: String,
    },

    /// Cultural background of a craft
    Insights {
        /// Craft name, e.g. "Madhubani painting"
        craft: String,
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Cultural narrative from a voice recording
    Narrative {
        /// Recording (webm, wav, mp3, ogg, m4a, flac)
        #[arg(long)]
        audio: PathBuf,
        /// Spoken language of the recording
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Transcription and story from a voice recording
    Story {
        #[arg(long)]
        audio: PathBuf,
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Verify a declared city against GPS coordinates and a live photo
    Verify {
        #[arg(long)]
        photo: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// City from the artisan's profile
        #[arg(long)]
        city: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Config => cmd_config(),
        Commands::Listing {
            photo,
            description,
            language,
            audience,
        } => cmd_listing(photo, description, language, audience).await,
        Commands::Insights { craft, language } => cmd_insights(craft, language).await,
        Commands::Narrative { audio, language } => cmd_narrative(audio, language).await,
        Commands::Story { audio, language } => cmd_story(audio, language).await,
        Commands::Verify {
            photo,
            lat,
            lon,
            city,
        } => cmd_verify(photo, lat, lon, city).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "artvaani=debug" } else { "artvaani=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn client(config: &Config) -> ArtVaaniClient {
    if config.api_key.is_none() {
        tracing::debug!("No API key configured; sending unauthenticated requests");
    }
    ArtVaaniClient::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load_file()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    let client = ArtVaaniClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {}
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach ArtVaani API at {}", config.base_url);
        }
    }

    if !client.check_key().await? {
        println!("{}", "Rejected".red());
        bail!("API key was not accepted");
    }
    println!("{}", "OK".green());

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!("  Default Language: {}", config.default_language.cyan());

    Ok(())
}

async fn cmd_listing(
    photo: PathBuf,
    description: String,
    language: Option<String>,
    audience: String,
) -> Result<()> {
    let config = Config::load()?;
    let request = ListingRequest {
        photo_data_uri: media::read_as_data_uri(&photo, MediaKind::Image)?,
        description,
        language: config.language(language),
        target_audience: audience,
    };

    let listing = client(&config).generate_listing(&request).await?;

    println!("{}", listing.title.cyan().bold());
    println!("\n{}", listing.description);
    println!("\n{}", "Story".bold());
    println!("{}", listing.story);
    println!("\n{} {}", "Tags:".bold(), listing.hashtags.dimmed());
    println!("{} {}", "Price:".bold(), listing.suggested_price.green());

    Ok(())
}

async fn cmd_insights(craft: String, language: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let request = InsightsRequest {
        craft_name: craft,
        language: config.language(language),
    };

    let insights = client(&config).cultural_insights(&request).await?;
    println!("{}", insights.cultural_insights);

    Ok(())
}

async fn cmd_narrative(audio: PathBuf, language: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let request = AudioRequest {
        audio_data_uri: media::read_as_data_uri(&audio, MediaKind::Audio)?,
        language: config.language(language),
    };

    let narrative = client(&config).cultural_narrative(&request).await?;
    println!("{}", narrative.narrative);

    Ok(())
}

async fn cmd_story(audio: PathBuf, language: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let request = AudioRequest {
        audio_data_uri: media::read_as_data_uri(&audio, MediaKind::Audio)?,
        language: config.language(language),
    };

    let story = client(&config).story_from_audio(&request).await?;

    println!("{}", "Transcription".bold());
    println!("{}", story.transcription.dimmed());
    println!("\n{}", "Story".bold());
    println!("{}", story.story);

    Ok(())
}

async fn cmd_verify(photo: PathBuf, lat: f64, lon: f64, city: String) -> Result<()> {
    let config = Config::load()?;
    let request = VerificationRequest {
        photo_data_uri: media::read_as_data_uri(&photo, MediaKind::Image)?,
        latitude: lat,
        longitude: lon,
        declared_city: city,
    };

    let verdict = client(&config).verify_identity(&request).await?;

    let status = match verdict.status.as_str() {
        "verified" => verdict.status.green().bold(),
        "flagged" => verdict.status.yellow().bold(),
        _ => verdict.status.red().bold(),
    };
    println!("{} {}", "Status:".bold(), status);
    println!("{} {}", "Resolved city:".bold(), verdict.resolved_city.cyan());
    if let Some(reason) = &verdict.mismatch_reason {
        println!("{} {}", "Reason:".bold(), reason);
    }
    println!("{}", format!("Checked at {}", verdict.checked_at).dimmed());

    Ok(())
}
