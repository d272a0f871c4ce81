use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shelf_fetch::config::{find_config_file, get_config, load_config, Config, ConfigFile};
use shelf_fetch::download::{BookDownloader, FixedFolder, FolderSelector, PromptFolderSelector};
use shelf_fetch::models::{BookEntry, PostDownloadAction};
use shelf_fetch::ranking::{rank_books, RankBy};
use shelf_fetch::ui::{is_terminal, print_ranked_books, status_line, Status, TerminalNotifier};
use shelf_fetch::utils::HttpClient;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shelf Fetch - Rank book search results by preference and download them
#[derive(Parser, Debug)]
#[command(name = "shelf-fetch")]
#[command(version = shelf_fetch::VERSION)]
#[command(about = "Rank book search results by language and format preference and download them", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank books from a JSON list by language and format preference
    Rank {
        /// JSON file with an array of books ("-" for stdin)
        #[arg(long, short)]
        input: PathBuf,

        /// Preference to rank by
        #[arg(long, value_enum, default_value_t = RankField::Both)]
        by: RankField,

        /// Preferred languages, most wanted first (overrides config)
        #[arg(long)]
        languages: Option<String>,

        /// Preferred formats, most wanted first (overrides config)
        #[arg(long)]
        formats: Option<String>,

        /// Print the ranked list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download one book from a JSON list
    Download {
        /// JSON file with an array of books ("-" for stdin)
        #[arg(long, short)]
        input: PathBuf,

        /// Position of the book in the (ranked) list
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Rank the list before picking the index
        #[arg(long, value_enum)]
        rank: Option<RankField>,

        /// Download from this URL instead of the book's own
        #[arg(long)]
        url: Option<String>,

        /// Save into this directory (overrides config)
        #[arg(long, conflicts_with = "pick")]
        dir: Option<PathBuf>,

        /// Ask for the target directory even if one is configured
        #[arg(long)]
        pick: bool,

        /// Skip TLS certificate verification for this download
        #[arg(long)]
        insecure: bool,
    },

    /// Show the effective configuration, or write a default one
    Config {
        /// Write a default configuration file to this path, or fill in
        /// missing keys of an existing one
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

/// Preference to rank by
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RankField {
    /// Preferred languages only
    Language,
    /// Preferred formats only
    Format,
    /// Language first, format breaks ties
    Both,
}

impl From<RankField> for RankBy {
    fn from(field: RankField) -> Self {
        match field {
            RankField::Language => RankBy::Language,
            RankField::Format => RankBy::Format,
            RankField::Both => RankBy::Both,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config(),
    };

    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("shelf_fetch={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        Commands::Rank {
            input,
            by,
            languages,
            formats,
            json,
        } => {
            let mut preferences = config.preferences.clone();
            if let Some(languages) = languages {
                preferences.languages = languages;
            }
            if let Some(formats) = formats {
                preferences.formats = formats;
            }

            let mut books = read_books(&input)?;
            rank_books(&mut books, &preferences, by.into());

            if json || !is_terminal() {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                if !cli.quiet {
                    println!("{}", status_line(Status::Info, "No books to rank"));
                }
            } else {
                print_ranked_books(&books);
            }
        }

        Commands::Download {
            input,
            index,
            rank,
            url,
            dir,
            pick,
            insecure,
        } => {
            let mut books = read_books(&input)?;
            if let Some(field) = rank {
                rank_books(&mut books, &config.preferences, field.into());
            }
            let Some(book) = books.get(index) else {
                bail!("No book at index {} ({} books in list)", index, books.len());
            };

            let mut downloads = config.downloads.clone();
            if insecure {
                downloads.ignore_tls = true;
            }

            // --dir and --pick both bypass the configured folder
            let bypass_configured = pick || dir.is_some();
            let configured = downloads.default_path.clone();
            let selector: Box<dyn FolderSelector> = match dir {
                Some(dir) => Box::new(FixedFolder::new(dir)),
                None => match configured {
                    Some(path) if pick => Box::new(PromptFolderSelector::with_default(path)),
                    _ => Box::new(PromptFolderSelector::new()),
                },
            };
            if bypass_configured {
                downloads.default_path = None;
            }

            let notifier = if cli.quiet {
                TerminalNotifier::non_interactive()
            } else {
                TerminalNotifier::new()
            };

            let client = HttpClient::with_timeout(Duration::from_secs(downloads.timeout_secs))
                .context("Failed to create HTTP client")?;
            let downloader = BookDownloader::new(downloads, Arc::new(client));

            let source_url = url.as_deref().unwrap_or(&book.download_url);
            let action = downloader
                .download(source_url, book, &*selector, &notifier)
                .await;

            if action != PostDownloadAction::None {
                if let Err(e) = action.perform() {
                    tracing::warn!("Failed to run follow-up action: {}", e);
                }
            }
        }

        Commands::Config { init } => match init {
            Some(path) => {
                // An existing file keeps its values and gains any missing defaults
                let existed = path.is_file();
                let file = if existed {
                    ConfigFile::load(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?
                } else {
                    ConfigFile {
                        config: Config::default(),
                    }
                };
                file.save(&path)?;
                if !cli.quiet {
                    let verb = if existed { "Updated" } else { "Wrote default" };
                    println!(
                        "{}",
                        status_line(
                            Status::Success,
                            &format!("{} configuration at {}", verb, path.display())
                        )
                    );
                }
            }
            None => {
                let file = ConfigFile { config };
                print!("{}", file.to_toml()?);
            }
        },
    }

    Ok(())
}

/// Read a JSON array of books from a file, or stdin for "-"
fn read_books(input: &Path) -> Result<Vec<BookEntry>> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read books from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content).context("Books must be a JSON array of book entries")
}
