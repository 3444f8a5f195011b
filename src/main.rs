//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::new::{Kind, NewDocument};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author = "Karol Moroz")]
#[command(version)]
#[command(about = "Markdown content pipeline for a personal blog and portfolio site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all content and write page data
    #[command(alias = "b")]
    Build,

    /// Create a new post or video
    New {
        /// Title of the new document
        title: String,

        /// Collection to add it to
        #[arg(short, long, value_enum, default_value = "post")]
        kind: Kind,

        /// YouTube video id (videos only)
        #[arg(short, long)]
        youtube: Option<String>,

        /// Content language (posts only)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, video, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Building site data...");
            site.build()?;
            println!("Built successfully!");
        }

        Commands::New {
            title,
            kind,
            youtube,
            lang,
        } => {
            let site = folio::Site::new(&base_dir)?;
            let path = folio::commands::new::create_document(
                &site,
                &NewDocument {
                    title,
                    kind,
                    youtube,
                    lang,
                },
            )?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
