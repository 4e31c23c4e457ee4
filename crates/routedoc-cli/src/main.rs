//! routedoc CLI entrypoint
//! Parses command-line arguments and dispatches to the core compiler.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use routedoc_core::catalog::StandardEntity;
use routedoc_core::config::parse_yes_no;
use routedoc_core::discovery::RouteDiscoverer;
use routedoc_core::utils::split_selector;
use routedoc_core::{Collection, Config, OpenApiConverter, SiteSnapshot};
use tokio::fs;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "routedoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Export the request collection for a site snapshot
    Export {
        #[command(flatten)]
        selection: Selection,
        /// Write to this file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Export an OpenAPI 3.0 document for a site snapshot
    ExportOpenapi {
        #[command(flatten)]
        selection: Selection,
        /// Write to this file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Convert an existing collection file to OpenAPI 3.0
    Convert {
        /// Collection JSON file
        #[arg(long)]
        collection: PathBuf,
        /// Server URL when the collection has no baseUrl variable
        #[arg(long)]
        base_url: Option<String>,
        /// Write to this file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the route namespaces of a site snapshot
    Namespaces {
        /// Site snapshot (YAML or JSON)
        #[arg(long)]
        site: PathBuf,
        /// Include core and internal namespaces
        #[arg(long)]
        all: bool,
    },
}

/// Site and selection flags shared by both export commands.
///
/// Selector lists are comma separated; a flag that is not given leaves the
/// config file value (or the empty default) in place.
#[derive(clap::Args, Debug)]
pub struct Selection {
    /// Site snapshot (YAML or JSON)
    #[arg(long)]
    site: PathBuf,
    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Page slugs listed individually
    #[arg(long)]
    pages: Option<String>,
    /// Category slugs for filtered post lists
    #[arg(long)]
    categories: Option<String>,
    /// Custom content types to include
    #[arg(long)]
    cpt: Option<String>,
    /// Standard entities (pages, posts, categories, tags, comments, users, settings)
    #[arg(long)]
    entities: Option<String>,
    /// Option group slugs
    #[arg(long)]
    option_groups: Option<String>,
    /// Registered route namespaces (e.g. acme/v1)
    #[arg(long)]
    namespaces: Option<String>,
    /// Include the WooCommerce block: anything but "no" or "0" means yes
    #[arg(long)]
    include_woocommerce: Option<String>,
    /// Overrides the site's base URL
    #[arg(long)]
    base_url: Option<Url>,
    /// Overrides the collection name
    #[arg(long)]
    name: Option<String>,
}

impl Selection {
    async fn load(&self) -> anyhow::Result<(SiteSnapshot, Config)> {
        let site = SiteSnapshot::from_file(&self.site)
            .await
            .with_context(|| format!("Failed to load site snapshot {}", self.site.display()))?;
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        self.apply(&mut config)?;
        Ok((site, config))
    }

    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        let list = |raw: &str| split_selector(raw, |s| s.trim().to_string());
        if let Some(raw) = &self.pages {
            config.pages = list(raw);
        }
        if let Some(raw) = &self.categories {
            config.categories = list(raw);
        }
        if let Some(raw) = &self.cpt {
            config.custom_types = list(raw);
        }
        if let Some(raw) = &self.option_groups {
            config.option_groups = Some(list(raw));
        }
        if let Some(raw) = &self.namespaces {
            config.namespaces = list(raw);
        }
        if let Some(raw) = &self.entities {
            config.entities = list(raw)
                .iter()
                .map(|e| e.parse::<StandardEntity>())
                .collect::<Result<_, _>>()
                .context("Invalid --entities")?;
        }
        if let Some(raw) = &self.include_woocommerce {
            config.include_extension = parse_yes_no(raw);
        }
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(name) = &self.name {
            config.collection_name = Some(name.clone());
        }
        config.sanitize();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for documents
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Export { selection, file } => {
            let (site, config) = selection.load().await?;
            let collection =
                routedoc_core::export(&site, &config).context("Failed to assemble collection")?;
            write_output(file.as_deref(), &collection.to_json_pretty()?).await?;
        }
        Commands::ExportOpenapi { selection, file } => {
            let (site, config) = selection.load().await?;
            let document = routedoc_core::export_openapi(&site, &config)
                .context("Failed to build OpenAPI document")?;
            write_output(file.as_deref(), &document.to_json_pretty()?).await?;
        }
        Commands::Convert {
            collection,
            base_url,
            file,
        } => {
            let content = fs::read_to_string(collection)
                .await
                .with_context(|| format!("Failed to read {}", collection.display()))?;
            let parsed: Collection = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a collection document", collection.display()))?;

            let mut converter = OpenApiConverter::new();
            if let Some(url) = base_url {
                converter = converter.with_base_url(url.clone());
            }
            let document = converter.convert(&parsed);
            document.validate().context("Converted document is invalid")?;
            write_output(file.as_deref(), &document.to_json_pretty()?).await?;
        }
        Commands::Namespaces { site, all } => {
            let site = SiteSnapshot::from_file(site)
                .await
                .with_context(|| format!("Failed to load site snapshot {}", site.display()))?;
            let discoverer = RouteDiscoverer::from_host(&site)?;
            let namespaces = if *all {
                discoverer.available_namespaces()
            } else {
                discoverer.includable_namespaces()
            };
            for namespace in namespaces {
                println!("{}", namespace);
            }
        }
    }
    Ok(())
}

async fn write_output(file: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
