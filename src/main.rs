//! Site-Binder main entry point
//!
//! This is the command-line interface for binding a website into one document.

use anyhow::Context;
use clap::Parser;
use site_binder::config::{compute_config_hash, parse_config, validate, Config};
use site_binder::crawler::{run_crawl, user_agent_string, TraversalStrategy};
use site_binder::output::{print_report, write_document};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Binder: bind a website into a single document
///
/// Site-Binder starts at one page, discovers the rest either through an index
/// of links or by following "next page" links, extracts the content region of
/// every page and writes them out as one document.
#[derive(Parser, Debug)]
#[command(name = "site-binder")]
#[command(version)]
#[command(about = "Bind a website into a single document", long_about = None)]
struct Cli {
    /// Path to TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start URL of the crawl
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Class of the element holding each page's content
    #[arg(long, value_name = "CLASS")]
    content_class: Option<String>,

    /// Output file
    #[arg(long, value_name = "FILE")]
    filename: Option<String>,

    /// Id of the element on the start page listing every page
    #[arg(long, value_name = "ID", conflicts_with = "next_page_class")]
    index_id: Option<String>,

    /// Class of the anchor leading to the next page
    #[arg(long, value_name = "CLASS", conflicts_with = "index_id")]
    next_page_class: Option<String>,

    /// Title of the assembled document
    #[arg(long)]
    title: Option<String>,

    /// External converter, e.g. `--render-command wkhtmltopdf {input} {output}`
    #[arg(long, num_args = 1.., value_name = "ARG", allow_hyphen_values = true)]
    render_command: Option<Vec<String>>,

    /// Maximum concurrent fetches when enumerating an index
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command line overrides on top of a (possibly default) config
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.site.start_url = url.clone();
        }
        if let Some(class) = &self.content_class {
            config.site.content_class = class.clone();
        }
        // A mode chosen on the command line replaces the file's mode entirely
        if let Some(id) = &self.index_id {
            config.site.index_id = Some(id.clone());
            config.site.next_page_class = None;
        }
        if let Some(class) = &self.next_page_class {
            config.site.next_page_class = Some(class.clone());
            config.site.index_id = None;
        }
        if let Some(filename) = &self.filename {
            config.output.filename = filename.clone();
        }
        if let Some(title) = &self.title {
            config.output.title = title.clone();
        }
        if let Some(command) = &self.render_command {
            config.output.render_command = Some(command.clone());
        }
        if let Some(limit) = self.concurrency {
            config.crawler.max_concurrent_fetches = limit;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_binder=info,warn"),
            1 => EnvFilter::new("site_binder=debug,info"),
            2 => EnvFilter::new("site_binder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the run configuration from the optional file and the flags
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = parse_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e).context("Invalid configuration");
    }

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let strategy = TraversalStrategy::from_config(&config.site)?;

    println!("=== Site-Binder Dry Run ===\n");

    println!("Site:");
    println!("  Start URL: {}", config.site.start_url);
    println!("  Content class: {}", config.site.content_class);
    match &strategy {
        TraversalStrategy::IndexEnumeration { container_id } => {
            println!("  Traversal: index enumeration (id=\"{}\")", container_id)
        }
        TraversalStrategy::NextLinkChain { next_class } => {
            println!("  Traversal: next-link chain (class=\"{}\")", next_class)
        }
    }

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", user_agent_string(&config.user_agent));

    println!("\nOutput:");
    println!("  File: {}", config.output.filename);
    println!("  Title: {}", config.output.title);
    match &config.output.render_command {
        Some(argv) => println!("  Renderer: {}", argv.join(" ")),
        None => println!("  Renderer: html"),
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_document(&report, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.filename))?;
    tracing::info!("Successfully generated {}", config.output.filename);

    print_report(&report);

    Ok(())
}
