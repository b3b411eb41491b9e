// ABOUTME: Main entry point for the slide-site program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use slide_site::site::{SiteBuilder, Staticrypt};
use slide_site::slides::SlideIndex;
use slide_site::{utils, Config, ResourceFile};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site from the source tree
    Build(BuildArgs),

    /// Generate a slide deck with a section header from markdown
    Deck(DeckArgs),

    /// Print the slide index and section groups of a deck
    Outline(OutlineArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Site root holding src/, assets/ and passwords.json
    #[arg(long)]
    root: Option<PathBuf>,

    /// Source directory (defaults to SITE_SRC_DIR or src)
    #[arg(long)]
    src: Option<PathBuf>,

    /// Output directory (defaults to SITE_DOCS_DIR or docs)
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Password book file
    #[arg(long)]
    passwords: Option<PathBuf>,

    /// Days browsers remember an entered password
    #[arg(long)]
    remember_days: Option<u32>,
}

#[derive(Args)]
struct DeckArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long)]
    mode: Option<String>,
}

#[derive(Args)]
struct OutlineArgs {
    /// Markdown deck or rendered HTML deck
    #[arg(short, long)]
    input: PathBuf,
}

fn build(args: &BuildArgs) -> slide_site::Result<()> {
    let mut config = Config::from_env();
    if let Some(root) = &args.root {
        config = config.rooted_at(root);
    }
    if let Some(src) = &args.src {
        config.src_dir = src.clone();
    }
    if let Some(docs) = &args.docs {
        config.docs_dir = docs.clone();
    }
    if let Some(passwords) = &args.passwords {
        config.passwords_file = passwords.clone();
    }
    if let Some(days) = args.remember_days {
        config.staticrypt.remember_days = days;
    }

    let encryptor = Staticrypt::new(config.staticrypt.clone(), config.staging_dir.clone())
        .in_dir(config.site_root.clone());
    let report = SiteBuilder::new(config.clone(), encryptor).build()?;

    println!(
        "Build complete: {} of {} files processed ({} encrypted, {} unchanged, {} failed)",
        report.processed, report.discovered, report.encrypted, report.skipped, report.failed
    );
    println!("Output directory: {:?}", config.docs_dir);
    println!("Password book: {:?}", config.passwords_file);
    Ok(())
}

fn deck(args: &DeckArgs) -> slide_site::Result<()> {
    let config = Config::from_env();
    let embed = match args.mode.as_deref() {
        None => config.embed_resources,
        Some("embed") => true,
        Some("link") => false,
        Some(other) => {
            return Err(slide_site::SiteError::ConfigError(format!(
                "Unknown resource mode '{}', expected 'embed' or 'link'",
                other
            )))
        }
    };

    let css_files: Vec<ResourceFile> = args
        .css
        .iter()
        .flatten()
        .map(|path| ResourceFile::css(path))
        .collect();
    let js_files: Vec<ResourceFile> = args
        .js
        .iter()
        .flatten()
        .map(|path| ResourceFile::js(path))
        .collect();

    let html = slide_site::generate_deck_html(&args.input, &css_files, &js_files, embed)?;
    utils::ensure_parent_directory_exists(&args.output)?;
    fs::write(&args.output, html)
        .with_context(|| format!("Failed to write deck to {:?}", args.output))?;

    println!("Deck generated successfully: {:?}", args.output);
    Ok(())
}

fn outline(args: &OutlineArgs) -> slide_site::Result<()> {
    utils::validate_file_exists(&args.input)?;
    let content = fs::read_to_string(&args.input)?;

    let is_html = args
        .input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false);
    let index = if is_html {
        SlideIndex::build(slide_site::scan_deck_html(&content)?)
    } else {
        SlideIndex::from_slides(&slide_site::parse_deck(&content).slides)
    };
    info!("Indexed {} slides from {:?}", index.len(), args.input);

    for group in index.groups() {
        let slides: Vec<String> = group.slides.iter().map(|i| (i + 1).to_string()).collect();
        println!("{} ({}): {}", group.title, group.slides.len(), slides.join(", "));
    }
    println!("{} slides", index.len());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match &cli.command {
        Some(Commands::Build(args)) => build(args),
        Some(Commands::Deck(args)) => deck(args),
        Some(Commands::Outline(args)) => outline(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
