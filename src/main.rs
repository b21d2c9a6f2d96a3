//! Dotify - Gmail dot-variation generator
//!
//! Page through every dotted spelling of a Gmail address, copy the ones you
//! need and remember which ones were already handed out.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{CustomType, InquireError, Select, Text};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use dotify::{
    clipboard::copy_to_clipboard,
    email::EmailParser,
    generate_at,
    types::{Config, Page},
    variations::{page_window, PageMarker},
    DotVariations, DotifyError, Pager, ParsedEmail, SessionState,
};

/// Exports larger than this need an explicit --limit
const MAX_UNBOUNDED_EXPORT: u64 = 1 << 20;

/// Variations generated per export chunk
const EXPORT_BATCH_SIZE: u64 = 1024;

#[derive(Parser, Debug)]
#[command(name = "dotify", version, about = "Generate and page through Gmail dot variations")]
struct Cli {
    /// Variations per page (overrides DOTIFY_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<u64>,

    /// Directory for session files (overrides DOTIFY_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how many variations an address has
    Count { email: String },
    /// Print one page of variations
    Page {
        email: String,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Emit the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the variation at an index
    At { email: String, index: u64 },
    /// Copy the variation at an index to the clipboard
    Copy { email: String, index: u64 },
    /// Pick a variation that has not been copied yet
    Random {
        email: String,
        /// Also copy it to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Write variations to a file or stdout
    Export {
        email: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum number of variations to write
        #[arg(short, long)]
        limit: Option<u64>,
        /// Index of the first variation to write
        #[arg(long, default_value_t = 0)]
        start: u64,
    },
    /// Forget which variations were copied
    Reset { email: String },
    /// Interactively browse variations
    Browse { email: Option<String> },
}

#[tokio::main]
async fn main() {
    // Load .env before the subscriber reads RUST_LOG
    if let Err(e) = dotify::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<DotifyError>() {
            Some(e) => eprintln!("{}", e.user_message()),
            None => eprintln!("❌ Error: {:#}", err),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "dotify=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(page_size) = cli.page_size {
        if page_size == 0 {
            return Err(DotifyError::cli("--page-size must be greater than 0").into());
        }
        config.page_size = page_size;
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }

    match cli.command.unwrap_or(Commands::Browse { email: None }) {
        Commands::Count { email } => cmd_count(&config, &email)?,
        Commands::Page { email, page, json } => cmd_page(&config, &email, page, json).await?,
        Commands::At { email, index } => cmd_at(&email, index)?,
        Commands::Copy { email, index } => cmd_copy(&config, &email, index)?,
        Commands::Random { email, copy } => cmd_random(&config, &email, copy)?,
        Commands::Export { email, output, limit, start } => {
            cmd_export(&email, output.as_deref(), limit, start)?
        }
        Commands::Reset { email } => cmd_reset(&config, &email)?,
        Commands::Browse { email } => cmd_browse(&config, email).await?,
    }

    Ok(())
}

/// Parse a command line address, rejecting malformed input
fn parse_address(raw: &str) -> dotify::Result<ParsedEmail> {
    let parsed = EmailParser::new().trimming().parse(raw).into_valid()?;
    tracing::info!(address = %parsed, "Parsed address");
    Ok(parsed)
}

fn load_session(config: &Config, parsed: &ParsedEmail) -> dotify::Result<(SessionState, PathBuf)> {
    let path = SessionState::default_path(&config.state_dir, parsed);
    let session = SessionState::load_or_new(&path, parsed)?;
    Ok((session, path))
}

fn cmd_count(config: &Config, raw: &str) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    let pager = Pager::new(&parsed, config.page_size)?;
    let (session, _) = load_session(config, &parsed)?;

    println!("📧 Address:    {}", parsed);
    println!("🔢 Variations: {}", pager.total());
    println!("📄 Pages:      {} ({} per page)", pager.total_pages(), pager.page_size());
    println!("📋 Copied:     {}", session.copied_count());

    if pager.total() == 0 {
        println!();
        println!("😔 No variations found. Try a longer username.");
    }

    Ok(())
}

async fn cmd_page(config: &Config, raw: &str, number: u64, json: bool) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    let pager = Pager::new(&parsed, config.page_size)?;
    let page = pager.page_concurrent(number).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let (session, _) = load_session(config, &parsed)?;
    display_page(&parsed, &page, &session);
    Ok(())
}

fn cmd_at(raw: &str, index: u64) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    println!("{}", generate_at(parsed.username(), parsed.domain(), index)?);
    Ok(())
}

fn cmd_copy(config: &Config, raw: &str, index: u64) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    let (mut session, path) = load_session(config, &parsed)?;
    copy_variation(&parsed, &mut session, &path, index)
}

/// Copy one variation and record it in the session
fn copy_variation(
    parsed: &ParsedEmail,
    session: &mut SessionState,
    path: &Path,
    index: u64,
) -> dotify::Result<()> {
    let address = generate_at(parsed.username(), parsed.domain(), index)?;
    println!("{}", address);

    copy_to_clipboard(&address)?;
    session.mark_copied(index)?;
    session.save(path)?;

    println!("📋 Copied to clipboard! ({} copied so far)", session.copied_count());
    Ok(())
}

fn cmd_random(config: &Config, raw: &str, copy: bool) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    let (mut session, path) = load_session(config, &parsed)?;

    let Some(index) = pick_uncopied(&session, &mut rand::thread_rng()) else {
        println!("😔 Every variation of {} has already been copied.", parsed);
        return Ok(());
    };

    if copy {
        copy_variation(&parsed, &mut session, &path, index)
    } else {
        println!("{}", generate_at(parsed.username(), parsed.domain(), index)?);
        Ok(())
    }
}

/// Random index that is not in the copied set.
///
/// Probes forward from a random start; at most `copied + 1` probes.
fn pick_uncopied<R: Rng>(session: &SessionState, rng: &mut R) -> Option<u64> {
    if session.remaining() == 0 {
        return None;
    }

    let start = rng.gen_range(0..session.total);
    (0..=session.copied_count() as u64)
        .map(|offset| (start + offset) % session.total)
        .find(|index| !session.is_copied(*index))
}

fn cmd_export(
    raw: &str,
    output: Option<&Path>,
    limit: Option<u64>,
    start: u64,
) -> anyhow::Result<()> {
    let parsed = parse_address(raw)?;
    let mut variations = DotVariations::new(&parsed)?;
    let total = variations.total();

    if start > 0 && start >= total {
        return Err(DotifyError::index_out_of_range(start, total).into());
    }
    variations.set_index(start);

    let available = variations.remaining();
    let count = match limit {
        Some(limit) => limit.min(available),
        None if available > MAX_UNBOUNDED_EXPORT => {
            return Err(DotifyError::cli(format!(
                "{} has {} variations; pass --limit to export a subset",
                parsed, available
            ))
            .into());
        }
        None => available,
    };

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let progress = if output.is_some() {
        let bar = ProgressBar::new(count);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} ({eta})")
                .map_err(|e| DotifyError::internal(e.to_string()))?
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut written = 0;
    while written < count && !variations.is_exhausted() {
        let batch = variations.next_batch((count - written).min(EXPORT_BATCH_SIZE) as usize);
        for address in &batch {
            writeln!(writer, "{}", address)?;
        }
        written += batch.len() as u64;
        progress.inc(batch.len() as u64);
    }
    writer.flush()?;
    progress.finish_and_clear();

    if let Some(path) = output {
        println!("✅ Wrote {} variations to {}", written, path.display());
    }
    tracing::info!(
        address = %parsed,
        start,
        written,
        next_index = variations.current_index(),
        "Exported variations"
    );
    Ok(())
}

fn cmd_reset(config: &Config, raw: &str) -> dotify::Result<()> {
    let parsed = parse_address(raw)?;
    let (mut session, path) = load_session(config, &parsed)?;
    let forgotten = session.copied_count();
    session.clear();
    session.save(&path)?;

    println!("🧹 Forgot {} copied variation(s) for {}", forgotten, parsed);
    Ok(())
}

/// Choices offered by the interactive browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    Next,
    Previous,
    Jump,
    Copy,
    Quit,
}

impl std::fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowseAction::Next => write!(f, "Next page"),
            BrowseAction::Previous => write!(f, "Previous page"),
            BrowseAction::Jump => write!(f, "Jump to page"),
            BrowseAction::Copy => write!(f, "Copy a variation"),
            BrowseAction::Quit => write!(f, "Quit"),
        }
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

async fn cmd_browse(config: &Config, email: Option<String>) -> dotify::Result<()> {
    println!("✨ Dotify - Gmail dot variations");
    println!("═══════════════════════════════");
    println!();

    let raw = match email {
        Some(raw) => raw,
        None => match Text::new("Email address:")
            .with_placeholder("yourname@gmail.com")
            .prompt()
        {
            Ok(raw) => raw,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(e.into()),
        },
    };

    let parsed = parse_address(&raw)?;
    let pager = Pager::new(&parsed, config.page_size)?;
    let (mut session, path) = load_session(config, &parsed)?;
    let mut current = 1;

    loop {
        let page = pager.page_concurrent(current).await?;
        display_page(&parsed, &page, &session);
        if page.is_empty() {
            return Ok(());
        }

        let mut actions = Vec::new();
        if page.has_next() {
            actions.push(BrowseAction::Next);
        }
        if page.has_prev() {
            actions.push(BrowseAction::Previous);
        }
        if page.total_pages > 1 {
            actions.push(BrowseAction::Jump);
        }
        actions.push(BrowseAction::Copy);
        actions.push(BrowseAction::Quit);

        let action = match Select::new("What next?", actions).prompt() {
            Ok(action) => action,
            Err(e) if is_cancel(&e) => BrowseAction::Quit,
            Err(e) => return Err(e.into()),
        };

        match action {
            BrowseAction::Next => current += 1,
            BrowseAction::Previous => current -= 1,
            BrowseAction::Jump => {
                let total_pages = page.total_pages;
                match CustomType::<u64>::new("Page:")
                    .with_help_message(&format!("1 to {}", total_pages))
                    .prompt()
                {
                    Ok(n) if (1..=total_pages).contains(&n) => current = n,
                    Ok(n) => eprintln!("{}", DotifyError::page_out_of_range(n, total_pages).user_message()),
                    Err(e) if is_cancel(&e) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            BrowseAction::Copy => match CustomType::<u64>::new("Index to copy:").prompt() {
                Ok(index) => {
                    if let Err(e) = copy_variation(&parsed, &mut session, &path, index) {
                        eprintln!("{}", e.user_message());
                    }
                }
                Err(e) if is_cancel(&e) => {}
                Err(e) => return Err(e.into()),
            },
            BrowseAction::Quit => return Ok(()),
        }
    }
}

/// Display a page of variations with copied markers and page navigation
fn display_page(parsed: &ParsedEmail, page: &Page, session: &SessionState) {
    println!();
    println!("🎨 Variations of {} ({} possibilities):", parsed, page.total);
    println!("═══════════════════");

    if page.is_empty() {
        println!("😔 No variations found. Try a longer username.");
        println!();
        return;
    }

    let width = page
        .items
        .last()
        .map_or(1, |item| item.index.to_string().len());
    for item in &page.items {
        let marker = if session.is_copied(item.index) { "✅" } else { "  " };
        println!("{} {:>width$}. {}", marker, item.index, item.address, width = width);
    }

    println!();
    println!("📄 Page {} of {}", page.number, page.total_pages);
    let window = page_window(page.number, page.total_pages);
    if !window.is_empty() {
        let line: Vec<String> = window
            .iter()
            .map(|marker| match marker {
                PageMarker::Page(n) if *n == page.number => format!("[{}]", n),
                other => other.to_string(),
            })
            .collect();
        println!("   {}", line.join(" "));
    }
    println!();
}
