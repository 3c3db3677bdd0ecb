//! sigdoc: render declaration dumps into signature documentation.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `sigdoc < decls.json` prints every page to stdout
//! - **file mode**: `sigdoc -o docs/api -f markdown dumps/*.json` writes one file
//!   per top-level declaration

use anyhow::{Context, Result};
use clap::Parser;
use sigdoc::emit::{self, Emitter};
use sigdoc::model::load::{self, Loaded};
use sigdoc::page::{self, Page, PageOptions};
use sigdoc::signature::{self, LanguageService, RenderMode};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "sigdoc",
    about = "Render declaration dumps as Kotlin or Java signature documentation"
)]
struct Cli {
    /// Input JSON files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Signature language: kotlin (default), java
    #[arg(short = 'l', long, default_value = "kotlin")]
    language: String,

    /// Signature detail: full (default), summary
    #[arg(short = 'm', long, default_value = "full")]
    mode: RenderMode,

    /// Output format: markdown (default), text, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Include declarations documented with @suppress
    #[arg(long)]
    show_suppressed: bool,

    /// Log resolver and summarizer decisions
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let service = signature::create_service(&cli.language)?;
    let emitter = emit::create_emitter(&cli.format)?;
    let options = PageOptions {
        mode: cli.mode,
        show_suppressed: cli.show_suppressed,
    };

    if cli.files.is_empty() {
        return stdin_mode(service.as_ref(), emitter.as_ref(), &options);
    }

    file_mode(&cli, service.as_ref(), emitter.as_ref(), &options)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sigdoc=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// stdin mode: read one declaration dump, write every page to stdout.
fn stdin_mode(
    service: &dyn LanguageService,
    emitter: &dyn Emitter,
    options: &PageOptions,
) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let loaded = load::load_str(&input).context("failed to load declarations from stdin")?;
    let pages = build_pages(&loaded, service, options)?;
    let output = emitter.emit_all(&pages).context("failed to emit pages")?;
    print!("{}", output);
    Ok(())
}

/// file mode: one output file per top-level declaration of every input.
fn file_mode(
    cli: &Cli,
    service: &dyn LanguageService,
    emitter: &dyn Emitter,
    options: &PageOptions,
) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    let ext = emitter.file_extension();
    let mut written: HashSet<String> = HashSet::new();

    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let loaded = match load::load_str(&content) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let pages = build_pages(&loaded, service, options)
            .with_context(|| format!("failed to render {}", path.display()))?;
        for page in pages {
            let text = emitter
                .emit(&page)
                .with_context(|| format!("failed to emit page {}", page.title))?;
            let name = derive_output_name(&page.title);
            if !written.insert(name.clone()) {
                tracing::warn!(name = %name, "duplicate page name, overwriting earlier output");
            }
            let out_path = output_dir.join(format!("{}.{}", name, ext));
            fs::write(&out_path, &text)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            tracing::debug!(path = %out_path.display(), "wrote page");
        }
    }

    Ok(())
}

/// Build the page of every top-level declaration that is not suppressed.
fn build_pages(
    loaded: &Loaded,
    service: &dyn LanguageService,
    options: &PageOptions,
) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    for root in &loaded.roots {
        let node = loaded.graph.node(*root);
        if node.suppressed && !options.show_suppressed {
            continue;
        }
        let page = page::build_page(node, service, options)
            .with_context(|| format!("failed to render {:?}", node))?;
        pages.push(page);
    }
    Ok(pages)
}

/// File extensions recognized as declaration dumps.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Resolve input arguments to declaration dumps.
///
/// Files are taken as-is and directories contribute their `.json` files
/// (non-recursive). Any other argument is a glob pattern. The list is sorted
/// and deduplicated so pages are written in a stable order.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file() && is_declaration_dump(p)),
            );
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_declaration_dump(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Derive the output file name (without extension) from a page title.
/// "com.example" → "com.example", "Map<K, V>" → "Map_K_V"
fn derive_output_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            name.push(c);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_matches(|c| c == '_' || c == '.');
    if name.is_empty() {
        "index".to_string()
    } else {
        name.to_string()
    }
}
