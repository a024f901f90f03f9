//! apidoc-ts: expand interface tags in apidoc comment blocks.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `apidoc-ts < api.ts` writes the expanded blocks to stdout
//! - **file mode**: `apidoc-ts -o docs/api -f json src/*.ts`

use anyhow::{Context as _, Result};
use apidoc_ts::hooks::Hooks;
use apidoc_ts::render::{self, Renderer};
use apidoc_ts::{logging, parser, plugin, Context, LabelStyle, Options};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "apidoc-ts",
    about = "Expand @apiInterfaceSuccess / @apiInterfaceParam tags from TypeScript interfaces"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: text (default), markdown, json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// How scalar type labels are written
    #[arg(long, value_enum, default_value_t = LabelStyle::Capitalized)]
    label_style: LabelStyle,

    /// Keep entries whose path was already emitted (diamond inheritance)
    #[arg(long)]
    keep_duplicates: bool,

    /// Declaration file whose types are global but never documented.
    /// Can be specified multiple times.
    #[arg(long, value_name = "FILE")]
    ambient: Vec<PathBuf>,

    /// Path stdin is treated as, for resolving relative imports and tag paths
    #[arg(long, default_value = "stdin.ts")]
    stdin_path: PathBuf,

    /// Log resolution steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut ctx = Context::new(Options {
        label_style: cli.label_style,
        dedupe_paths: !cli.keep_duplicates,
    });
    for path in &cli.ambient {
        ctx.add_ambient(path)
            .with_context(|| format!("failed to load ambient declarations: {}", path.display()))?;
    }

    let mut hooks = Hooks::default();
    plugin::init(&mut hooks)?;

    if cli.files.is_empty() {
        return stdin_mode(&cli, &mut ctx, &hooks);
    }

    file_mode(&cli, &mut ctx, &hooks)
}

/// stdin mode: read one source from stdin, write the rendered document to stdout.
fn stdin_mode(cli: &Cli, ctx: &mut Context, hooks: &Hooks) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    // Tags without a file path resolve against the piped text itself.
    ctx.register_text(&cli.stdin_path, &input);
    let doc = parser::parse(ctx, hooks, &cli.stdin_path, &input);
    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&doc)?);
    Ok(())
}

/// file mode: process every input file, one output file per source with api blocks.
fn file_mode(cli: &Cli, ctx: &mut Context, hooks: &Hooks) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let renderer = render::create_renderer(&cli.format)?;
    let input_files = expand_globs(&cli.files)?;

    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc = match parser::parse_file(ctx, hooks, path, &content) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        // Sources without api blocks produce no output
        if doc.blocks.is_empty() {
            continue;
        }

        write_output(renderer.as_ref(), &doc, output_dir, path)?;
    }

    Ok(())
}

fn write_output(
    renderer: &dyn Renderer,
    doc: &apidoc_ts::model::Document,
    output_dir: &Path,
    source: &Path,
) -> Result<()> {
    let name = derive_output_name(&source.to_string_lossy());
    let out_path = output_dir.join(format!("{}.{}", name, renderer.file_extension()));
    fs::write(&out_path, renderer.render(doc)?)
        .with_context(|| format!("failed to write {}", out_path.display()))
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && is_supported(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| parser::SUPPORTED_EXTENSIONS.contains(&ext))
        && !path.to_string_lossy().ends_with(".d.ts")
}

/// Derive the output file name (without extension) from a source path.
/// "src/routes/users.ts" → "users", "api.d.ts" → "api"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    [".d.ts", ".ts", ".tsx", ".mts", ".cts", ".js"]
        .iter()
        .find_map(|ext| filename.strip_suffix(ext))
        .unwrap_or(filename)
        .to_string()
}
