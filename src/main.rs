//! ywprov: render the provenance graph described by workflow annotations.
//!
//! Two modes:
//!
//! - **stdin mode**: `ywprov < script.py` writes the rendering to stdout
//! - **file mode**: `ywprov -o out/ -f provn scripts/*.py` writes one file per input

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use ywprov::config::Config;
use ywprov::model::Annotations;
use ywprov::parser::{self, Language};
use ywprov::render::{self, Renderer};
use ywprov::{assembler, graph, Namespace};

#[derive(Parser)]
#[command(
    name = "ywprov",
    version,
    about = "Extract workflow provenance graphs from annotated source comments"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: dot, provn, turtle, trig, xml, json, graph-json [config: prov.format]
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Comment syntax for stdin and unknown extensions [config: extract.language]
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Namespace prefix of node identifiers [config: prov.prefix]
    #[arg(long)]
    prefix: Option<String>,

    /// Namespace IRI bound to the prefix [config: prov.namespace]
    #[arg(long)]
    namespace: Option<String>,

    /// Config file (default: ./ywprov.toml when present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the assembled annotation blocks instead of a graph
    #[arg(long)]
    blocks: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

/// Effective settings: config file values overridden by flags.
struct Settings {
    language: Language,
    namespace: Namespace,
    renderer: Box<dyn Renderer>,
    blocks: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Result<Self> {
        let language = cli
            .language
            .as_deref()
            .unwrap_or(config.extract.language.as_str())
            .parse::<Language>()?;
        let format = cli.format.as_deref().unwrap_or(config.prov.format.as_str());
        let renderer = render::create_renderer(format)?;
        let mut namespace = config.namespace();
        if let Some(ref prefix) = cli.prefix {
            namespace.prefix = prefix.clone();
        }
        if let Some(ref uri) = cli.namespace {
            namespace.uri = uri.clone();
        }
        Ok(Self {
            language,
            namespace,
            renderer,
            blocks: cli.blocks,
        })
    }

    /// Render one parsed source, or its block dump with `--blocks`.
    fn output(&self, arena: &Annotations) -> Result<String> {
        let blocks = assembler::assemble(arena);
        if self.blocks {
            return Ok(assembler::describe(&blocks, arena));
        }
        let doc = graph::ProvenanceBuilder::new(arena, self.namespace.clone()).build(&blocks)?;
        let text = self.renderer.render(&doc).context("failed to render graph")?;
        Ok(text)
    }

    fn extension(&self) -> &str {
        if self.blocks {
            "blocks.txt"
        } else {
            self.renderer.file_extension()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config)?;

    if cli.files.is_empty() {
        return stdin_mode(&settings);
    }

    file_mode(&cli, &settings)
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// stdin mode: parse stdin with the configured language, write to stdout.
fn stdin_mode(settings: &Settings) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let arena = parser::parse_source(&input, settings.language, 0).context("<stdin>")?;
    let output = settings.output(&arena).context("<stdin>")?;
    io::stdout()
        .write_all(output.as_bytes())
        .context("failed to write stdout")?;
    Ok(())
}

/// file mode: one output file per annotated input.
fn file_mode(cli: &Cli, settings: &Settings) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let input_files = expand_globs(&cli.files)?;
    check_output_names(&input_files)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for (source_id, path) in input_files.iter().enumerate() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let arena = parser::parse_file(path, &content, source_id, settings.language)
            .with_context(|| format!("{}", path.display()))?;
        // Skip sources with nothing to say
        if arena.is_empty() {
            log::warn!("skipping {}: no annotations", path.display());
            continue;
        }

        let output = settings
            .output(&arena)
            .with_context(|| format!("{}", path.display()))?;
        let out_path = output_dir.join(format!("{}.{}", output_name(path), settings.extension()));
        fs::write(&out_path, output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        log::info!("{} -> {}", path.display(), out_path.display());
    }

    Ok(())
}

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned (non-recursively) for known source extensions.
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
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && Language::from_path(&p).is_some() {
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
            log::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Fail when two inputs would write the same output file.
fn check_output_names(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for path in files {
        if let Some(first) = seen.insert(output_name(path), path.as_path()) {
            anyhow::bail!(
                "{} and {} would write the same output file {}",
                first.display(),
                path.display(),
                output_name(path)
            );
        }
    }
    Ok(())
}

/// "scripts/clean.py" -> "clean"
fn output_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
