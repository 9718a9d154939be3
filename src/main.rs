//! gloss — split embedded documentation annotations out of source files.
//!
//! Two modes:
//!
//! - **stdin mode**: `gloss < file.js` — runnable stream to stdout,
//!   documentation stream to `--docs` if given.
//! - **file mode**: `gloss -o out src/*.js` — writes `name.ext` (runnable)
//!   and `name.doc.ext` (documentation) per input into the output directory.
//!
//! Either mode can additionally ingest every annotation into one shared
//! documentation database and write it as JSON with `--database`.

use anyhow::{Context, Result};
use clap::Parser;
use gloss::extract::{self, Conventions, Split};
use gloss::ingest::Ingester;
use gloss::tree::Tree;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gloss",
    about = "Separate embedded documentation annotations from runnable source code"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory for the runnable and documentation streams.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// In stdin mode, write the documentation stream to this file.
    #[arg(short = 'd', long)]
    docs: Option<PathBuf>,

    /// Parse and ingest every annotation, writing the documentation
    /// database as JSON to this file.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Identifier the annotation calls hang off.
    #[arg(long, default_value = "gloss")]
    namespace: String,

    /// Line beginning an excised authoring-support block.
    #[arg(long, default_value = "// BEGIN GLOSS")]
    begin_marker: String,

    /// Line ending it.
    #[arg(long, default_value = "// END GLOSS")]
    end_marker: String,
}

impl Cli {
    fn conventions(&self) -> Conventions {
        Conventions {
            namespace: self.namespace.clone(),
            begin_marker: self.begin_marker.clone(),
            end_marker: self.end_marker.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        stdin_mode(&cli)
    } else {
        file_mode(&cli)
    }
}

/// stdin mode: split one buffer, runnable stream to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let split = extract::split(&input, &cli.conventions());
    report_split_errors("<stdin>", &split);

    if let Some(ref docs) = cli.docs {
        fs::write(docs, &split.documentation)
            .with_context(|| format!("failed to write {}", docs.display()))?;
    }

    if cli.database.is_some() {
        let mut tree = Tree::new();
        ingest_split(&mut tree, "<stdin>", &split);
        write_database(cli, &tree)?;
    }

    print!("{}", split.runnable);
    Ok(())
}

/// file mode: split every input, persist both streams per file, and feed
/// one shared database in deterministic (sorted) input order.
fn file_mode(cli: &Cli) -> Result<()> {
    if cli.output.is_none() && cli.database.is_none() {
        anyhow::bail!("--output or --database is required when files are given");
    }
    if let Some(ref dir) = cli.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    }

    let conventions = cli.conventions();
    let mut tree = Tree::new();

    for path in expand_globs(&cli.files)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let display = path.display().to_string();

        let split = extract::split(&content, &conventions);
        report_split_errors(&display, &split);

        if let Some(ref dir) = cli.output {
            let name = path
                .file_name()
                .with_context(|| format!("input has no file name: {}", path.display()))?;
            let runnable_path = dir.join(name);
            fs::write(&runnable_path, &split.runnable)
                .with_context(|| format!("failed to write {}", runnable_path.display()))?;

            let doc_path = dir.join(doc_file_name(Path::new(name)));
            fs::write(&doc_path, &split.documentation)
                .with_context(|| format!("failed to write {}", doc_path.display()))?;
        }

        if cli.database.is_some() {
            ingest_split(&mut tree, &display, &split);
        }
    }

    write_database(cli, &tree)
}

fn ingest_split(tree: &mut Tree, source: &str, split: &Split) {
    let mut ingester = Ingester::new(tree);
    ingester.ingest_calls(&split.calls);
    for err in &ingester.errors {
        eprintln!("warning: {source}: {err}");
    }
    for dup in &ingester.duplicates {
        eprintln!(
            "warning: {source}: duplicate {} `{}` under `{}` ignored",
            dup.kind, dup.name, dup.parent
        );
    }
}

fn write_database(cli: &Cli, tree: &Tree) -> Result<()> {
    let Some(ref path) = cli.database else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(&tree.to_value()).context("serialize database")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn report_split_errors(source: &str, split: &Split) {
    for err in &split.errors {
        eprintln!("warning: {source}: {err}");
    }
}

/// Documentation stream file name: "app.js" → "app.doc.js".
fn doc_file_name(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => PathBuf::from(format!("{stem}.doc.{ext}")),
        None => PathBuf::from(format!("{stem}.doc")),
    }
}

/// Expand glob patterns into a sorted, deduped list of file paths.
/// Ingestion order follows this list, so output is deterministic.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_name_keeps_extension() {
        assert_eq!(doc_file_name(Path::new("app.js")), PathBuf::from("app.doc.js"));
    }

    #[test]
    fn doc_name_without_extension() {
        assert_eq!(doc_file_name(Path::new("Makefile")), PathBuf::from("Makefile.doc"));
    }
}
