use crate::loader::{load_project, Severity};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use treescribe_engine::{Document, RewriteHandler, RewriteOutcome};
use treescribe_policies::{CommentSpacingPolicy, RenamePolicy};

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Project directory to rewrite (prompted for when omitted)
    #[arg(short, long)]
    pub project_path: Option<PathBuf>,

    /// Number of concurrent rewrite workers
    #[arg(short, long, default_value = "8")]
    pub workers: usize,

    /// Rename policy config (JSON array of { from, to, import? })
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn rewrite(args: RewriteArgs) -> Result<()> {
    let root = resolve_project_path(args.project_path)?;

    println!(
        "{}",
        format!("🔧 Rewriting sources under {}", root.display())
            .bright_blue()
            .bold()
    );

    let project = load_project(&root);
    for diagnostic in &project.diagnostics {
        match diagnostic.severity {
            Severity::Warning => println!("  {} {}", "⚠".yellow(), diagnostic.message.yellow()),
            Severity::Failure => eprintln!("  {} {}", "✗".red(), diagnostic.message.red()),
        }
    }
    if project.has_failures() {
        return Err(anyhow!("project failed to load, nothing was rewritten"));
    }

    println!("Found {} files", project.files.len());

    let handler = Arc::new(build_handler(args.config.as_deref())?);

    // Round-robin the files over the worker pool.
    let worker_count = args.workers.clamp(1, project.files.len());
    let mut batches: Vec<Vec<PathBuf>> = vec![Vec::new(); worker_count];
    for (index, file) in project.files.into_iter().enumerate() {
        batches[index % worker_count].push(file);
    }

    let started = Instant::now();
    let mut tasks = Vec::with_capacity(worker_count);
    for batch in batches {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(rewrite_batch(handler, batch)));
    }

    let mut rewritten = 0;
    let mut unchanged = 0;
    let mut failed = 0;
    for task in tasks {
        let tally = task.await.context("rewrite worker panicked")?;
        rewritten += tally.rewritten;
        unchanged += tally.unchanged;
        failed += tally.failed;
    }

    println!();
    if failed == 0 {
        println!(
            "{} Rewrote {} files ({} unchanged) in {:.2?}",
            "✅".green(),
            rewritten,
            unchanged,
            started.elapsed()
        );
        Ok(())
    } else {
        println!(
            "{} Rewrote {} files, {} unchanged, {} failed",
            "⚠️".yellow(),
            rewritten,
            unchanged,
            failed
        );
        Err(anyhow!("{} files failed to rewrite", failed))
    }
}

#[derive(Default)]
struct Tally {
    rewritten: usize,
    unchanged: usize,
    failed: usize,
}

async fn rewrite_batch(handler: Arc<RewriteHandler>, batch: Vec<PathBuf>) -> Tally {
    let mut tally = Tally::default();

    for path in batch {
        let started = Instant::now();
        match rewrite_one(&handler, &path).await {
            Ok(RewriteOutcome::Rewritten { .. }) => {
                tally.rewritten += 1;
                println!(
                    "  {} {} ({:.2?})",
                    "✓".green(),
                    path.display(),
                    started.elapsed()
                );
            }
            Ok(RewriteOutcome::Unchanged) => {
                tally.unchanged += 1;
                tracing::debug!(path = %path.display(), "unchanged");
            }
            Err(error) => {
                tally.failed += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    path.display(),
                    error.to_string().red()
                );
            }
        }
    }

    tally
}

async fn rewrite_one(handler: &RewriteHandler, path: &std::path::Path) -> Result<RewriteOutcome> {
    let doc = Document::load(path.to_path_buf())?;
    Ok(handler.rewrite_document(&doc).await?)
}

fn build_handler(config: Option<&std::path::Path>) -> Result<RewriteHandler> {
    let mut handler = RewriteHandler::new();
    handler.install_plugin(Arc::new(CommentSpacingPolicy));

    if let Some(config) = config {
        let raw = std::fs::read_to_string(config)
            .with_context(|| format!("cannot read config {}", config.display()))?;
        handler.install_plugin(Arc::new(RenamePolicy::from_json(&raw)?));
    }

    Ok(handler)
}

/// Use the given path when it points at a directory; otherwise prompt
/// until one does.
fn resolve_project_path(given: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = given {
        if path.is_dir() {
            return Ok(path);
        }
        eprintln!(
            "  {} {}",
            "⚠".yellow(),
            format!("not a directory: {}", path.display()).yellow()
        );
    }

    loop {
        print!("Project path: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            return Err(anyhow!("no project path given"));
        }

        let path = PathBuf::from(line.trim());
        if path.is_dir() {
            return Ok(path);
        }
        eprintln!(
            "  {} {}",
            "⚠".yellow(),
            format!("not a directory: {}", path.display()).yellow()
        );
    }
}
