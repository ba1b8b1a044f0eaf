use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use webhook_patcher::{
    apply, require_all_applied, source, webhook_rules, RuleOutcome, DEFAULT_TARGET,
};

#[derive(Parser)]
#[command(name = "webhook-patcher")]
#[command(about = "One-shot textual patcher for webhook.ts", long_about = None)]
#[command(version)]
struct Cli {
    /// File to patch (defaults to the webhook.ts path the rules target)
    #[arg(default_value = DEFAULT_TARGET)]
    file: PathBuf,

    /// Fail if any rule matched nothing (already-applied rules still pass)
    #[arg(short, long)]
    strict: bool,

    /// Dry run - report what would change without writing the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rules = webhook_rules().context("failed to build rule set")?;

    let original = source::read(&cli.file)
        .with_context(|| format!("cannot read {}", cli.file.display()))?;

    let result = apply(&original, &rules);

    // Per-rule report
    for report in &result.reports {
        match &report.outcome {
            RuleOutcome::Applied { replacements } => {
                println!(
                    "{} {}: applied ({} replacement{})",
                    "✓".green(),
                    report.id,
                    replacements,
                    if *replacements == 1 { "" } else { "s" }
                );
            }
            RuleOutcome::AlreadyApplied => {
                println!("{} {}: already applied", "⊙".yellow(), report.id);
            }
            RuleOutcome::NoMatch => {
                println!("{} {}: no match", "✗".red(), report.id);
            }
        }
    }

    if cli.diff && original != result.text {
        display_diff(&cli.file, &original, &result.text);
    }

    if cli.strict {
        if let Err(e) = require_all_applied(&result.reports) {
            eprintln!("{} {}", "strict mode:".red().bold(), e);
            std::process::exit(1);
        }
    }

    if cli.dry_run {
        println!(
            "{}",
            "[DRY RUN - file left untouched]".cyan()
        );
        return Ok(());
    }

    if result.is_noop() {
        println!("{} nothing to do for {}", "⊙".yellow(), cli.file.display());
        return Ok(());
    }

    source::write(&cli.file, &result.text)
        .with_context(|| format!("cannot write {}", cli.file.display()))?;

    println!("{} {} fixed", "✅".green(), cli.file.display());

    Ok(())
}

/// Show unified diff between original and patched content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}
