use colored::*;

use crate::cleaner::{CleanupReport, ScopeReport, ScopeResult};
use crate::common::format::{self, format_count, format_ratio, short_id};
use crate::memory::{Archived, GeneratedKey, Recalled};

/// Print a cleanup run in human-readable format
pub fn print_cleanup_results(report: &CleanupReport, duration_secs: f64) {
    println!();
    println!("{}  onpull Cleanup Results", "🧹");
    println!("{}", "─".repeat(60).dimmed());

    for scope in &report.scopes {
        match scope {
            ScopeResult::Completed(r) => print_scope(r),
            ScopeResult::Failed { visibility, error } => {
                println!(
                    "  {} {:<8} {}",
                    "✗".red(),
                    visibility.to_string().bold(),
                    "aborted".red().bold()
                );
                println!("    {} {}", "→".dimmed(), error.dimmed());
            }
        }
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} Deleted {} in {}",
        "🎉",
        format_ratio(report.total_succeeded(), report.total_attempted()),
        format::format_duration(duration_secs).cyan()
    );
    println!();
}

fn print_scope(r: &ScopeReport) {
    let marker = if r.failures.is_empty() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} {:<8} {} deleted  •  {} attempted  •  {}",
        marker,
        r.visibility.to_string().bold(),
        format_ratio(r.succeeded, r.attempted),
        r.attempted,
        format_count(r.pages_fetched, "page").dimmed()
    );
    for failure in &r.failures {
        println!(
            "    {} {} {}",
            "→".dimmed(),
            failure.id.yellow(),
            format::truncate(&failure.detail, 80).dimmed()
        );
    }
}

pub fn print_cleanup_json(report: &CleanupReport) {
    println!(
        "{}",
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    );
}

/// One line per scope: `<scope> <attempted> <succeeded>` or `<scope> failed`
pub fn print_cleanup_quiet(report: &CleanupReport) {
    for scope in &report.scopes {
        match scope {
            ScopeResult::Completed(r) => {
                println!("{}  {}  {}", r.visibility, r.attempted, r.succeeded)
            }
            ScopeResult::Failed { visibility, .. } => println!("{}  failed", visibility),
        }
    }
}

pub fn print_archived(archived: &Archived, label: &str) {
    println!();
    println!("  {} Memory archived for {}", "✓".green(), label.cyan());
    format::print_kv("CID", &archived.cid);
    format::print_kv("Batch ID", &archived.batch_id);
    if !archived.encrypted {
        println!(
            "  {} {}",
            "⚠".yellow(),
            "No encryption key configured; content was pinned as plaintext".yellow()
        );
    }
    println!();
}

pub fn print_recalled(memories: &[Recalled]) {
    format::print_header("🧠 Recalled memories");

    for m in memories {
        println!(
            "  {} | 📅 {} | {}",
            format!("{:02}", m.position).bold(),
            m.row.created_at,
            short_id(&m.row.ipfs_cid, 8).cyan()
        );
        println!(
            "    {}",
            format!(
                "Hash: {}  CID: {}  AI: {}",
                short_id(&m.row.hash_key, 12),
                m.row.ipfs_cid,
                m.row.ai_id
            )
            .dimmed()
        );
        for line in m.content.lines() {
            println!("    {}", line);
        }
        println!();
    }

    println!(
        "  {} Showing {}",
        "ℹ".blue(),
        format_count(memories.len(), "memory row")
    );
    println!();
}

pub fn print_generated_key(generated: &GeneratedKey) {
    println!();
    println!("  {} Key generated:", "✓".green());
    println!("  {}", generated.key.bold());
    println!();
    println!("  {} Saved to: {}", "📂", generated.path.display());
    println!();
}
