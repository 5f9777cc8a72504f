use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Read;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use onpull::cleaner::{self, Boundary, Pager};
use onpull::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use onpull::cli::output;
use onpull::common::config::Config;
use onpull::common::credentials::{
    self, encryption_key_from_env, PinataCredentials, SupabaseCredentials,
};
use onpull::memory::{self, MemoryCipher, SupabaseIndex};
use onpull::pinning::{Gateway, PinataClient};

fn main() -> Result<()> {
    let dotenv = credentials::load_dotenv();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_logging(&cli);
    dotenv.log();

    match cli.command {
        Commands::Clean { keep_going } => cmd_clean(&cli, keep_going),

        Commands::Archive {
            ref content,
            ref ai_id,
            ref display_name,
        } => cmd_archive(&cli, content.clone(), ai_id, display_name.as_deref()),

        Commands::Recall {
            ref value,
            by,
            ref ai_id,
        } => cmd_recall(&cli, value, by.into(), ai_id),

        Commands::Import { ref path, ref ai_id } => cmd_import(&cli, path, ai_id),

        Commands::Keygen { ref output } => cmd_keygen(&cli, output),

        Commands::Config { action } => cmd_config(action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                onpull::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                onpull::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                onpull::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "onpull", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Logs go to stderr so `--format json` output stays parseable
fn init_logging(cli: &Cli) {
    let default = if cli.verbose {
        "onpull=debug"
    } else if cli.quiet {
        "onpull=warn"
    } else {
        "onpull=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cipher_for(ai_id: &str) -> Result<Option<MemoryCipher>> {
    encryption_key_from_env(ai_id)
        .map(|key| {
            MemoryCipher::from_encoded(&key).with_context(|| {
                format!(
                    "Invalid {}",
                    credentials::encryption_key_var(ai_id)
                )
            })
        })
        .transpose()
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli, keep_going: bool) -> Result<()> {
    let config = Config::load()?;
    // Missing credential must fail before any request is made
    let creds = PinataCredentials::from_env()?;
    let client = PinataClient::new(&config, creds)?;
    let mut pager = Pager::new(client, config.page_limit)?;

    let boundary = if keep_going {
        Boundary::PerScope
    } else {
        Boundary::AllOrNothing
    };

    let start = Instant::now();
    let report = cleaner::clean_all(&mut pager, boundary).context("Cleanup aborted")?;
    let duration = start.elapsed().as_secs_f64();

    match cli.format {
        OutputFormat::Human => output::print_cleanup_results(&report, duration),
        OutputFormat::Json => output::print_cleanup_json(&report),
        OutputFormat::Quiet => output::print_cleanup_quiet(&report),
    }

    if report.has_failed_scope() {
        anyhow::bail!("One or more scopes could not be cleaned");
    }
    Ok(())
}

// ─── Archive ──────────────────────────────────────────────────────────────────

fn cmd_archive(
    cli: &Cli,
    content: Option<String>,
    ai_id: &str,
    display_name: Option<&str>,
) -> Result<()> {
    let content = match content {
        Some(c) => c,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read memory from stdin")?;
            buf
        }
    };

    let config = Config::load()?;
    let pinata = PinataClient::new(&config, PinataCredentials::from_env()?)?;
    let index = SupabaseIndex::new(&config, SupabaseCredentials::from_env()?)?;
    let cipher = cipher_for(ai_id)?;

    let archived = memory::archive(&pinata, &index, cipher.as_ref(), ai_id, &content)
        .context("Failed to archive memory")?;

    let label = match display_name {
        Some(name) => format!("{} ({})", name, ai_id),
        None => ai_id.to_string(),
    };
    match cli.format {
        OutputFormat::Human => output::print_archived(&archived, &label),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&archived)?),
        OutputFormat::Quiet => println!("{}  {}", archived.cid, archived.batch_id),
    }
    Ok(())
}

// ─── Recall ───────────────────────────────────────────────────────────────────

fn cmd_recall(cli: &Cli, value: &str, by: memory::LookupKey, ai_id: &str) -> Result<()> {
    let config = Config::load()?;
    let index = SupabaseIndex::new(&config, SupabaseCredentials::from_env()?)?;
    let gateway = Gateway::new(&config)?;
    let cipher = cipher_for(ai_id)?;

    let memories = memory::recall(&gateway, &index, cipher.as_ref(), by, value)
        .with_context(|| format!("Failed to recall memories where {} = {}", by, value))?;

    match cli.format {
        OutputFormat::Human => output::print_recalled(&memories),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&memories)?),
        OutputFormat::Quiet => {
            for m in &memories {
                println!("{}  {}", m.row.ipfs_cid, m.row.created_at);
            }
        }
    }
    Ok(())
}

// ─── Import ───────────────────────────────────────────────────────────────────

fn cmd_import(cli: &Cli, path: &std::path::Path, ai_id: &str) -> Result<()> {
    let source = memory::read_import(path)
        .with_context(|| format!("Failed to import {}", path.display()))?;

    let config = Config::load()?;
    let pinata = PinataClient::new(&config, PinataCredentials::from_env()?)?;
    let index = SupabaseIndex::new(&config, SupabaseCredentials::from_env()?)?;
    let cipher = cipher_for(ai_id)?;

    let archived = memory::archive(&pinata, &index, cipher.as_ref(), ai_id, &source.content)
        .context("Failed to archive imported memory")?;

    match cli.format {
        OutputFormat::Human => {
            output::print_archived(&archived, ai_id);
            if source.skipped_records > 0 {
                println!(
                    "  {} Only the first record was imported ({} more ignored)",
                    "⚠".yellow(),
                    source.skipped_records
                );
                println!();
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&archived)?),
        OutputFormat::Quiet => println!("{}  {}", archived.cid, archived.batch_id),
    }
    Ok(())
}

// ─── Keygen ───────────────────────────────────────────────────────────────────

fn cmd_keygen(cli: &Cli, output_path: &std::path::Path) -> Result<()> {
    let generated = memory::generate_key_file(output_path)?;

    match cli.format {
        OutputFormat::Human => output::print_generated_key(&generated),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "key": generated.key, "path": generated.path })
        ),
        OutputFormat::Quiet => println!("{}", generated.key),
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let config = Config::default();
            config.save()?;
            println!("  {} onpull initialized at ~/.onpull", "✓".green());
            println!("  Created: config.toml");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
