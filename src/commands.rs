//! Command handlers behind the `labinvite` binary.
//!
//! Handlers write to a caller-supplied writer so integration tests can
//! capture their output. Manifest text is always fed through the same
//! pipeline regardless of where it came from or what the file is called.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{bail, Context};
use labinvite_client::{submit, BulkInviteRequest, HttpBulkInvite, Outcome};
use labinvite_core::config::{ApiConfig, Config};
use labinvite_core::template::{
    CSV_TEMPLATE, CSV_TEMPLATE_FILENAME, JSON_TEMPLATE, JSON_TEMPLATE_FILENAME,
};
use labinvite_core::{detect_format, parse_manifest_with, Defaults, InviteTarget, ManifestSchema};
use notify::{RecursiveMode, Watcher};
use serde_json::{json, Value};

use crate::cli::{Cli, Command, ParseArgs, SendArgs, TemplateArgs, TemplateFormat, WatchArgs};

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Parse(args) => parse(&args, &config, &mut stdout).map(|_| ()),
        Command::Template(args) => template(&args, Path::new("."), &mut stdout),
        Command::Send(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            let outcome = runtime.block_on(send(&args, &config, &mut stdout))?;
            if outcome.is_complete() {
                Ok(())
            } else {
                bail!("DEPLOYMENT FAILED: {outcome}")
            }
        }
        Command::Watch(args) => watch(&args, &config.schema(), &mut stdout),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to built-in config");
            Config::fallback()
        })),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Read manifest text from a file, or from stdin for `None` / `-`.
pub fn read_manifest(input: Option<&Path>) -> anyhow::Result<String> {
    let bytes = match input {
        None => read_stdin()?,
        Some(path) if path == Path::new("-") => read_stdin()?,
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?,
    };
    Ok(decode_text(&bytes))
}

fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .context("failed to read manifest from stdin")?;
    Ok(bytes)
}

/// UTF-8 decode with replacement characters, dropping a leading byte-order
/// mark the way browser text readers do.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(text.as_ref()).to_string()
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

/// Print the targets detected in a manifest; returns how many there were.
pub fn parse(args: &ParseArgs, config: &Config, out: &mut impl Write) -> anyhow::Result<usize> {
    let text = read_manifest(args.input.as_deref())?;
    let targets = parse_manifest_with(&text, &config.schema());

    if args.count {
        writeln!(out, "{}", targets.len())?;
    } else {
        let report = preview(&text, &targets, args.effective.then_some(&config.defaults));
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(targets.len())
}

/// JSON preview of a parsed manifest. With `defaults`, each target also shows
/// the scenario and duration it will actually receive.
pub fn preview(text: &str, targets: &[InviteTarget], defaults: Option<&Defaults>) -> Value {
    let rows: Vec<Value> = targets
        .iter()
        .map(|target| {
            let mut row = json!(target);
            if let (Some(defaults), Some(obj)) = (defaults, row.as_object_mut()) {
                obj.insert(
                    "effective_scenario_id".to_string(),
                    json!(target.effective_scenario(defaults)),
                );
                obj.insert(
                    "effective_duration_minutes".to_string(),
                    json!(target.effective_duration_minutes(defaults)),
                );
            }
            row
        })
        .collect();

    json!({
        "format": detect_format(text).to_string(),
        "count": targets.len(),
        "targets": rows,
    })
}

// ---------------------------------------------------------------------------
// template
// ---------------------------------------------------------------------------

/// Print a starter manifest, or save it into `dir` with `--save`.
pub fn template(args: &TemplateArgs, dir: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let (text, filename) = match args.format {
        TemplateFormat::Csv => (CSV_TEMPLATE, CSV_TEMPLATE_FILENAME),
        TemplateFormat::Json => (JSON_TEMPLATE, JSON_TEMPLATE_FILENAME),
    };

    if args.save {
        let path = dir.join(filename);
        std::fs::write(&path, format!("{text}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(out, "wrote {}", path.display())?;
    } else {
        writeln!(out, "{text}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// send
// ---------------------------------------------------------------------------

/// Parse a manifest and submit it. An empty manifest is an error; a call that
/// reaches the service yields an [`Outcome`]. A complete outcome is printed
/// with any per-target rejections; a failed one is left to the caller.
pub async fn send(args: &SendArgs, config: &Config, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let text = read_manifest(args.input.as_deref())?;
    let targets = parse_manifest_with(&text, &config.schema());
    if targets.is_empty() {
        bail!("no valid targets detected in manifest");
    }

    if args.dry_run {
        serde_json::to_writer_pretty(&mut *out, &BulkInviteRequest { participants: &targets })?;
        writeln!(out)?;
        return Ok(Outcome::Complete {
            count: targets.len() as u64,
            emails_sent: None,
            errors: Vec::new(),
        });
    }

    let api = ApiConfig {
        base_url: args.api_url.clone().unwrap_or_else(|| config.api.base_url.clone()),
        token: args.token.clone().or_else(|| config.api.token.clone()),
        ..config.api.clone()
    };
    let client = HttpBulkInvite::from_config(&api)?;
    tracing::info!(url = %client.url(), targets = targets.len(), "submitting manifest");

    let outcome = submit(&client, &targets).await?;
    if let Outcome::Complete { errors, .. } = &outcome {
        writeln!(out, "{outcome}")?;
        for error in errors {
            writeln!(out, "  - {error}")?;
        }
    }
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

/// Print the target count now and after every change to `path`. Runs until
/// the watcher shuts down.
pub fn watch(args: &WatchArgs, schema: &ManifestSchema, out: &mut impl Write) -> anyhow::Result<()> {
    let path = args.path.as_path();
    // Watch the parent so editors that save by rename are still seen.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;

    report_count(path, schema, out)?;
    for result in rx {
        match result {
            Ok(event) if touches(&event, path) => {
                if event.kind.is_create() || event.kind.is_modify() {
                    report_count(path, schema, out)?;
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "file watch error"),
        }
    }
    Ok(())
}

fn touches(event: &notify::Event, path: &Path) -> bool {
    event.paths.iter().any(|p| p.file_name() == path.file_name())
}

/// Re-parse `path` and print one status line. A file that cannot be read
/// right now (mid-save, removed) is logged and skipped.
pub fn report_count(path: &Path, schema: &ManifestSchema, out: &mut impl Write) -> anyhow::Result<()> {
    let text = match read_manifest(Some(path)) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "skipping unreadable manifest");
            return Ok(());
        }
    };
    let count = parse_manifest_with(&text, schema).len();
    writeln!(out, "{count} target(s) detected ({})", detect_format(&text))?;
    out.flush()?;
    Ok(())
}
