use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use occdox_core::{Diagnostic, Import, OccdocReader, ReadError, ReadErrorKind};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "occdox")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, value_enum, default_value = "json", global = true)]
    format: OutputFormat,

    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract every module's procedure signatures.
    Extract { file: PathBuf },
    /// Extract signatures, optionally restricted to one module.
    Procs {
        #[arg(long)]
        module: Option<String>,

        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum Status {
    Pass,
    Error,
}

#[derive(Serialize)]
struct ResultJson {
    schema_version: String,
    tool: ToolInfo,
    invocation: Invocation,
    inputs: Vec<InputInfo>,
    status: Status,
    exit_code: i32,
    started_at: String,
    finished_at: String,
    duration_ms: u64,
    imports: Vec<Import>,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
    git_sha: String,
}

#[derive(Serialize)]
struct Invocation {
    command: String,
    args: Vec<String>,
    format: String,
}

#[derive(Serialize)]
struct InputInfo {
    path: String,
    sha256: String,
}

#[derive(Serialize)]
struct ErrorJson {
    kind: String,
    message: String,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tool error: {err}");
            2
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let started_at = Utc::now();
    let timer = Instant::now();

    let (command, args, file, module_filter) = match &cli.command {
        Command::Extract { file } => (
            "extract".to_string(),
            vec![file.to_string_lossy().to_string()],
            file.clone(),
            None,
        ),
        Command::Procs { module, file } => (
            "procs".to_string(),
            vec![file.to_string_lossy().to_string()],
            file.clone(),
            module.clone(),
        ),
    };

    let inputs = build_inputs(&file);
    let (status, imports, diagnostics, error) = run_extract(&file, module_filter.as_deref());
    let exit_code = match status {
        Status::Pass => 0,
        Status::Error => 2,
    };

    let finished_at = Utc::now();
    let duration_ms = timer.elapsed().as_millis() as u64;

    let result = ResultJson {
        schema_version: "0.1".to_string(),
        tool: ToolInfo {
            name: "occdox".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_sha: std::env::var("OCCDOX_GIT_SHA").unwrap_or_else(|_| "UNKNOWN".to_string()),
        },
        invocation: Invocation {
            command,
            args,
            format: match cli.format {
                OutputFormat::Json => "json".to_string(),
                OutputFormat::Text => "text".to_string(),
            },
        },
        inputs,
        status,
        exit_code,
        started_at: started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        finished_at: finished_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        duration_ms,
        imports,
        diagnostics,
        error,
    };

    match cli.format {
        OutputFormat::Json => emit_json(&result, cli.output.as_deref()),
        OutputFormat::Text => emit_text(&result, cli.output.as_deref()),
    }?;

    Ok(exit_code)
}

fn run_extract(
    file: &Path,
    module_filter: Option<&str>,
) -> (Status, Vec<Import>, Vec<Diagnostic>, Option<ErrorJson>) {
    match OccdocReader::default().read_path(file) {
        Ok(output) => {
            let imports = match module_filter {
                Some(module) => output
                    .imports
                    .into_iter()
                    .filter(|import| import.module_name == module)
                    .collect(),
                None => output.imports,
            };
            (Status::Pass, imports, output.diagnostics, None)
        }
        Err(err) => (
            Status::Error,
            Vec::new(),
            Vec::new(),
            Some(error_json(&err)),
        ),
    }
}

fn error_json(err: &ReadError) -> ErrorJson {
    ErrorJson {
        kind: match err.kind {
            ReadErrorKind::Io => "io".to_string(),
            ReadErrorKind::Malformed => "malformed".to_string(),
        },
        message: err.to_string(),
    }
}

fn build_inputs(path: &Path) -> Vec<InputInfo> {
    let sha256 = compute_sha256(path).unwrap_or_else(|| "UNKNOWN".to_string());
    vec![InputInfo {
        path: path.to_string_lossy().to_string(),
        sha256,
    }]
}

fn compute_sha256(path: &Path) -> Option<String> {
    let data = fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Some(hex::encode(hasher.finalize()))
}

fn emit_json(result: &ResultJson, output: Option<&Path>) -> Result<()> {
    let payload = serde_json::to_string_pretty(result).context("serialize result json")?;
    if let Some(path) = output {
        write_atomic(path, payload.as_bytes())?;
        return Ok(());
    }

    println!("{payload}");
    Ok(())
}

fn emit_text(result: &ResultJson, output: Option<&Path>) -> Result<()> {
    let mut lines = String::new();
    for import in &result.imports {
        for proc in &import.procedures {
            lines.push_str(&format!("{} {proc}\n", import.module_name));
        }
    }
    let procedures: usize = result.imports.iter().map(|i| i.procedures.len()).sum();
    lines.push_str(&format!(
        "status={} exit_code={} imports={} procedures={} diagnostics={}",
        status_label(&result.status),
        result.exit_code,
        result.imports.len(),
        procedures,
        result.diagnostics.len()
    ));

    if let Some(path) = output {
        write_atomic(path, lines.as_bytes())?;
        return Ok(());
    }
    println!("{lines}");
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("rename {}", path.display()))?;
    Ok(())
}

fn status_label(status: &Status) -> &'static str {
    match status {
        Status::Pass => "pass",
        Status::Error => "error",
    }
}
