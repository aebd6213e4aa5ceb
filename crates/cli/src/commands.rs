//! `userlink match`, `run` and `validate`: CSV in, annotated CSV out.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use userlink_cluster::{MatchMode, RunConfig, RunResult};
use userlink_io::{classify_columns, default_output_path, load_table, write_annotated};

use crate::CliError;

/// Output switches shared by `match` and `run`.
pub struct ReportOptions {
    pub json: bool,
    pub dry_run: bool,
    pub quiet: bool,
}

/// JSON output for a run: file paths plus the engine result.
#[derive(Serialize)]
struct JsonOutput<'a> {
    input: String,
    output: Option<String>,
    #[serde(flatten)]
    result: &'a RunResult,
}

pub fn cmd_match(
    mode: &str,
    input: PathBuf,
    output: Option<PathBuf>,
    id_column: String,
    opts: ReportOptions,
) -> Result<(), CliError> {
    // Mode first: an unsupported mode must fail before the input is touched.
    let mode: MatchMode = mode.parse()?;

    let mut config = RunConfig::new(mode, input.to_string_lossy());
    config.output = output.map(|p| p.to_string_lossy().into_owned());
    config.id_column = id_column;
    config.validate()?;

    execute(&config, Path::new(""), &opts)
}

pub fn cmd_run(config_path: PathBuf, opts: ReportOptions) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    execute(&config, base_dir, &opts)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let (input, output) = resolve_paths(&config, base_dir);

    eprintln!(
        "valid: {} match on {} -> {} (id column '{}')",
        config.mode,
        input.display(),
        output.display(),
        config.id_column,
    );
    if !config.columns.is_empty() {
        eprintln!(
            "  column overrides: email {:?}, phone {:?}",
            config.columns.email, config.columns.phone
        );
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<RunConfig, CliError> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read config {}: {e}", path.display())))?;
    Ok(RunConfig::from_toml(&config_str)?)
}

fn resolve_paths(config: &RunConfig, base_dir: &Path) -> (PathBuf, PathBuf) {
    let input = base_dir.join(&config.input);
    let output = match config.output {
        Some(ref output) => base_dir.join(output),
        None => default_output_path(&input),
    };
    (input, output)
}

/// Whether writing `output` would clobber `input`. Compares canonical paths;
/// an output that does not exist yet is compared through its canonical
/// parent directory.
fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    let Ok(input) = std::fs::canonicalize(input) else {
        // Missing input fails at load time
        return false;
    };
    if let Ok(output) = std::fs::canonicalize(output) {
        return input == output;
    }
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), output.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name) == input,
        _ => false,
    }
}

fn execute(config: &RunConfig, base_dir: &Path, opts: &ReportOptions) -> Result<(), CliError> {
    let (input_path, output_path) = resolve_paths(config, base_dir);
    log::debug!(
        "{} match: {} -> {}",
        config.mode,
        input_path.display(),
        output_path.display()
    );

    if same_file(&input_path, &output_path) {
        return Err(CliError::usage(format!(
            "output {} would overwrite the input",
            output_path.display()
        ))
        .with_hint("pass a different --output path"));
    }

    let mut table = load_table(&input_path)?;
    table.ensure_id_column_free(&config.id_column)?;

    let roles = classify_columns(&table.headers, &config.columns)?;
    table.normalize_values(&roles);

    let result = userlink_cluster::run(config, &table.records, &roles)?;

    let written = if opts.dry_run {
        None
    } else {
        write_annotated(&table, &result.assignments, &config.id_column, &output_path)?;
        Some(output_path)
    };

    if opts.json {
        let payload = JsonOutput {
            input: input_path.display().to_string(),
            output: written.as_ref().map(|p| p.display().to_string()),
            result: &result,
        };
        let json_str = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{json_str}").map_err(|e| CliError::output(e.to_string()))?;
    }

    if !opts.quiet {
        if let Some(ref path) = written {
            eprintln!("wrote {}", path.display());
        }
        let s = &result.summary;
        eprintln!(
            "{} records: {} groups, {} grouped, {} ungrouped",
            s.total_records, s.group_count, s.grouped_records, s.ungrouped_records,
        );
    }

    Ok(())
}
