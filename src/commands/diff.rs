use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figrbx_lib::{diff_manifest, CliOutput, DiffOutput, Manifest, Result, Snapshot};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the diff command.
pub fn run_diff(
    config_path: Option<PathBuf>,
    manifest: PathBuf,
    previous: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let body = match execute(config_path.as_deref(), manifest, previous) {
        Ok(body) => body,
        Err(err) => return render_error(err, format),
    };
    if let Err(err) = write_output(&body, format) {
        return render_error(figrbx_lib::CompileError::Config(err.to_string()), format);
    }
    ExitCode::SUCCESS
}

fn execute(
    config_path: Option<&Path>,
    manifest_path: PathBuf,
    previous_path: Option<PathBuf>,
) -> Result<CliOutput> {
    let config = load_config(config_path)?;
    let manifest = Manifest::load(&manifest_path)?;
    let previous = match &previous_path {
        Some(path) => Snapshot::load(path)?,
        None => None,
    };
    let result = diff_manifest(manifest, previous.as_ref(), &config)?;
    tracing::debug!(
        changed = result.changed.len(),
        added = result.added.len(),
        removed = result.removed.len(),
        "diff computed"
    );
    Ok(CliOutput::Diff(DiffOutput::new(
        manifest_path,
        previous_path,
        &result,
    )))
}
