use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figrbx_lib::fsutil::write_atomic;
use figrbx_lib::{
    compile, AssetCache, CliOutput, CompileOutput, EnvUploader, Manifest, Result, Snapshot,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{format_effective_config, load_config};

/// Paths taken by the compile command.
pub struct CompilePaths {
    pub manifest: PathBuf,
    pub output: Option<PathBuf>,
    pub cache: PathBuf,
    pub previous: Option<PathBuf>,
    pub snapshot_out: Option<PathBuf>,
}

/// Run the compile command.
pub async fn run_compile(
    config_path: Option<PathBuf>,
    paths: CompilePaths,
    format: OutputFormat,
) -> ExitCode {
    match execute(config_path.as_deref(), paths).await {
        Ok(body) => {
            if let Err(err) = write_output(&body, format) {
                return render_error(figrbx_lib::CompileError::Config(err.to_string()), format);
            }
            ExitCode::SUCCESS
        }
        Err(err) => render_error(err, format),
    }
}

async fn execute(config_path: Option<&Path>, paths: CompilePaths) -> Result<CliOutput> {
    let config = load_config(config_path)?;
    tracing::debug!("{}", format_effective_config(&config, config_path));

    let manifest = Manifest::load(&paths.manifest)?;
    let previous = match &paths.previous {
        Some(path) => Snapshot::load(path)?,
        None => None,
    };
    if paths.previous.is_some() && previous.is_none() {
        tracing::info!("no previous snapshot found; every node counts as added");
    }
    let mut cache = AssetCache::load(&paths.cache)?;
    let uploader = EnvUploader::from_env(&config.upload)?;

    let compilation = compile(manifest, previous.as_ref(), &mut cache, &uploader, &config).await?;

    // Nothing is written until the whole run has succeeded.
    if let Some(path) = &paths.output {
        write_atomic(path, compilation.document.as_bytes())?;
        tracing::info!(path = %path.display(), "wrote model");
    }
    let snapshot_path = paths.snapshot_out.clone().or_else(|| paths.previous.clone());
    if let Some(path) = &snapshot_path {
        compilation.snapshot.save(path)?;
        tracing::debug!(path = %path.display(), "wrote snapshot");
    }

    let mut body = CompileOutput::from_report(paths.manifest, compilation.report, &compilation.diff);
    body.snapshot_path = snapshot_path;
    match paths.output {
        Some(path) => body.output_path = Some(path),
        None => body.document = Some(compilation.document),
    }
    Ok(CliOutput::Compile(body))
}
