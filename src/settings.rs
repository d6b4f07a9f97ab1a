use std::path::Path;

use figrbx_lib::config::TextExportMode;
use figrbx_lib::{CompileError, Config};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/figrbx/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, CompileError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        CompileError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        CompileError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let text_mode = match config.text.mode {
        TextExportMode::Plain => "plain",
        TextExportMode::Rich => "rich",
    };
    format!(
        "Effective config [{source}]: overrides={}, stroke: radius={:.1}, spread={:.1}, min_group={}, upload: type={}, poll={}ms x{}, delay={}ms, text: mode={}, default_font={}",
        config.overrides.len(),
        config.stroke.cluster_radius,
        config.stroke.max_spread,
        config.stroke.min_group,
        config.upload.asset_type,
        config.upload.poll_interval.as_millis(),
        config.upload.max_poll_attempts,
        config.upload.inter_upload_delay.as_millis(),
        text_mode,
        config.text.default_font,
    )
}
