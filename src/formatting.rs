use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use figrbx_lib::{CliOutput, CompileError, ErrorOutput, FIGRBX_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write the report to stdout in the requested format.
pub fn write_output(body: &CliOutput, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(body)?),
        OutputFormat::Pretty => write_pretty_output(body)?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: CompileError, format: OutputFormat) -> ExitCode {
    tracing::error!(error = %err, "run failed");
    let payload = CliOutput::Error(ErrorOutput {
        version: FIGRBX_OUTPUT_VERSION.to_string(),
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_pretty_output(body: &CliOutput) -> io::Result<()> {
    if io::stdout().is_terminal() {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Non-tty: keep JSON shape for pipelines.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    println!("{content}");
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &CliOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        CliOutput::Compile(out) => {
            let header = color("[COMPILE]", "32", colorize);
            writeln!(buf, "{} {} ({} instances)", header, out.root_name, out.instances).ok();
            if let Some(path) = &out.output_path {
                writeln!(buf, "Model: {}", path.display()).ok();
            }
            writeln!(
                buf,
                "Assets: {} required, {} uploaded, {} cached, {} reused",
                out.required_assets, out.uploaded, out.cache_hits, out.reused
            )
            .ok();
            writeln!(
                buf,
                "Diff: {} changed, {} unchanged, {} added, {} removed",
                out.diff.changed, out.diff.unchanged, out.diff.added, out.diff.removed
            )
            .ok();
            if out.stroke_groups > 0 {
                writeln!(buf, "Stroke groups collapsed: {}", out.stroke_groups).ok();
            }
            if !out.warnings.is_empty() {
                let label = color("Warnings:", "33", colorize);
                writeln!(buf, "{label}").ok();
                for warning in &out.warnings {
                    match &warning.node_id {
                        Some(id) => writeln!(buf, "- [{}] {}", id, warning.message).ok(),
                        None => writeln!(buf, "- {}", warning.message).ok(),
                    };
                }
            }
        }
        CliOutput::Diff(out) => {
            let header = color("[DIFF]", "36", colorize);
            writeln!(
                buf,
                "{} {} changed, {} unchanged, {} added, {} removed",
                header, out.counts.changed, out.counts.unchanged, out.counts.added, out.counts.removed
            )
            .ok();
            for (label, ids) in [
                ("Changed", &out.changed),
                ("Added", &out.added),
                ("Removed", &out.removed),
            ] {
                if !ids.is_empty() {
                    writeln!(buf, "{label}: {}", ids.join(", ")).ok();
                }
            }
        }
        CliOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
