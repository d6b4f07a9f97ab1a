use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "figrbx")]
#[command(
    version,
    about = "Compile design exports into native Roblox GUI models",
    long_about = "figrbx\n\nModes:\n- compile: turn an export manifest into an .rbxmx model, uploading rasterized content that is not cached yet.\n- diff: report which nodes changed since the previous export snapshot.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for classification, overrides, stroke thresholds, upload and text settings"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile an export manifest into an .rbxmx model
    Compile {
        #[arg(long, help = "Export manifest (JSON)")]
        manifest: PathBuf,

        #[arg(
            long,
            short,
            help = "Path for the .rbxmx model (embedded in the report if omitted)"
        )]
        output: Option<PathBuf>,

        #[arg(
            long,
            default_value = "figrbx-assets.json",
            value_name = "PATH",
            help = "Asset cache mapping content hashes to uploaded asset ids"
        )]
        cache: PathBuf,

        #[arg(
            long,
            value_name = "PATH",
            help = "Snapshot from the previous export; unchanged nodes reuse its asset ids"
        )]
        previous: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Where to write the snapshot of this export (defaults to --previous)"
        )]
        snapshot_out: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Report format")]
        format: OutputFormat,
    },
    /// Compare a manifest against the previous export snapshot
    Diff {
        #[arg(long, help = "Export manifest (JSON)")]
        manifest: PathBuf,

        #[arg(long, value_name = "PATH", help = "Snapshot from the previous export")]
        previous: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Report format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn compile_command_uses_defaults() {
        let cli = Cli::parse_from(["figrbx", "compile", "--manifest", "export.json"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Compile {
                manifest,
                output,
                cache,
                previous,
                snapshot_out,
                format,
            } => {
                assert_eq!(manifest, PathBuf::from("export.json"));
                assert!(output.is_none());
                assert_eq!(cache, PathBuf::from("figrbx-assets.json"));
                assert!(previous.is_none());
                assert!(snapshot_out.is_none());
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected compile command"),
        }
    }

    #[test]
    fn compile_command_parses_all_paths() {
        let cli = Cli::parse_from([
            "figrbx",
            "--config",
            "figrbx.toml",
            "compile",
            "--manifest",
            "m.json",
            "-o",
            "out.rbxmx",
            "--cache",
            "c.json",
            "--previous",
            "prev.json",
            "--snapshot-out",
            "next.json",
            "--format",
            "pretty",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("figrbx.toml")));
        match cli.command {
            Commands::Compile {
                output,
                cache,
                previous,
                snapshot_out,
                format,
                ..
            } => {
                assert_eq!(output, Some(PathBuf::from("out.rbxmx")));
                assert_eq!(cache, PathBuf::from("c.json"));
                assert_eq!(previous, Some(PathBuf::from("prev.json")));
                assert_eq!(snapshot_out, Some(PathBuf::from("next.json")));
                assert!(matches!(format, OutputFormat::Pretty));
            }
            _ => panic!("expected compile command"),
        }
    }

    #[test]
    fn diff_command_accepts_global_verbose() {
        let cli = Cli::parse_from([
            "figrbx",
            "--verbose",
            "diff",
            "--manifest",
            "m.json",
            "--previous",
            "prev.json",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Diff {
                manifest, previous, ..
            } => {
                assert_eq!(manifest, PathBuf::from("m.json"));
                assert_eq!(previous, Some(PathBuf::from("prev.json")));
            }
            _ => panic!("expected diff command"),
        }
    }
}
