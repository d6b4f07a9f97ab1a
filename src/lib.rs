//! figrbx Library
//!
//! Compiles a design-tool export manifest into a native Roblox GUI model
//! (`.rbxmx`). Visual content the engine cannot draw natively is rasterized
//! upstream, identified by content hash, uploaded once and referenced by
//! asset id.
//!
//! # Module Overview
//!
//! - [`types`] - Design tree, manifest and snapshot types
//! - [`classify`] - Per-node render strategy
//! - [`overrides`] - Name-based rules (flatten, interactive, stretch)
//! - [`stroke`] - Collapse of text layers stacked to fake an outline
//! - [`plan`] - Raster, underlay and shadow planning
//! - [`assets`] - Content hashing, asset cache and upload client
//! - [`diff`] - Structural diff against the previous snapshot
//! - [`geometry`] - Absolute design coordinates to relative engine geometry
//! - [`assemble`] - Emission of the instance tree
//! - [`rbxmx`] - Instance arena and XML serialization
//! - [`pipeline`] - One full compile run
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use figrbx_lib::{compile, AssetCache, Config, Manifest, NoUploader};
//!
//! # async fn example() -> figrbx_lib::Result<()> {
//! let manifest = Manifest::load("export.json".as_ref())?;
//! let mut cache = AssetCache::load("assets.json".as_ref())?;
//! let result = compile(manifest, None, &mut cache, &NoUploader, &Config::default()).await?;
//! println!("{}", result.document);
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod assets;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod fsutil;
pub mod geometry;
pub mod hashing;
pub mod output;
pub mod overrides;
pub mod pipeline;
pub mod plan;
pub mod rbxmx;
pub mod stroke;
pub mod types;

pub use assemble::assemble;
pub use assets::{AssetCache, AssetUploader, EnvUploader, NoUploader, OpenCloudClient, UploadStatus};
pub use classify::{classify, Classification, Strategy};
pub use config::Config;
pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use diff::{diff, DiffCounts, DiffResult};
pub use error::{CompileError, Result};
pub use output::{CliOutput, CompileOutput, DiffOutput, ErrorOutput, FIGRBX_OUTPUT_VERSION};
pub use overrides::RuleSet;
pub use pipeline::{compile, diff_manifest, CompileReport, Compilation};
pub use rbxmx::Arena;
pub use types::{DesignNode, Manifest, Snapshot};
