//! One compile run: manifest in, `.rbxmx` document and next snapshot out.
//!
//! Stages run in a fixed order and any error aborts the run before output
//! exists. The only suspending stage is asset resolution.

use serde::Serialize;

use crate::assemble::assemble;
use crate::assets::{resolve_all, AssetCache, AssetUploader, UploadJob};
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::diff::{apply_reuse, build_snapshot, diff, DiffResult};
use crate::overrides::RuleSet;
use crate::plan;
use crate::stroke::{self, StrokeReport};
use crate::types::{DesignNode, Manifest, Snapshot};
use crate::{CompileError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileReport {
    pub root_name: String,
    pub instances: usize,
    /// Distinct content hashes the output refers to.
    pub required_assets: usize,
    /// Hashes uploaded during this run, in upload order.
    pub uploaded: Vec<String>,
    pub cache_hits: usize,
    /// Raster references filled from the previous snapshot.
    pub reused: usize,
    pub stroke_groups: usize,
    pub stroke_duplicates: usize,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct Compilation {
    pub document: String,
    pub diff: DiffResult,
    pub snapshot: Snapshot,
    pub report: CompileReport,
}

/// Compile a manifest. `cache` is updated (and persisted, when file-backed)
/// after every successful upload, even if a later stage fails.
pub async fn compile<U: AssetUploader>(
    mut manifest: Manifest,
    previous: Option<&Snapshot>,
    cache: &mut AssetCache,
    uploader: &U,
    config: &Config,
) -> Result<Compilation> {
    let rules = RuleSet::from_config(config)?;
    let mut diag = Diagnostics::new();
    let mut root = manifest.take_root()?;
    tracing::debug!(root = %root.id, name = %root.name, "compiling design tree");

    rules.apply_structural(&mut root);
    let StrokeReport {
        groups_collapsed,
        duplicates_marked,
    } = stroke::resolve(&mut root, &config.stroke);

    plan::annotate(&mut root, &rules, &mut diag)?;
    let diff_result = diff(&root, previous)?;
    let reused = apply_reuse(&mut root, &diff_result.reuse);

    let jobs = plan::pending_jobs(&root);
    check_declared_hashes(&manifest, &root, &jobs, cache)?;

    let outcome = resolve_all(
        &jobs,
        &manifest.raw_content_by_hash,
        cache,
        uploader,
        &config.upload,
    )
    .await?;
    plan::apply_assets(&mut root, &|hash| outcome.resolved.get(hash).cloned());

    let arena = assemble(&root, &rules, &config.text, &mut diag)?;
    let document = arena.to_rbxmx();
    let snapshot = build_snapshot(&root)?;

    let report = CompileReport {
        root_name: root.name.clone(),
        instances: arena.len(),
        required_assets: plan::required_hashes(&root).len(),
        uploaded: outcome.uploaded,
        cache_hits: outcome.cache_hits,
        reused,
        stroke_groups: groups_collapsed,
        stroke_duplicates: duplicates_marked,
        warnings: diag.into_warnings(),
    };
    tracing::info!(
        instances = report.instances,
        uploaded = report.uploaded.len(),
        cache_hits = report.cache_hits,
        reused = report.reused,
        warnings = report.warnings.len(),
        "compile finished"
    );
    Ok(Compilation {
        document,
        diff: diff_result,
        snapshot,
        report,
    })
}

/// Every hash the manifest declares as unresolved must be obtainable: cached,
/// carried over from the previous export, or shipped as raw content.
fn check_declared_hashes(
    manifest: &Manifest,
    root: &DesignNode,
    jobs: &[UploadJob],
    cache: &AssetCache,
) -> Result<()> {
    let required = plan::required_hashes(root);
    for hash in &manifest.unresolved_content_hashes {
        let job = jobs.iter().find(|j| &j.hash == hash);
        let reused = job.is_none() && required.contains(hash);
        if reused
            || cache.asset_id(hash).is_some()
            || manifest.raw_content_by_hash.contains_key(hash)
        {
            continue;
        }
        return Err(CompileError::MissingRawContent {
            hash: hash.clone(),
            node: job
                .map(|j| j.node_id.clone())
                .unwrap_or_else(|| "unresolvedContentHashes".to_string()),
        });
    }
    Ok(())
}

/// Diff a manifest against a snapshot without resolving or emitting anything.
pub fn diff_manifest(
    mut manifest: Manifest,
    previous: Option<&Snapshot>,
    config: &Config,
) -> Result<DiffResult> {
    let rules = RuleSet::from_config(config)?;
    let mut root = manifest.take_root()?;
    rules.apply_structural(&mut root);
    stroke::resolve(&mut root, &config.stroke);
    plan::annotate(&mut root, &rules, &mut Diagnostics::new())?;
    diff(&root, previous)
}
