//! Merge step: concatenate the per-URL PDFs into the destination file.
//!
//! ## Merge order
//!
//! Hash-derived filenames sort in an order that has nothing to do with the
//! input list, so "glob the directory" produces a document whose pages are
//! shuffled relative to the CSV. The default here derives the file list from
//! the URL list instead, making output order match input order. Directory
//! order survives as an explicit mode for binding a cache directory wholesale.

use crate::cancel::CancelToken;
use crate::config::{MergeOrder, RunConfig};
use crate::error::Snap2PdfError;
use crate::pipeline::exec::{self, ToolIo};
use crate::pipeline::job;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// PDF paths in URL-list order, deduplicated (first occurrence wins).
///
/// Duplicate URLs share one artifact; listing it twice would duplicate the
/// page in the bound output.
pub fn input_order_pdfs(urls: &[String], workdir: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter_map(|url| {
            let name = job::artifacts_for(url).pdf;
            seen.insert(name.clone()).then(|| workdir.join(name))
        })
        .collect()
}

/// Every `*.pdf` in the working directory, lexicographically.
pub fn directory_pdfs(workdir: &Path) -> Result<Vec<PathBuf>, Snap2PdfError> {
    let pattern = workdir.join("*.pdf");
    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| Snap2PdfError::ListPdfs {
        dir: workdir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Snap2PdfError::ListPdfs {
            dir: workdir.to_path_buf(),
            detail: e.to_string(),
        })?;
        pdfs.push(path);
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Resolve the merge list according to the configured order.
pub fn collect_pdfs(
    urls: &[String],
    workdir: &Path,
    order: MergeOrder,
) -> Result<Vec<PathBuf>, Snap2PdfError> {
    match order {
        MergeOrder::Input => Ok(input_order_pdfs(urls, workdir)),
        MergeOrder::Directory => directory_pdfs(workdir),
    }
}

/// Argument list for the concatenation tool: `<pdfs…> cat output <dst>`.
fn merge_args(pdfs: &[PathBuf], dst: &Path) -> Vec<String> {
    let mut args: Vec<String> = pdfs.iter().map(|p| p.display().to_string()).collect();
    args.push("cat".to_string());
    args.push("output".to_string());
    args.push(dst.display().to_string());
    args
}

/// Concatenate `pdfs` into `dst` with the configured merge tool.
///
/// Returns the number of files merged.
pub async fn merge(
    pdfs: &[PathBuf],
    workdir: &Path,
    config: &RunConfig,
    cancel: &CancelToken,
) -> Result<usize, Snap2PdfError> {
    if pdfs.is_empty() {
        return Err(Snap2PdfError::NothingToMerge {
            dir: workdir.to_path_buf(),
        });
    }

    let args = merge_args(pdfs, &config.dst);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    info!("merge {} pdfs into {:?}", pdfs.len(), config.dst);
    let status = exec::run_tool(
        &config.merge_tool,
        &arg_refs,
        None,
        ToolIo::Inherit,
        cancel,
    )
    .await?;
    if !status.success() {
        return Err(Snap2PdfError::MergeFailed {
            dst: config.dst.clone(),
            status,
        });
    }
    Ok(pdfs.len())
}
