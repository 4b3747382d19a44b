//! Configuration types for a screenshot-and-bind run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial to
//! share configs across workers and to diff two runs to understand why their
//! outputs differ.

use crate::error::Snap2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one snap2pdf run.
///
/// Built via [`RunConfig::builder()`] or using [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use snap2pdf::RunConfig;
///
/// let config = RunConfig::builder()
///     .src("urls.csv")
///     .dst("merged.pdf")
///     .workers(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// URL-list source: a file path, an HTTP(S) URL, or `-` for stdin.
    /// Default: `-`.
    pub src: String,

    /// Destination path for the merged PDF. Default: `output.pdf`.
    pub dst: PathBuf,

    /// Working directory for intermediate images and per-URL PDFs.
    ///
    /// `None` (the default) creates a fresh temporary directory per run.
    /// Pointing this at an existing directory turns it into a persistent
    /// cache: artifacts already present there are never regenerated. The
    /// cache contract is existence-only — a present file is trusted as-is,
    /// with no content validation and no expiry.
    pub temp: Option<PathBuf>,

    /// Number of concurrent URL jobs. Default: 10.
    ///
    /// Each job runs two external processes back to back, so the real bound
    /// on host load is `workers` simultaneous headless-browser instances.
    /// Lower this if the screenshot tool starts timing out under load.
    pub workers: usize,

    /// Name of the CSV column holding the URLs. Default: `url`.
    pub column: String,

    /// CSS selector passed to the screenshot tool. Default: `#content`.
    pub selector: String,

    /// Pixel padding around the selector. Default: 16.
    pub padding: u32,

    /// Order in which per-URL PDFs are concatenated. Default: input order.
    pub merge_order: MergeOrder,

    /// Screenshot-capture executable. Default: `shot-scraper`.
    pub screenshot_tool: String,

    /// Image-to-PDF conversion executable. Default: `convert` (ImageMagick).
    pub convert_tool: String,

    /// PDF-concatenation executable. Default: `pdftk`.
    pub merge_tool: String,

    /// Download timeout for remote URL lists, in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-job progress events (used by the CLI progress bar).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            src: "-".to_string(),
            dst: PathBuf::from("output.pdf"),
            temp: None,
            workers: 10,
            column: "url".to_string(),
            selector: "#content".to_string(),
            padding: 16,
            merge_order: MergeOrder::default(),
            screenshot_tool: "shot-scraper".to_string(),
            convert_tool: "convert".to_string(),
            merge_tool: "pdftk".to_string(),
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("temp", &self.temp)
            .field("workers", &self.workers)
            .field("column", &self.column)
            .field("selector", &self.selector)
            .field("padding", &self.padding)
            .field("merge_order", &self.merge_order)
            .field("screenshot_tool", &self.screenshot_tool)
            .field("convert_tool", &self.convert_tool)
            .field("merge_tool", &self.merge_tool)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.config.src = src.into();
        self
    }

    pub fn dst(mut self, dst: impl Into<PathBuf>) -> Self {
        self.config.dst = dst.into();
        self
    }

    pub fn temp(mut self, temp: impl Into<PathBuf>) -> Self {
        self.config.temp = Some(temp.into());
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = n;
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.config.column = column.into();
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.config.selector = selector.into();
        self
    }

    pub fn padding(mut self, px: u32) -> Self {
        self.config.padding = px;
        self
    }

    pub fn merge_order(mut self, order: MergeOrder) -> Self {
        self.config.merge_order = order;
        self
    }

    pub fn screenshot_tool(mut self, tool: impl Into<String>) -> Self {
        self.config.screenshot_tool = tool.into();
        self
    }

    pub fn convert_tool(mut self, tool: impl Into<String>) -> Self {
        self.config.convert_tool = tool.into();
        self
    }

    pub fn merge_tool(mut self, tool: impl Into<String>) -> Self {
        self.config.merge_tool = tool.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Snap2PdfError> {
        let c = &self.config;
        if c.workers == 0 {
            return Err(Snap2PdfError::InvalidConfig("workers must be ≥ 1".into()));
        }
        if c.column.trim().is_empty() {
            return Err(Snap2PdfError::InvalidConfig(
                "column name must not be empty".into(),
            ));
        }
        for (name, tool) in [
            ("screenshot", &c.screenshot_tool),
            ("convert", &c.convert_tool),
            ("merge", &c.merge_tool),
        ] {
            if tool.trim().is_empty() {
                return Err(Snap2PdfError::InvalidConfig(format!(
                    "{name} tool name must not be empty"
                )));
            }
        }
        Ok(self.config)
    }
}

/// Order in which per-URL PDFs are handed to the concatenation tool.
///
/// Globbing the working directory orders pages by URL hash — effectively
/// random with respect to the input list. `Input` avoids that by deriving
/// the file list from the URL list itself. `Directory` keeps globbing as an
/// explicit opt-in, useful for binding whatever a pre-populated cache
/// directory happens to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergeOrder {
    /// Concatenate in URL-list order (first occurrence wins for duplicates).
    #[default]
    Input,
    /// Concatenate every `*.pdf` in the working directory, lexicographically.
    Directory,
}
