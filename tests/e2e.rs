//! End-to-end tests for snap2pdf.
//!
//! The three external tools are replaced with small shell-script stubs that
//! record their invocations and create the files a real tool would, so the
//! whole orchestration path — CSV → bounded jobs → cache probes → merge —
//! runs for real without a browser, ImageMagick, or pdftk installed.
//!
//! Unix-only: the stubs are `#!/bin/sh` scripts.

#![cfg(unix)]

use snap2pdf::pipeline::job::artifacts_for;
use snap2pdf::{run, CancelToken, MergeOrder, RunConfig, Snap2PdfError};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write an executable `#!/bin/sh` stub and return its path.
fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// A screenshot stub: finds its `--output` argument, creates that file in
/// the cwd (the working directory), and appends to `shots.log`.
const SHOT_STUB: &str = r#"out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  prev="$a"
done
echo shot >> shots.log
: > "$out"
"#;

/// A convert stub: `convert <png> <pdf>` — creates the pdf, logs the call.
const CONVERT_STUB: &str = r#"echo conv >> converts.log
: > "$2"
"#;

/// A merge stub: `pdftk <pdfs…> cat output <dst>` — records the full argv
/// next to the destination and creates the destination.
const MERGE_STUB: &str = r#"for a in "$@"; do dst="$a"; done
printf '%s\n' "$@" > "$dst.args"
: > "$dst"
"#;

struct Fixture {
    /// Holds stub binaries, the CSV, the workdir, and the destination.
    root: tempfile::TempDir,
    workdir: PathBuf,
    dst: PathBuf,
    csv: PathBuf,
}

impl Fixture {
    fn new(urls: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let workdir = root.path().join("work");
        std::fs::create_dir(&workdir).unwrap();
        let dst = root.path().join("bound.pdf");

        let mut body = String::from("title,url\n");
        for (i, url) in urls.iter().enumerate() {
            body.push_str(&format!("row{i},{url}\n"));
        }
        let csv = root.path().join("urls.csv");
        std::fs::write(&csv, body).unwrap();

        Self {
            root,
            workdir,
            dst,
            csv,
        }
    }

    /// Standard well-behaved stub set.
    fn stub_tools(&self) -> (PathBuf, PathBuf, PathBuf) {
        (
            write_stub(self.root.path(), "shot-stub", SHOT_STUB),
            write_stub(self.root.path(), "convert-stub", CONVERT_STUB),
            write_stub(self.root.path(), "merge-stub", MERGE_STUB),
        )
    }

    fn config(&self) -> snap2pdf::RunConfigBuilder {
        let (shot, convert, merge) = self.stub_tools();
        RunConfig::builder()
            .src(self.csv.to_string_lossy().to_string())
            .dst(&self.dst)
            .temp(&self.workdir)
            .screenshot_tool(shot.to_string_lossy().to_string())
            .convert_tool(convert.to_string_lossy().to_string())
            .merge_tool(merge.to_string_lossy().to_string())
    }

    fn shot_count(&self) -> usize {
        log_lines(&self.workdir.join("shots.log"))
    }

    fn convert_count(&self) -> usize {
        log_lines(&self.workdir.join("converts.log"))
    }

    /// Files with the given extension in the working directory.
    fn artifacts(&self, ext: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = std::fs::read_dir(&self.workdir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().map(|x| x == ext).unwrap_or(false))
            .collect();
        found.sort();
        found
    }
}

fn log_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

const URLS: [&str; 3] = [
    "https://example.com/first",
    "https://example.com/second",
    "https://example.com/third",
];

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn three_urls_produce_destination_and_six_artifacts() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().build().unwrap();

    let output = run(&config, &CancelToken::new()).await.expect("run");

    assert!(fx.dst.exists(), "destination PDF must be written");
    assert_eq!(fx.artifacts("png").len(), 3, "one png per url");
    // The merge stub's dst is outside the workdir, so exactly the three
    // per-url pdfs remain there.
    assert_eq!(fx.artifacts("pdf").len(), 3, "one pdf per url");

    assert_eq!(output.stats.urls, 3);
    assert_eq!(output.stats.captured, 3);
    assert_eq!(output.stats.converted, 3);
    assert_eq!(output.stats.cached_images, 0);
    assert_eq!(output.stats.cached_pdfs, 0);
    assert_eq!(output.stats.merged_files, 3);
}

#[tokio::test]
async fn merge_receives_pdfs_in_input_order() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().build().unwrap();

    run(&config, &CancelToken::new()).await.expect("run");

    let argv = std::fs::read_to_string(format!("{}.args", fx.dst.display())).unwrap();
    let args: Vec<&str> = argv.lines().collect();

    let expected: Vec<String> = URLS
        .iter()
        .map(|u| fx.workdir.join(artifacts_for(u).pdf).display().to_string())
        .collect();
    assert_eq!(&args[..3], expected.as_slice(), "input order, not hash order");
    let dst_str = fx.dst.display().to_string();
    assert_eq!(&args[3..], ["cat", "output", dst_str.as_str()]);
}

#[tokio::test]
async fn directory_order_merges_lexicographically() {
    let fx = Fixture::new(&URLS);
    let config = fx
        .config()
        .merge_order(MergeOrder::Directory)
        .build()
        .unwrap();

    run(&config, &CancelToken::new()).await.expect("run");

    let argv = std::fs::read_to_string(format!("{}.args", fx.dst.display())).unwrap();
    let pdf_args: Vec<&str> = argv.lines().take_while(|l| *l != "cat").collect();
    let mut sorted = pdf_args.clone();
    sorted.sort();
    assert_eq!(pdf_args, sorted, "directory mode must sort by filename");
    assert_eq!(pdf_args.len(), 3);
}

// ── Cache behaviour ──────────────────────────────────────────────────────────

#[tokio::test]
async fn second_run_invokes_no_per_url_tools() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().build().unwrap();

    let first = run(&config, &CancelToken::new()).await.expect("first run");
    assert_eq!(first.stats.captured, 3);
    assert_eq!(fx.shot_count(), 3);
    assert_eq!(fx.convert_count(), 3);

    let second = run(&config, &CancelToken::new()).await.expect("second run");
    assert_eq!(second.stats.captured, 0);
    assert_eq!(second.stats.converted, 0);
    assert_eq!(second.stats.cached_images, 3);
    assert_eq!(second.stats.cached_pdfs, 3);

    // The logs did not grow: not a single extra tool invocation.
    assert_eq!(fx.shot_count(), 3);
    assert_eq!(fx.convert_count(), 3);
    // The merge still ran.
    assert_eq!(second.stats.merged_files, 3);
}

#[tokio::test]
async fn prepopulated_cache_is_trusted_without_validation() {
    let fx = Fixture::new(&URLS);
    // Plant all artifacts by hand; wire the per-url tools to `false` so any
    // invocation fails the run.
    for url in URLS {
        let a = artifacts_for(url);
        std::fs::write(fx.workdir.join(&a.image), b"not really a png").unwrap();
        std::fs::write(fx.workdir.join(&a.pdf), b"not really a pdf").unwrap();
    }
    let config = fx
        .config()
        .screenshot_tool("false")
        .convert_tool("false")
        .build()
        .unwrap();

    let output = run(&config, &CancelToken::new())
        .await
        .expect("fully cached run must not touch the per-url tools");
    assert_eq!(output.stats.cached_images, 3);
    assert_eq!(output.stats.cached_pdfs, 3);
    assert!(fx.dst.exists());
}

#[tokio::test]
async fn duplicate_urls_share_one_artifact_and_one_page() {
    let fx = Fixture::new(&[
        "https://example.com/same",
        "https://example.com/same",
        "https://example.com/other",
    ]);
    // workers(1) so the duplicate's second job sees the first one's files.
    let config = fx.config().workers(1).build().unwrap();

    let output = run(&config, &CancelToken::new()).await.expect("run");

    assert_eq!(output.stats.urls, 3);
    assert_eq!(output.stats.captured, 2, "duplicate url hits the cache");
    assert_eq!(output.stats.cached_images, 1);
    assert_eq!(fx.artifacts("pdf").len(), 2);
    assert_eq!(output.stats.merged_files, 2, "merge list is deduplicated");
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_column_fails_before_any_tool_runs() {
    let fx = Fixture::new(&[]);
    std::fs::write(&fx.csv, "link,title\nhttps://example.com,first\n").unwrap();

    let config = fx.config().build().unwrap();
    let err = run(&config, &CancelToken::new()).await.unwrap_err();

    assert!(matches!(err, Snap2PdfError::ColumnMissing { .. }));
    assert_eq!(fx.shot_count(), 0, "no tool may run on a bad input");
    assert!(!fx.dst.exists());
}

#[tokio::test]
async fn empty_url_list_is_an_error() {
    let fx = Fixture::new(&[]);
    let config = fx.config().build().unwrap();
    let err = run(&config, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Snap2PdfError::NoUrls { .. }));
}

#[tokio::test]
async fn screenshot_failure_aborts_run_without_destination() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().screenshot_tool("false").build().unwrap();

    let err = run(&config, &CancelToken::new()).await.unwrap_err();

    assert!(matches!(err, Snap2PdfError::ScreenshotFailed { .. }));
    assert!(!fx.dst.exists(), "no destination on a failed batch");
    assert_eq!(
        fx.artifacts("pdf").len(),
        0,
        "a url whose screenshot failed must produce no pdf"
    );
}

#[tokio::test]
async fn convert_failure_aborts_run() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().convert_tool("false").build().unwrap();

    let err = run(&config, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Snap2PdfError::ConvertFailed { .. }));
    assert!(!fx.dst.exists());
}

#[tokio::test]
async fn merge_failure_is_fatal() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().merge_tool("false").build().unwrap();

    let err = run(&config, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Snap2PdfError::MergeFailed { .. }));
}

#[tokio::test]
async fn source_file_missing_is_reported() {
    let fx = Fixture::new(&URLS);
    let config = fx
        .config()
        .src("/definitely/not/a/real/list.csv")
        .build()
        .unwrap();
    let err = run(&config, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Snap2PdfError::SourceNotFound { .. }));
}

// ── Cancellation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn pre_cancelled_token_runs_nothing() {
    let fx = Fixture::new(&URLS);
    let config = fx.config().build().unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();

    let err = run(&config, &cancel).await.unwrap_err();
    assert!(matches!(err, Snap2PdfError::Cancelled));
    assert_eq!(fx.shot_count(), 0);
    assert!(!fx.dst.exists());
}

// ── Concurrency bound ────────────────────────────────────────────────────────

/// A screenshot stub that detects overlapping invocations via a lock file.
const OVERLAP_STUB: &str = r#"if [ -e inflight ]; then : > overlap; fi
: > inflight
sleep 0.2
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  prev="$a"
done
: > "$out"
rm -f inflight
"#;

#[tokio::test]
async fn workers_one_never_overlaps_tool_invocations() {
    let fx = Fixture::new(&URLS);
    let shot = write_stub(fx.root.path(), "overlap-stub", OVERLAP_STUB);
    let config = fx
        .config()
        .screenshot_tool(shot.to_string_lossy().to_string())
        .workers(1)
        .build()
        .unwrap();

    run(&config, &CancelToken::new()).await.expect("run");

    assert!(
        !fx.workdir.join("overlap").exists(),
        "workers=1 must serialise external processes"
    );
}
