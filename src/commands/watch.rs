use crate::DirsnapContext;
use crate::output;
use crate::watcher::DirectoryWatcher;
use anyhow::Result;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Poll `dir` and print every change.
///
/// `interval` overrides the configured rescan delay. With `count` set the
/// loop stops after that many rescans; otherwise it runs until killed.
/// A failed rescan is reported and retried on the next tick.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the initial listing
/// of `dir` fails.
pub fn execute(
    ctx: &DirsnapContext,
    dir: &Path,
    interval: Option<Duration>,
    count: Option<u64>,
) -> Result<()> {
    let interval = match interval {
        Some(interval) => interval,
        None => ctx.config.scan.interval()?,
    };
    let mut watcher = DirectoryWatcher::new(dir, ctx.list_options()?)?;

    output::info(&format!(
        "Watching {} ({} entries, every {})",
        dir.display(),
        watcher.snapshot().len(),
        humantime::format_duration(interval)
    ));

    let mut scans = 0u64;
    while count.is_none_or(|limit| scans < limit) {
        thread::sleep(interval);
        scans += 1;

        match watcher.rescan() {
            Ok(events) => {
                for event in &events {
                    output::event(event);
                }
            }
            Err(e) => {
                warn!(error = %e, "Rescan failed");
                output::warning(&format!("Rescan of {} failed: {e:#}", dir.display()));
            }
        }
    }

    Ok(())
}
