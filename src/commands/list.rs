use crate::DirsnapContext;
use crate::output;
use crate::snapshot::read_snapshot;
use anyhow::Result;
use std::path::Path;

/// Print one snapshot of `dir`.
///
/// # Errors
///
/// Returns an error if the ignore patterns are invalid or the directory
/// cannot be listed.
pub fn execute(ctx: &DirsnapContext, dir: &Path) -> Result<()> {
    let options = ctx.list_options()?;
    let snapshot = read_snapshot(dir, None, &options)?;

    output::snapshot(&snapshot);
    output::info(&format!(
        "{} entries in {}",
        snapshot.len(),
        dir.display()
    ));

    Ok(())
}
