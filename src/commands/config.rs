use crate::DirsnapContext;
use crate::output;
use anyhow::Result;

/// Print the effective configuration as TOML.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn execute(ctx: &DirsnapContext) -> Result<()> {
    output::info(&format!("# {}", ctx.config_path.display()));
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
