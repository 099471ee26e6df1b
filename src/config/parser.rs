use super::Config;
use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;

/// Files at or above this size are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 4096;

/// Parse and validate a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, is not valid
/// TOML, or holds values that fail validation.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat config file: {}", path.display()))?;

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config_str(&content)
    } else {
        // Long ignore lists
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and dropped before returning
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let content = simdutf8::basic::from_utf8(&mmap)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in config file: {}", e))?;

        parse_config_str(content)
    }
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a value fails validation.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.scan.interval()?.is_zero() {
        anyhow::bail!("Scan interval must be greater than zero");
    }

    for pattern in &config.scan.ignore_patterns {
        glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid ignore pattern: {pattern}"))?;
    }

    Ok(())
}
