use anyhow::{Context, Result, bail};
use simpleopt::ParserConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "simpleopt.json";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: ParserConfig,
}

/// Load and validate a parser configuration.
///
/// Without an explicit path, `simpleopt.json` in the current directory is used.
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let path = match config_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_CONFIG_NAME),
    };

    if !path.exists() {
        bail!(
            "parser config not found: {} (run `simpleopt init` to create one)",
            path.display()
        );
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read parser config: {}", path.display()))?;
    let config: ParserConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse parser config JSON: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid parser config: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded parser config");
    Ok(LoadedConfig { path, config })
}

/// Write the sample configuration into `dir`.
///
/// Returns the destination and whether it was written. An existing file is
/// left alone unless `overwrite` is set.
pub fn write_default_config(dir: &Path, overwrite: bool) -> Result<(PathBuf, bool)> {
    let dest = dir.join(DEFAULT_CONFIG_NAME);
    if dest.exists() && !overwrite {
        return Ok((dest, false));
    }

    let bytes = serde_json::to_vec_pretty(&ParserConfig::demo())
        .context("failed to serialize parser config")?;
    let mut out = String::from_utf8(bytes).context("parser config is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok((dest, true))
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
