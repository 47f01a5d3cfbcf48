use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

/// Commented starter config written by `mmr-climb init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# mmr-climb configuration
#
# Any value here can be overridden on the command line, e.g.
#   mmr-climb --current-mmr 310 games --winrate 0.55

profile:
  # Rating points between two divisions
  mmr_per_division: 100
  # Your rating right now
  current_mmr: 250
  # How many divisions you want to climb
  divisions: 5
  # Rating gained per win
  win_mmr: 20
  # Rating change per loss. Negative when a loss costs rating.
  loss_mmr: -15
"#;

/// Write the default config template to `path`.
///
/// Refuses to replace an existing file unless `force` is set. The write is
/// atomic, so an interrupted run never leaves a half-written config behind.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite it.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())
        .context("Failed to write config template")?;
    file.commit()
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
