use std::path::{Path, PathBuf};
use tracing::info;

use super::{CommandError, CommandResult};
use crate::config::AppSettings;

pub fn get_settings(path: &Path) -> CommandResult<AppSettings> {
    Ok(AppSettings::load(path)?)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> CommandResult<()> {
    settings.save(path)?;
    info!("Saved settings to {:?}", path);
    Ok(())
}

/// Write a default settings file, refusing to overwrite unless `force`
pub fn init_settings(path: &Path, force: bool) -> CommandResult<PathBuf> {
    if path.exists() && !force {
        return Err(CommandError::InvalidInput(format!(
            "settings already exist at {}; pass --force to overwrite",
            path.display()
        )));
    }
    save_settings(path, &AppSettings::default())?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        init_settings(&path, false).unwrap();
        assert_eq!(get_settings(&path).unwrap(), AppSettings::default());

        assert!(matches!(
            init_settings(&path, false),
            Err(CommandError::InvalidInput(_))
        ));
        init_settings(&path, true).unwrap();
    }
}
