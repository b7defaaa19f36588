//! Configuration file lookup and loading

use blobs2d_core::EngineConfig;
use directories::ProjectDirs;
use std::path::PathBuf;

const LOCAL_CONFIG_FILE: &str = "blobs2d.json";
const USER_CONFIG_FILE: &str = "config.json";

/// Get the per-user config directory
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "blobs2d", "blobs2d").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Files checked for configuration, highest priority first
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = config_dir() {
        paths.push(dir.join(USER_CONFIG_FILE));
    }
    paths
}

/// Load configuration from the first existing candidate, falling back to `preset`
pub fn load_config(preset: &EngineConfig) -> EngineConfig {
    resolve_from(&candidate_paths(), preset)
}

/// Load configuration from the first of `paths` that exists.
///
/// A file that cannot be read or parsed is reported and the preset is used.
pub fn resolve_from(paths: &[PathBuf], preset: &EngineConfig) -> EngineConfig {
    let Some(path) = paths.iter().find(|path| path.exists()) else {
        return preset.clone();
    };

    match EngineConfig::from_file_over(path, preset) {
        Ok(config) => {
            bevy::log::info!("Loaded configuration from {:?}", path);
            config
        }
        Err(e) => {
            bevy::log::warn!(
                "Could not load configuration from {:?}: {}. Using defaults.",
                path,
                e
            );
            preset.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let local = dir.path().join("blobs2d.json");
        let user = dir.path().join("config.json");
        std::fs::write(&local, r#"{ "map_path": "maps/local.txt" }"#).unwrap();
        std::fs::write(&user, r#"{ "map_path": "maps/user.txt" }"#).unwrap();

        let config = resolve_from(&[missing, local, user], &EngineConfig::editor());
        assert_eq!(config.map_path, PathBuf::from("maps/local.txt"));
    }

    #[test]
    fn test_resolve_falls_back_to_preset() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("blobs2d.json");
        std::fs::write(&broken, "not json").unwrap();

        assert_eq!(
            resolve_from(&[broken], &EngineConfig::viewer()),
            EngineConfig::viewer()
        );
        assert_eq!(resolve_from(&[], &EngineConfig::editor()), EngineConfig::editor());
    }
}
