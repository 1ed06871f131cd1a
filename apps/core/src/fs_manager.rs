use std::path::{Path, PathBuf};
use tracing::warn;

pub const ALIAS_MAP_FILENAME: &str = "aliasMap.json";
pub const WHISPERS_FILENAME: &str = "whispers.json";
pub const TIERS_FILENAME: &str = "categoryTiers.json";
pub const FALLBACK_FILENAME: &str = "fallback.txt";

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root directory (where the executable lives).
    pub fn root_dir() -> PathBuf {
        let exe_dir = match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                Some(path)
            }
            Err(e) => {
                warn!("Failed to get current exe path: {}. Falling back to current_dir.", e);
                None
            }
        };

        #[cfg(debug_assertions)]
        {
            // In development the executable sits in target/debug at the workspace root,
            // while the data lives next to apps/core.
            if let Some(mut path) = exe_dir.clone() {
                path.pop(); // remove debug
                path.pop(); // remove target
                let core_path = path.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
            }
        }

        exe_dir
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Default data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }
}

/// Locations of every content file, resolved against one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPaths {
    pub alias_map: PathBuf,
    pub whispers: PathBuf,
    pub tiers: PathBuf,
    pub fallback: PathBuf,
}

impl ContentPaths {
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            alias_map: data_dir.join(ALIAS_MAP_FILENAME),
            whispers: data_dir.join(WHISPERS_FILENAME),
            tiers: data_dir.join(TIERS_FILENAME),
            fallback: data_dir.join(FALLBACK_FILENAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_paths_share_data_dir() {
        let paths = ContentPaths::in_dir(Path::new("/srv/oracle/data"));
        assert_eq!(paths.alias_map, PathBuf::from("/srv/oracle/data/aliasMap.json"));
        assert_eq!(paths.whispers, PathBuf::from("/srv/oracle/data/whispers.json"));
        assert_eq!(paths.tiers, PathBuf::from("/srv/oracle/data/categoryTiers.json"));
        assert_eq!(paths.fallback, PathBuf::from("/srv/oracle/data/fallback.txt"));
    }

    #[test]
    fn test_data_dir_is_under_root() {
        assert!(PortablePathManager::data_dir().ends_with("data"));
    }
}
