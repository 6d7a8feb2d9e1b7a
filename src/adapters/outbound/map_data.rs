use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::ports::MapSource;

/// Environment variable naming the directory relative map names resolve against.
pub const DATA_DIR_ENV: &str = "PATHFINDER_DATA_DIR";

pub struct FilesystemMapSource {
    base: PathBuf,
}

impl FilesystemMapSource {
    /// Precedence: explicit base -> PATHFINDER_DATA_DIR -> current directory.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| match env::var(DATA_DIR_ENV) {
            Ok(v) => PathBuf::from(v),
            Err(_) => PathBuf::from("."),
        });
        Self { base }
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        let p = Path::new(name);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base.join(p)
        }
    }
}

impl MapSource for FilesystemMapSource {
    fn load_map(&self, name: &str) -> DomainResult<String> {
        let p = self.resolve(name);
        fs::read_to_string(&p)
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", p.display(), e)))
    }
}
