use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory populated with data modules.
pub struct Mocks {
    dir: TempDir,
}

impl Mocks {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("fake-module.json"), r#"{"name": "fake-module"}"#).unwrap();
        std::fs::write(dir.path().join("fake-module-2.json"), r#"["two"]"#).unwrap();
        std::fs::write(dir.path().join("fake-module-3.toml"), "name = \"three\"\n").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn locator(&self, name: &str) -> String {
        format!("require:{}", self.file(name).display())
    }
}
