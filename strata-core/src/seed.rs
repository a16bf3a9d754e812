use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

static SEED_TEMPLATE: &str = "INSERT INTO <table_name>\n    ()\nVALUES\n    ();\n";

/// The seeds directory: flat `.sql` files of reference data, scaffolded but
/// never tracked by the migration store.
pub struct SeedDir {
    root: PathBuf,
}

impl SeedDir {
    pub fn new(root: impl AsRef<Path>) -> SeedDir {
        SeedDir {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Create `<name>.sql` (lowercased) from the seed template and return
    /// the file name. Seed names must be unique ignoring case.
    pub fn scaffold(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::EmptySeedName);
        }

        let wanted = name.to_lowercase();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.to_lowercase() == wanted {
                return Err(Error::SeedExists {
                    name: name.to_string(),
                });
            }
        }

        let file_name = format!("{}.sql", wanted);
        fs::write(self.root.join(&file_name), SEED_TEMPLATE)?;
        Ok(file_name)
    }
}
