use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write generated modules to the given output directory.
/// Creates the directory if it does not exist.
pub fn write_modules(output_dir: &Path, modules: &HashMap<String, String>) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<_> = modules.keys().collect();
    names.sort();

    for filename in names {
        let path = output_dir.join(filename);
        fs::write(&path, &modules[filename]).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote generated module");
    }

    Ok(())
}
