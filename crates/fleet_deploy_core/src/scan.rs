use std::fs;
use std::io;
use std::path::Path;

use crate::contract::FunctionCandidate;

/// Lists the immediate child directories of `root` as function candidates,
/// non-recursively, in the order the filesystem yields them. Entries whose
/// names are not valid UTF-8 or resolve to an empty function name are
/// skipped.
pub fn scan_function_directories(root: &Path) -> io::Result<Vec<FunctionCandidate>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(raw_name) = file_name.to_str() else {
            continue;
        };

        if let Ok(candidate) = FunctionCandidate::from_directory(entry.path(), raw_name) {
            candidates.push(candidate);
        }
    }

    Ok(candidates)
}
