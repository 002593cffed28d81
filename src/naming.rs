// Output file naming. Other tooling locates the intermediate and final documents by
// these names, so the patterns must stay exactly as they are.

use std::path::{Path, PathBuf};

const INTERMEDIATE_TAG: &str = ".proofread.";
const FINAL_TAG: &str = ".final.";

/// `notes.md` -> `notes.proofread.md`; a name without extension gets `.proofread` appended
pub fn intermediate_path(source_path: &Path) -> PathBuf {
    with_tag(source_path, "proofread")
}

/// `notes.proofread.md` -> `notes.final.md`.
///
/// The first `.proofread.` in the file name is replaced. A name without it is treated
/// like a source document and gets `.final` inserted before its extension.
pub fn final_path(intermediate_path: &Path) -> PathBuf {
    let file_name = file_name_of(intermediate_path);

    if file_name.contains(INTERMEDIATE_TAG) {
        let renamed = file_name.replacen(INTERMEDIATE_TAG, FINAL_TAG, 1);
        return intermediate_path.with_file_name(renamed);
    }
    if let Some(stem) = file_name.strip_suffix(".proofread") {
        return intermediate_path.with_file_name(format!("{stem}.final"));
    }

    with_tag(intermediate_path, "final")
}

fn with_tag(path: &Path, tag: &str) -> PathBuf {
    let file_name = file_name_of(path);
    let renamed = match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!("{}.{tag}.{}", stem.to_string_lossy(), ext.to_string_lossy()),
        _ => format!("{file_name}.{tag}"),
    };
    path.with_file_name(renamed)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
