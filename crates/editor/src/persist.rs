//! Reading documents from disk and writing them back.
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tools::utf8::Utf8Decoder;

use crate::config::SaveConfig;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};

const READ_CHUNK: usize = 64 * 1024;

/// Whether `path` is named like an HTML document (`.html` / `.htm`, any case).
pub fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Reads and parses `path`. Any text parses; only unreadable files and binary
/// content (NUL bytes) are rejected.
pub fn load(path: impl AsRef<Path>) -> EditorResult<Document> {
    let path = path.as_ref();
    let markup = read_markup(path)?;
    let doc = Document::from_markup(path, &markup);
    log::info!(
        target: "editor.persist",
        "loaded {} ({} bytes of text)",
        path.display(),
        markup.len()
    );
    Ok(doc)
}

/// File content as text. Invalid UTF-8 is replaced, a leading BOM is dropped.
pub fn read_markup(path: &Path) -> EditorResult<String> {
    let read_error = |source: std::io::Error| EditorError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_error)?;
    let size_hint = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let mut decoder = Utf8Decoder::with_capacity(size_hint);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        if chunk[..n].contains(&0) {
            return Err(EditorError::Parse {
                path: path.to_path_buf(),
                reason: "binary content (NUL byte)".to_string(),
            });
        }
        decoder.push(&chunk[..n]);
    }

    if decoder.replaced() > 0 {
        log::warn!(
            target: "editor.persist",
            "{}: {} invalid UTF-8 sequence(s) replaced",
            path.display(),
            decoder.replaced()
        );
    }
    Ok(decoder.finish())
}

/// Serializes `doc` to `path` as UTF-8, replacing any existing file.
/// Never touches the tree.
pub fn save(doc: &Document, path: &Path, config: &SaveConfig) -> EditorResult<()> {
    let markup = doc.to_html();
    let write_error = |source: std::io::Error| EditorError::Write {
        path: path.to_path_buf(),
        source,
    };

    if config.atomic {
        write_atomic(path, markup.as_bytes()).map_err(write_error)?;
    } else {
        fs::write(path, markup.as_bytes()).map_err(write_error)?;
    }

    log::info!(
        target: "editor.persist",
        "wrote {} ({} bytes)",
        path.display(),
        markup.len()
    );
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    // Temp files are created owner-only; keep the target's mode instead.
    if let Ok(existing) = fs::metadata(path) {
        if existing.is_file() {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
