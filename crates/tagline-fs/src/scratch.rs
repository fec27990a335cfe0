//! Scratch files for atomic rewrites
//!
//! A rewrite is staged in a scratch file next to its target and renamed
//! over the target only after every byte has been written and synced.
//! Dropping a [`ScratchFile`] without committing removes it.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A writable staging file bound to the path it will replace.
#[derive(Debug)]
pub struct ScratchFile {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl ScratchFile {
    /// Create a scratch file for `target`.
    ///
    /// The file lives in the target's directory so the final rename never
    /// crosses a filesystem boundary.
    pub fn for_target(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!(
            ".{}.",
            target
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default()
        );

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| Error::io(&dir, e))?;

        tracing::debug!(scratch = %temp.path().display(), target = %target.display(), "Created scratch file");

        Ok(Self {
            writer: BufWriter::new(temp),
            target,
        })
    }

    /// Path of the staging file itself.
    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Path the scratch file will be renamed to on commit.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| Error::io(self.writer.get_ref().path(), e))
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Write `line` followed by a newline.
    ///
    /// For callers streaming a rewrite line by line instead of handing
    /// [`replace_contents`] the finished buffer.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Flush, sync and rename the scratch file over its target.
    ///
    /// The target's permissions are carried over when it still exists.
    pub fn commit(self) -> Result<()> {
        let Self { writer, target } = self;

        let temp = writer.into_inner().map_err(|e| {
            let (error, writer) = e.into_parts();
            Error::io(writer.get_ref().path(), error)
        })?;

        temp.as_file()
            .sync_all()
            .map_err(|e| Error::io(temp.path(), e))?;

        if let Ok(metadata) = fs::metadata(&target) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| Error::io(temp.path(), e))?;
        }

        temp.persist(&target)
            .map_err(|e| Error::io(&target, e.error))?;

        tracing::debug!(target = %target.display(), "Committed scratch file");
        Ok(())
    }

    /// Close and remove the scratch file without touching the target.
    pub fn discard(self) -> Result<()> {
        let Self { writer, target } = self;
        let temp = match writer.into_inner() {
            Ok(temp) => temp,
            // Dropping the inner file still removes it.
            Err(e) => return Err(Error::io(&target, e.into_error())),
        };
        let path = temp.path().to_path_buf();
        temp.close().map_err(|e| Error::io(&path, e))?;

        tracing::debug!(target = %target.display(), "Discarded scratch file");
        Ok(())
    }
}

/// Replace the contents of `target` with `bytes` through a scratch file.
///
/// On a failed write the scratch file is discarded and the target is left
/// as it was.
pub fn replace_contents(target: impl AsRef<Path>, bytes: impl AsRef<[u8]>) -> Result<()> {
    let mut scratch = ScratchFile::for_target(target)?;
    if let Err(e) = scratch.write_bytes(bytes.as_ref()) {
        // The write error is the one worth reporting
        let _ = scratch.discard();
        return Err(e);
    }
    scratch.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_lives_next_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("notes.txt");
        fs::write(&target, "x").unwrap();

        let scratch = ScratchFile::for_target(&target).unwrap();
        assert_eq!(scratch.path().parent(), target.parent());
        let name = scratch.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".notes.txt."));
        assert!(name.ends_with(".tmp"));
    }
}
