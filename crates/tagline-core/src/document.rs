//! The line/tag snapshot of a file and the scan that builds it.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::classifier::Classifier;
use crate::error::{Error, Result};

/// A caller-defined, non-empty line label.
pub type Tag = String;

/// One line of the scanned file.
///
/// Files are not required to be UTF-8. `content` is the lossy decoding used
/// for classification and display; rewrites copy the original bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Text without the line terminator.
    pub content: String,
    /// Tags attached during the scan.
    pub tags: HashSet<Tag>,
    raw: Vec<u8>,
}

impl Line {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            raw: content.as_bytes().to_vec(),
            content,
            tags: HashSet::new(),
        }
    }

    /// Build a line from its bytes as read from disk, terminator removed.
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        Self {
            content: String::from_utf8_lossy(&raw).into_owned(),
            tags: HashSet::new(),
            raw,
        }
    }

    /// The line's bytes exactly as read, without the terminator.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the line carries at least one of `tags`.
    pub fn has_any<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.has_tag(t.as_ref()))
    }
}

/// In-memory snapshot of a text file and its tag index.
///
/// Lines and tags describe the file as of the most recent [`scan`](Self::scan).
/// Mutations rewrite the file on disk but leave the snapshot alone, so a
/// document has to be rescanned before it reflects its own edits.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    size: u64,
    lines: Vec<Line>,
    tags: HashSet<Tag>,
}

impl Document {
    /// Resolve `path` and create an empty, unscanned document for it.
    ///
    /// No content is read here.
    ///
    /// # Errors
    /// [`Error::NotFound`] if nothing exists at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let resolved = tagline_fs::resolve(path)?;
        Ok(Self {
            size: resolved.size(),
            path: resolved.into_path(),
            lines: Vec::new(),
            tags: HashSet::new(),
        })
    }

    /// Absolute path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes when the document was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Every tag seen on any line.
    pub fn tags(&self) -> &HashSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Line by 1-based number.
    pub fn line(&self, number: usize) -> Option<&Line> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// 1-based numbers of the lines carrying `tag`, in file order.
    pub fn lines_tagged(&self, tag: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.has_tag(tag))
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Read the file and tag every line with `classifiers`.
    ///
    /// Each scan replaces the previous snapshot. If reading fails part way
    /// through, the previous snapshot is kept as it was.
    ///
    /// Lines end at `\n`; a `\r` before it is dropped as well. Bytes that are
    /// not valid UTF-8 are accepted.
    pub fn scan(&mut self, classifiers: &[&dyn Classifier]) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let mut reader = BufReader::new(file);

        let mut lines = Vec::new();
        let mut tags = HashSet::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::io(&self.path, e))?;
            if read == 0 {
                break;
            }

            let number = lines.len() + 1;
            let mut line = Line::from_bytes(strip_terminator(&buf).to_vec());

            for classifier in classifiers {
                match classifier.classify(number, &line.content) {
                    Some(tag) if !tag.is_empty() => {
                        tracing::trace!(line = number, tag = %tag, "Tagged line");
                        tags.insert(tag.clone());
                        line.tags.insert(tag);
                    }
                    _ => {}
                }
            }

            lines.push(line);
        }

        tracing::debug!(
            path = %self.path.display(),
            lines = lines.len(),
            tags = tags.len(),
            "Scanned document"
        );

        self.lines = lines;
        self.tags = tags;
        Ok(())
    }

    /// The snapshot rendered the way rewrites write it: every line followed
    /// by a newline.
    pub fn snapshot_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for line in &self.lines {
            bytes.extend_from_slice(&line.raw);
            bytes.push(b'\n');
        }
        bytes
    }

    /// [`snapshot_bytes`](Self::snapshot_bytes), decoded lossily for display.
    pub fn snapshot_text(&self) -> String {
        String::from_utf8_lossy(&self.snapshot_bytes()).into_owned()
    }
}

fn strip_terminator(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
