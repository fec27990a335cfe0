//! Tag-addressed insertion and deletion.
//!
//! Each operation comes in two halves. `plan_*` computes the new file
//! content from the in-memory snapshot and reports every precondition
//! failure before anything touches the disk. The mutating method commits a
//! plan through a scratch file renamed over the original.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::document::{Document, Line};
use crate::error::{Error, Result};

/// The planned content of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Full new file content. Untouched lines keep their original bytes.
    pub bytes: Vec<u8>,
    /// Number of lines inserted or removed.
    pub changed: usize,
}

impl Rewrite {
    /// The new content decoded lossily, for display.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// The new content split into lines the way a scan would split it.
    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        let body = self.bytes.strip_suffix(b"\n").unwrap_or(&self.bytes);
        (!self.bytes.is_empty())
            .then(|| body.split(|b| *b == b'\n'))
            .into_iter()
            .flatten()
            .map(|line| String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line)))
    }
}

/// Matched start/end lines, as 0-based indices into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TagPair {
    start: usize,
    end: usize,
}

fn push_lines<'a>(out: &mut Vec<u8>, lines: impl IntoIterator<Item = &'a Line>) {
    for line in lines {
        out.extend_from_slice(line.raw());
        out.push(b'\n');
    }
}

fn join_block<S: AsRef<str>>(contents: &[S]) -> String {
    contents
        .iter()
        .map(|content| content.as_ref())
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Write `contents` joined by newlines plus a final newline, so an empty
/// block still adds one blank line. Returns the number of lines written.
fn push_block<S: AsRef<str>>(out: &mut Vec<u8>, contents: &[S]) -> usize {
    out.extend_from_slice(join_block(contents).as_bytes());
    out.push(b'\n');
    contents.len().max(1)
}

impl Document {
    /// Plan an insertion of `contents` after every line carrying one of
    /// `tags`.
    ///
    /// A line carrying several of the target tags receives one copy of the
    /// block per matching tag. An empty `contents` inserts one blank line
    /// per match. With no tags at all the plan replaces the whole file with
    /// `contents` joined by newlines, without a trailing newline.
    pub fn plan_insert<T, C>(&self, tags: &[T], contents: &[C]) -> Rewrite
    where
        T: AsRef<str>,
        C: AsRef<str>,
    {
        if tags.is_empty() {
            return Rewrite {
                bytes: join_block(contents).into_bytes(),
                changed: contents.len(),
            };
        }

        let mut bytes = Vec::new();
        let mut changed = 0;
        for line in self.lines() {
            push_lines(&mut bytes, [line]);
            for tag in tags {
                if line.has_tag(tag.as_ref()) {
                    changed += push_block(&mut bytes, contents);
                }
            }
        }

        Rewrite { bytes, changed }
    }

    /// Insert `contents` after every line carrying one of `tags`, or
    /// replace the whole file when `tags` is empty.
    ///
    /// See [`plan_insert`](Self::plan_insert).
    pub fn insert<T, C>(&self, tags: &[T], contents: &[C]) -> Result<()>
    where
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let rewrite = self.plan_insert(tags, contents);
        tracing::debug!(
            path = %self.path().display(),
            tags = tags.len(),
            inserted = rewrite.changed,
            "Inserting at tags"
        );
        self.commit(&rewrite)
    }

    fn check_pair(&self, start: &str, end: &str) -> Result<()> {
        if start.is_empty() || end.is_empty() {
            return Err(Error::EmptyTag);
        }
        self.check_start(start)?;
        self.check_end(end)
    }

    fn check_start(&self, start: &str) -> Result<()> {
        if !self.has_tag(start) {
            return Err(Error::StartTagNotFound {
                tag: start.to_string(),
            });
        }
        Ok(())
    }

    fn check_end(&self, end: &str) -> Result<()> {
        if !self.has_tag(end) {
            return Err(Error::EndTagNotFound {
                tag: end.to_string(),
            });
        }
        Ok(())
    }

    /// Find the first end-tagged line that follows a start-tagged line.
    ///
    /// The latest start seen before that end wins. A line carrying both
    /// tags counts as a start only.
    fn match_pair(&self, start: &str, end: &str) -> Result<TagPair> {
        let mut open = None;
        for (index, line) in self.lines().iter().enumerate() {
            if line.has_tag(start) {
                open = Some(index);
            } else if line.has_tag(end) {
                if let Some(start_index) = open {
                    return Ok(TagPair {
                        start: start_index,
                        end: index,
                    });
                }
            }
        }
        Err(Error::TagPairMismatch {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// Plan an insertion of `contents` right before the end line of the
    /// first start/end pair. An empty `contents` inserts one blank line.
    ///
    /// # Errors
    /// Checked in this order: [`Error::EmptyTag`], [`Error::StartTagNotFound`],
    /// [`Error::EndTagNotFound`], [`Error::TagPairMismatch`].
    pub fn plan_insert_between<C: AsRef<str>>(
        &self,
        start: &str,
        end: &str,
        contents: &[C],
    ) -> Result<Rewrite> {
        self.check_pair(start, end)?;
        let pair = self.match_pair(start, end)?;

        let lines = self.lines();
        let mut bytes = Vec::new();
        push_lines(&mut bytes, &lines[..pair.end]);
        let changed = push_block(&mut bytes, contents);
        push_lines(&mut bytes, &lines[pair.end..]);

        Ok(Rewrite { bytes, changed })
    }

    /// Insert `contents` right before the end line of the first start/end
    /// pair.
    ///
    /// Running this twice inserts the block twice. On any error the file is
    /// left untouched.
    pub fn insert_between<C: AsRef<str>>(&self, start: &str, end: &str, contents: &[C]) -> Result<()> {
        let rewrite = self.plan_insert_between(start, end, contents)?;
        tracing::debug!(
            path = %self.path().display(),
            start,
            end,
            inserted = rewrite.changed,
            "Inserting between tags"
        );
        self.commit(&rewrite)
    }

    /// Like [`plan_insert_between`](Self::plan_insert_between), but drops
    /// content lines already present between the matched start and end
    /// lines, and repeats within `contents` itself.
    ///
    /// When nothing is left to insert the plan is the unchanged snapshot;
    /// no blank line is added.
    pub fn plan_insert_between_unique<C: AsRef<str>>(
        &self,
        start: &str,
        end: &str,
        contents: &[C],
    ) -> Result<Rewrite> {
        self.check_pair(start, end)?;
        let pair = self.match_pair(start, end)?;

        let lines = self.lines();
        let mut seen: HashSet<&[u8]> = lines[pair.start + 1..pair.end]
            .iter()
            .map(|line| line.raw())
            .collect();
        let fresh: Vec<&str> = contents
            .iter()
            .map(|content| content.as_ref())
            .filter(|content| seen.insert(content.as_bytes()))
            .collect();

        if fresh.is_empty() {
            return Ok(Rewrite {
                bytes: self.snapshot_bytes(),
                changed: 0,
            });
        }

        let mut bytes = Vec::new();
        push_lines(&mut bytes, &lines[..pair.end]);
        let changed = push_block(&mut bytes, fresh.as_slice());
        push_lines(&mut bytes, &lines[pair.end..]);

        Ok(Rewrite { bytes, changed })
    }

    /// Insert the content lines not already present between the first
    /// start/end pair. Returns how many lines were inserted; when none
    /// are, the file is not rewritten.
    pub fn insert_between_unique<C: AsRef<str>>(
        &self,
        start: &str,
        end: &str,
        contents: &[C],
    ) -> Result<usize> {
        let rewrite = self.plan_insert_between_unique(start, end, contents)?;
        tracing::debug!(
            path = %self.path().display(),
            start,
            end,
            inserted = rewrite.changed,
            "Inserting unique lines between tags"
        );
        if rewrite.changed > 0 {
            self.commit(&rewrite)?;
        }
        Ok(rewrite.changed)
    }

    /// Plan the removal of every line carrying one of `tags`, or of the
    /// whole content when `tags` is empty.
    pub fn plan_delete<T: AsRef<str>>(&self, tags: &[T]) -> Rewrite {
        if tags.is_empty() {
            return Rewrite {
                bytes: Vec::new(),
                changed: self.total_lines(),
            };
        }

        let kept: Vec<&Line> = self.lines().iter().filter(|line| !line.has_any(tags)).collect();
        let mut bytes = Vec::new();
        push_lines(&mut bytes, kept.iter().copied());

        Rewrite {
            bytes,
            changed: self.total_lines() - kept.len(),
        }
    }

    /// Remove every line carrying one of `tags`; an empty `tags` empties
    /// the file. Returns the number of lines removed. The file is not
    /// rewritten when nothing matches.
    pub fn delete<T: AsRef<str>>(&self, tags: &[T]) -> Result<usize> {
        let rewrite = self.plan_delete(tags);
        tracing::debug!(
            path = %self.path().display(),
            tags = tags.len(),
            removed = rewrite.changed,
            "Deleting tagged lines"
        );
        if rewrite.changed > 0 || tags.is_empty() {
            self.commit(&rewrite)?;
        }
        Ok(rewrite.changed)
    }

    /// Plan a range deletion. An empty `start` or `end` means the range is
    /// open on that side.
    ///
    /// - both empty: the whole content
    /// - only `start`: first start-tagged line through end of file
    /// - only `end`: first line through the first end-tagged line
    /// - both: the lines strictly between the matched pair, markers kept
    pub fn plan_delete_between(&self, start: &str, end: &str) -> Result<Rewrite> {
        let lines = self.lines();

        // Lines in `from..to` are removed
        let (from, to) = match (start.is_empty(), end.is_empty()) {
            (true, true) => (0, lines.len()),
            (false, true) => {
                self.check_start(start)?;
                let first = self.first_tagged(start).ok_or_else(|| Error::StartTagNotFound {
                    tag: start.to_string(),
                })?;
                (first, lines.len())
            }
            (true, false) => {
                self.check_end(end)?;
                let first = self.first_tagged(end).ok_or_else(|| Error::EndTagNotFound {
                    tag: end.to_string(),
                })?;
                (0, first + 1)
            }
            (false, false) => {
                self.check_pair(start, end)?;
                let pair = self.match_pair(start, end)?;
                (pair.start + 1, pair.end)
            }
        };

        let mut bytes = Vec::new();
        push_lines(&mut bytes, &lines[..from]);
        push_lines(&mut bytes, &lines[to..]);

        Ok(Rewrite {
            bytes,
            changed: to - from,
        })
    }

    /// Delete a tag-bounded range. Returns the number of lines removed.
    ///
    /// See [`plan_delete_between`](Self::plan_delete_between) for how the
    /// range is chosen. On any error the file is left untouched.
    pub fn delete_between(&self, start: &str, end: &str) -> Result<usize> {
        let rewrite = self.plan_delete_between(start, end)?;
        tracing::debug!(
            path = %self.path().display(),
            start,
            end,
            removed = rewrite.changed,
            "Deleting between tags"
        );
        if rewrite.changed > 0 || (start.is_empty() && end.is_empty()) {
            self.commit(&rewrite)?;
        }
        Ok(rewrite.changed)
    }

    fn first_tagged(&self, tag: &str) -> Option<usize> {
        self.lines().iter().position(|line| line.has_tag(tag))
    }

    fn commit(&self, rewrite: &Rewrite) -> Result<()> {
        tagline_fs::replace_contents(self.path(), &rewrite.bytes)?;
        Ok(())
    }
}
