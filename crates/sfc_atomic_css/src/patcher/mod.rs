//! Span-based source patching.
//!
//! [`SourcePatcher`] is an editable view over an immutable source buffer.
//! Edits overwrite byte ranges of the original text; everything between the
//! edits is copied through byte for byte, so formatting and comments outside
//! the edited ranges are preserved and no printer round-trip is needed.
//!
//! The patcher can also produce a sourcemap from the patched output back to
//! the original text (see [`SourcePatcher::generate_map`]).

mod sourcemap;

use std::collections::BTreeSet;
use std::fmt;

use oxc_span::Span;
use thiserror::Error;

use self::sourcemap::PatchMapBuilder;

/// An edit that cannot be applied to the source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("cannot overwrite the empty range at offset {start}")]
    Empty { start: u32 },
    #[error("range {start}..{end} is outside of the source ({len} bytes)")]
    OutOfBounds { start: u32, end: u32, len: u32 },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: u32 },
    #[error("range {start}..{end} overlaps the overwritten range {existing_start}..{existing_end}")]
    Overlap {
        start: u32,
        end: u32,
        existing_start: u32,
        existing_end: u32,
    },
    #[error("range {start}..{end} splits the overwritten range {edit_start}..{edit_end}")]
    SplitEdit {
        start: u32,
        end: u32,
        edit_start: u32,
        edit_end: u32,
    },
}

#[derive(Debug, Clone)]
struct Edit {
    start: u32,
    end: u32,
    content: String,
}

/// A contiguous piece of the patched output.
enum Chunk<'p> {
    /// Untouched original text in `start..end`.
    Original { start: u32, end: u32 },
    /// Replacement text for an overwritten range.
    Edited(&'p Edit),
}

/// Editable view over an original source buffer.
///
/// Overwrites must target disjoint ranges; the final text is the original
/// with every overwrite applied.
#[derive(Debug)]
pub struct SourcePatcher<'s> {
    original: &'s str,
    /// Sorted by `start`, pairwise disjoint.
    edits: Vec<Edit>,
    /// Original offsets that get a mapping of their own in the sourcemap.
    anchors: BTreeSet<u32>,
}

impl<'s> SourcePatcher<'s> {
    pub fn new(original: &'s str) -> Self {
        Self {
            original,
            edits: Vec::new(),
            anchors: BTreeSet::new(),
        }
    }

    /// The unmodified source text.
    pub fn original(&self) -> &'s str {
        self.original
    }

    /// Whether any overwrite has been issued.
    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Register an original offset as a sourcemap anchor.
    ///
    /// Anchors inside untouched text produce a mapping token at their exact
    /// position. Anchors inside an overwritten range are ignored.
    pub fn add_sourcemap_location(&mut self, offset: u32) {
        if (offset as usize) <= self.original.len() {
            self.anchors.insert(offset);
        }
    }

    /// Replace the original text in `start..end` with `content`.
    pub fn overwrite(
        &mut self,
        start: u32,
        end: u32,
        content: impl Into<String>,
    ) -> Result<(), PatchError> {
        self.check_range(start, end)?;
        if start == end {
            return Err(PatchError::Empty { start });
        }

        let index = self.edits.partition_point(|edit| edit.start < start);
        let neighbours = [index.checked_sub(1), Some(index)];
        for existing in neighbours.into_iter().flatten().filter_map(|i| self.edits.get(i)) {
            if existing.start < end && start < existing.end {
                return Err(PatchError::Overlap {
                    start,
                    end,
                    existing_start: existing.start,
                    existing_end: existing.end,
                });
            }
        }

        self.edits.insert(
            index,
            Edit {
                start,
                end,
                content: content.into(),
            },
        );
        Ok(())
    }

    /// Replace the text covered by `span`.
    pub fn overwrite_span(
        &mut self,
        span: Span,
        content: impl Into<String>,
    ) -> Result<(), PatchError> {
        self.overwrite(span.start, span.end, content)
    }

    /// The current text of `start..end`, with overwrites inside the range applied.
    ///
    /// Fails if the range cuts through an overwritten range.
    pub fn slice(&self, start: u32, end: u32) -> Result<String, PatchError> {
        self.check_range(start, end)?;

        let mut out = String::with_capacity((end - start) as usize);
        let mut cursor = start;
        for edit in self.edits.iter().filter(|e| e.start < end && start < e.end) {
            if edit.start < start || edit.end > end {
                return Err(PatchError::SplitEdit {
                    start,
                    end,
                    edit_start: edit.start,
                    edit_end: edit.end,
                });
            }
            out.push_str(&self.original[cursor as usize..edit.start as usize]);
            out.push_str(&edit.content);
            cursor = edit.end;
        }
        out.push_str(&self.original[cursor as usize..end as usize]);
        Ok(out)
    }

    /// The current text covered by `span`.
    pub fn slice_span(&self, span: Span) -> Result<String, PatchError> {
        self.slice(span.start, span.end)
    }

    /// Build a sourcemap from the patched output back to the original text.
    ///
    /// Tokens are emitted at the start of every untouched chunk, at every
    /// anchor and line start inside untouched chunks, and at the start of
    /// every replacement (mapped to the start of the range it replaced).
    pub fn generate_map(&self, source_path: &str) -> oxc_sourcemap::SourceMap {
        let mut builder = PatchMapBuilder::new(source_path, self.original);

        for chunk in self.chunks() {
            match chunk {
                Chunk::Original { start, end } => {
                    builder.add_mapping(start);
                    let mut cursor = start;
                    for point in self.mapping_points(&builder, start, end) {
                        builder.advance(&self.original[cursor as usize..point as usize]);
                        builder.add_mapping(point);
                        cursor = point;
                    }
                    builder.advance(&self.original[cursor as usize..end as usize]);
                }
                Chunk::Edited(edit) => {
                    builder.add_mapping(edit.start);
                    builder.advance(&edit.content);
                }
            }
        }

        builder.into_sourcemap()
    }

    /// Anchors and line starts strictly inside `start..end`, ascending.
    fn mapping_points(&self, builder: &PatchMapBuilder<'_>, start: u32, end: u32) -> Vec<u32> {
        let inner = start + 1..end;
        let mut points: Vec<u32> = self
            .anchors
            .range(inner.clone())
            .copied()
            .chain(builder.line_starts_in(inner))
            .collect();
        points.sort_unstable();
        points.dedup();
        points
    }

    fn chunks(&self) -> Vec<Chunk<'_>> {
        let mut chunks = Vec::with_capacity(self.edits.len() * 2 + 1);
        let mut cursor = 0;
        for edit in &self.edits {
            if cursor < edit.start {
                chunks.push(Chunk::Original {
                    start: cursor,
                    end: edit.start,
                });
            }
            chunks.push(Chunk::Edited(edit));
            cursor = edit.end;
        }
        let len = self.len();
        if cursor < len {
            chunks.push(Chunk::Original { start: cursor, end: len });
        }
        chunks
    }

    fn check_range(&self, start: u32, end: u32) -> Result<(), PatchError> {
        let len = self.len();
        if start > end || end > len {
            return Err(PatchError::OutOfBounds { start, end, len });
        }
        for offset in [start, end] {
            if !self.original.is_char_boundary(offset as usize) {
                return Err(PatchError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn len(&self) -> u32 {
        self.original.len() as u32
    }
}

impl fmt::Display for SourcePatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            match chunk {
                Chunk::Original { start, end } => {
                    f.write_str(&self.original[start as usize..end as usize])?;
                }
                Chunk::Edited(edit) => f.write_str(&edit.content)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::cast_possible_truncation)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_source_is_identity() {
        let patcher = SourcePatcher::new("const a = 1;\n");
        assert!(!patcher.has_changes());
        assert_eq!(patcher.to_string(), "const a = 1;\n");
    }

    #[test]
    fn test_overwrite_applies_in_place() {
        let mut patcher = SourcePatcher::new("let x = foo;\nlet y = bar;");
        patcher.overwrite(8, 11, "baz").unwrap();
        patcher.overwrite(21, 24, "qux()").unwrap();
        assert_eq!(patcher.to_string(), "let x = baz;\nlet y = qux();");
    }

    #[test]
    fn test_overwrite_order_does_not_matter() {
        let mut patcher = SourcePatcher::new("abcdef");
        patcher.overwrite(4, 6, "EF").unwrap();
        patcher.overwrite(0, 2, "AB").unwrap();
        assert_eq!(patcher.to_string(), "ABcdEF");
    }

    #[test]
    fn test_overlapping_overwrite_is_rejected() {
        let mut patcher = SourcePatcher::new("abcdef");
        patcher.overwrite(1, 4, "x").unwrap();
        assert_eq!(
            patcher.overwrite(3, 5, "y"),
            Err(PatchError::Overlap {
                start: 3,
                end: 5,
                existing_start: 1,
                existing_end: 4,
            })
        );
        assert!(matches!(
            patcher.overwrite(0, 6, "z"),
            Err(PatchError::Overlap { .. })
        ));
        // Adjacent ranges are fine.
        patcher.overwrite(4, 6, "y").unwrap();
        assert_eq!(patcher.to_string(), "axy");
    }

    #[test]
    fn test_invalid_ranges() {
        let mut patcher = SourcePatcher::new("héllo");
        assert_eq!(patcher.overwrite(3, 3, "x"), Err(PatchError::Empty { start: 3 }));
        assert_eq!(
            patcher.overwrite(0, 99, "x"),
            Err(PatchError::OutOfBounds {
                start: 0,
                end: 99,
                len: 6
            })
        );
        assert_eq!(
            patcher.overwrite(0, 2, "x"),
            Err(PatchError::NotCharBoundary { offset: 2 })
        );
    }

    #[test]
    fn test_slice_reflects_overwrites() {
        let mut patcher = SourcePatcher::new("[a, b, c]");
        patcher.overwrite(4, 5, "beta").unwrap();
        assert_eq!(patcher.slice(0, 9).unwrap(), "[a, beta, c]");
        assert_eq!(patcher.slice(7, 8).unwrap(), "c");
        assert_eq!(patcher.slice(0, 4).unwrap(), "[a, ");
    }

    #[test]
    fn test_slice_cannot_split_an_overwrite() {
        let mut patcher = SourcePatcher::new("0123456789");
        patcher.overwrite(2, 6, "xx").unwrap();
        assert_eq!(
            patcher.slice(4, 8),
            Err(PatchError::SplitEdit {
                start: 4,
                end: 8,
                edit_start: 2,
                edit_end: 6,
            })
        );
    }

    #[test]
    fn test_sourcemap_maps_untouched_bytes_back() {
        let source = "const a = 1;\nexport default a;\nconsole.log(a);\n";
        let mut patcher = SourcePatcher::new(source);
        let start = source.find("export").unwrap() as u32;
        let end = start + "export default a;".len() as u32;
        patcher
            .overwrite(start, end, "import h from \"h\";\nexport default h(a);")
            .unwrap();

        let output = patcher.to_string();
        let map = patcher.generate_map("module.js");
        let lookup = map.generate_lookup_table();

        // `console` moved from line 2 to line 3 of the output.
        let token = map.lookup_token(&lookup, 3, 0).unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (2, 0));
        assert_eq!(output.lines().nth(3), Some("console.log(a);"));

        // The replacement maps to the start of the range it replaced.
        let token = map.lookup_token(&lookup, 1, 0).unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (1, 0));
    }

    #[test]
    fn test_sourcemap_anchor_tokens() {
        let source = "foo(bar, baz);";
        let mut patcher = SourcePatcher::new(source);
        patcher.add_sourcemap_location(4);
        patcher.add_sourcemap_location(9);
        patcher.add_sourcemap_location(99);

        let map = patcher.generate_map("a.js");
        let columns: Vec<u32> = map.get_tokens().map(|t| t.get_dst_col()).collect();
        assert_eq!(columns, vec![0, 4, 9]);
    }
}
