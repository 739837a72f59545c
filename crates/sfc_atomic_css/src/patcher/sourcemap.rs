//! Sourcemap builder for patched output.
//!
//! Tracks the generated line/column while the patcher replays its chunks and
//! converts original byte offsets into line/column pairs. Columns are counted
//! in UTF-16 code units, as the sourcemap format requires.

use std::ops::Range;

pub struct PatchMapBuilder<'s> {
    /// The source id assigned by the inner sourcemap builder.
    source_id: u32,
    original: &'s str,
    /// `line_starts[i]` is the byte offset of the first character on line `i`.
    line_starts: Vec<u32>,
    inner: oxc_sourcemap::SourceMapBuilder,
    /// Current generated line (0-indexed).
    generated_line: u32,
    /// Current generated column (0-indexed, UTF-16 code units).
    generated_column: u32,
}

impl<'s> PatchMapBuilder<'s> {
    pub fn new(source_path: &str, original: &'s str) -> Self {
        let mut inner = oxc_sourcemap::SourceMapBuilder::default();
        let source_id = inner.set_source_and_content(source_path, original);
        Self {
            source_id,
            original,
            line_starts: compute_line_starts(original),
            inner,
            generated_line: 0,
            generated_column: 0,
        }
    }

    pub fn into_sourcemap(self) -> oxc_sourcemap::SourceMap {
        self.inner.into_sourcemap()
    }

    /// Map the current generated position to `original_offset`.
    pub fn add_mapping(&mut self, original_offset: u32) {
        let (line, column) = self.byte_offset_to_line_column(original_offset);
        self.inner.add_token(
            self.generated_line,
            self.generated_column,
            line,
            column,
            Some(self.source_id),
            None,
        );
    }

    /// Move the generated position past `text`.
    #[expect(clippy::cast_possible_truncation)]
    pub fn advance(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut last_line_end = None;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    self.generated_line += 1;
                    last_line_end = Some(i);
                }
                b'\r' => {
                    self.generated_line += 1;
                    // \r\n counts once
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    last_line_end = Some(i);
                }
                _ => {}
            }
            i += 1;
        }

        match last_line_end {
            Some(end) => self.generated_column = utf16_len(&text[end + 1..]),
            None => self.generated_column += utf16_len(text),
        }
    }

    /// Line start offsets that fall inside `range`.
    pub fn line_starts_in(&self, range: Range<u32>) -> impl Iterator<Item = u32> + '_ {
        let from = self.line_starts.partition_point(|&start| start < range.start);
        self.line_starts[from..]
            .iter()
            .copied()
            .take_while(move |&start| start < range.end)
    }

    /// Convert a byte offset in the original source to (line, column), both 0-indexed.
    #[expect(clippy::cast_possible_truncation)]
    fn byte_offset_to_line_column(&self, byte_offset: u32) -> (u32, u32) {
        let byte_offset = byte_offset.min(self.original.len() as u32);
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(exact) => exact,
            Err(insert_pos) => insert_pos.saturating_sub(1),
        };
        let line_start = self.line_starts[line] as usize;
        let column = utf16_len(&self.original[line_start..byte_offset as usize]);
        (line as u32, column)
    }
}

#[expect(clippy::cast_possible_truncation)]
fn utf16_len(text: &str) -> u32 {
    if text.is_ascii() {
        text.len() as u32
    } else {
        text.encode_utf16().count() as u32
    }
}

#[expect(clippy::cast_possible_truncation)]
fn compute_line_starts(source: &str) -> Vec<u32> {
    let bytes = source.as_bytes();
    let mut starts = vec![0u32];
    for (i, &b) in bytes.iter().enumerate() {
        let is_break = b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
        if is_break {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
