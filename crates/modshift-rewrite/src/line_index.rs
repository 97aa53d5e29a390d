//! Byte offset to line/column lookup for diagnostics.

/// Line start table for one source text
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    text: &'s str,
    line_starts: Vec<u32>,
}

impl<'s> LineIndex<'s> {
    pub fn new(text: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| offset as u32 + 1),
        );
        Self { text, line_starts }
    }

    /// 0-based (line, column) of a byte offset. Columns count characters.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.text.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(0) => 0,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line] as usize;
        let column = self
            .text
            .get(start..offset as usize)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line as u32, column as u32)
    }
}
