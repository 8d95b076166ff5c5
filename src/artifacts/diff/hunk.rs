use crate::artifacts::diff::myers::Edit;
use std::fmt::Display;

/// Unchanged lines kept around each change
pub const HUNK_CONTEXT: usize = 3;

/// Run of edits with its surrounding context
///
/// Starts are 1-based; an empty side reports the line before the hunk,
/// so a file created from nothing reads `@@ -0,0 +1,n @@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub edits: Vec<Edit<String>>,
}

impl Hunk {
    /// Group an edit script into hunks, merging changes whose context overlaps
    pub fn build(edits: &[Edit<String>], context: usize) -> Vec<Hunk> {
        // Lines consumed from each side before position `i`
        let mut offsets = Vec::with_capacity(edits.len() + 1);
        let (mut old_line, mut new_line) = (0, 0);
        for edit in edits {
            offsets.push((old_line, new_line));
            match edit {
                Edit::Delete { .. } => old_line += 1,
                Edit::Insert { .. } => new_line += 1,
                Edit::Equal { .. } => {
                    old_line += 1;
                    new_line += 1;
                }
            }
        }
        offsets.push((old_line, new_line));

        let is_change = |i: usize| !edits[i].is_equal();
        let mut hunks = Vec::new();
        let mut cursor = 0;

        while let Some(first) = (cursor..edits.len()).find(|&i| is_change(i)) {
            let start = first.saturating_sub(context).max(cursor);
            let mut end = first;

            loop {
                while end < edits.len() && is_change(end) {
                    end += 1;
                }

                match (end..edits.len()).find(|&i| is_change(i)) {
                    Some(next) if next - end <= 2 * context => end = next,
                    _ => break,
                }
            }

            let stop = (end + context).min(edits.len());
            hunks.push(Self::from_range(edits, &offsets, start, stop));
            cursor = stop;
        }

        hunks
    }

    fn from_range(
        edits: &[Edit<String>],
        offsets: &[(usize, usize)],
        start: usize,
        stop: usize,
    ) -> Hunk {
        let (old_before, new_before) = offsets[start];
        let (old_after, new_after) = offsets[stop];
        let (old_len, new_len) = (old_after - old_before, new_after - new_before);

        let first_line = |before: usize, len: usize| match len {
            0 => before,
            _ => before + 1,
        };

        Hunk {
            old_start: first_line(old_before, old_len),
            old_len,
            new_start: first_line(new_before, new_len),
            new_len,
            edits: edits[start..stop].to_vec(),
        }
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }
}

impl Display for Hunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header())?;
        for edit in &self.edits {
            writeln!(f, "{edit}")?;
        }

        Ok(())
    }
}
