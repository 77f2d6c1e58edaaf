//! Find-in-output: every case-insensitive occurrence of a query in the
//! assembled text, with a cyclic "current" cursor.

use memchr::memmem::Finder;

/// Byte span into the searched text; both ends lie on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    query: String,
    entries: Vec<MatchSpan>,
    current: Option<usize>,
}

impl MatchIndex {
    pub fn build(text: &str, query: &str) -> Self {
        let mut index = Self::default();
        index.set_query(text, query);
        index
    }

    pub fn set_query(&mut self, text: &str, query: &str) {
        self.query.clear();
        self.query.push_str(query);
        self.rebuild(text);
    }

    /// Recomputes entries for new text; the cursor goes back to the first one.
    pub fn rebuild(&mut self, text: &str) {
        self.entries = find_all(text, &self.query);
        self.current = if self.entries.is_empty() { None } else { Some(0) };
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.entries.clear();
        self.current = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn entries(&self) -> &[MatchSpan] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<MatchSpan> {
        self.current.and_then(|i| self.entries.get(i).copied())
    }

    pub fn find_next(&mut self) -> Option<MatchSpan> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |i| (i + 1) % len));
        self.current()
    }

    pub fn find_previous(&mut self) -> Option<MatchSpan> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(len - 1, |i| (i + len - 1) % len));
        self.current()
    }

    /// Stepping only makes sense with more than one entry.
    pub fn can_step(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn position_label(&self) -> String {
        match self.current {
            Some(i) if !self.entries.is_empty() => format!("{} of {}", i + 1, self.entries.len()),
            _ => "No matches".to_string(),
        }
    }
}

/// Left-to-right, non-overlapping, case-insensitive occurrences of `query`.
pub fn find_all(text: &str, query: &str) -> Vec<MatchSpan> {
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }

    if text.is_ascii() && query.is_ascii() {
        let haystack = text.to_ascii_lowercase();
        let needle = query.to_ascii_lowercase();
        return Finder::new(needle.as_bytes())
            .find_iter(haystack.as_bytes())
            .map(|start| MatchSpan {
                start,
                end: start + needle.len(),
            })
            .collect();
    }

    let needle = fold_case(query);
    if needle.is_empty() {
        return Vec::new();
    }
    let (haystack, origin) = fold_case_with_origin(text);
    Finder::new(needle.as_bytes())
        .find_iter(haystack.as_bytes())
        .map(|pos| MatchSpan {
            start: origin[pos].0,
            end: origin[pos + needle.len() - 1].1,
        })
        .collect()
}

fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercases `text` char by char. For every byte of the folded string,
/// records the byte range of the source char it came from, since folding
/// can change encoded lengths.
fn fold_case_with_origin(text: &str) -> (String, Vec<(usize, usize)>) {
    let mut folded = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (start, ch) in text.char_indices() {
        let end = start + ch.len_utf8();
        for lower in ch.to_lowercase() {
            folded.push(lower);
            origin.extend(std::iter::repeat((start, end)).take(lower.len_utf8()));
        }
    }
    (folded, origin)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/find.rs"]
mod tests;
