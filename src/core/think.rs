//! Splits streamed assistant text into the visible answer and the reasoning
//! section delimited by inline markers such as `<think>` … `</think>`.
//!
//! Markers may arrive split across chunks. The splitter keeps the longest
//! chunk suffix that could still grow into the marker it is waiting for and
//! replays it in front of the next chunk, so recognition never depends on
//! where the network happened to cut the stream.

/// Open and close markers that delimit the reasoning section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningMarkers {
    pub open: String,
    pub close: String,
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OPEN, Self::DEFAULT_CLOSE)
    }
}

impl ReasoningMarkers {
    pub const DEFAULT_OPEN: &'static str = "<think>";
    pub const DEFAULT_CLOSE: &'static str = "</think>";

    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Upper bound on the residue carried between chunks.
    pub fn max_residue_len(&self) -> usize {
        self.open.len().max(self.close.len()).saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Visible,
    Reasoning,
}

/// Text produced by one splitter step, in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDelta {
    pub visible: String,
    pub reasoning: String,
}

impl SplitDelta {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.reasoning.is_empty()
    }

    fn push(&mut self, section: Section, text: &str) {
        match section {
            Section::Visible => self.visible.push_str(text),
            Section::Reasoning => self.reasoning.push_str(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagSplitter {
    markers: ReasoningMarkers,
    section: Section,
    pending: String,
}

impl Default for TagSplitter {
    fn default() -> Self {
        Self::new(ReasoningMarkers::default())
    }
}

impl TagSplitter {
    pub fn new(markers: ReasoningMarkers) -> Self {
        Self {
            markers,
            section: Section::Visible,
            pending: String::new(),
        }
    }

    pub fn in_reasoning(&self) -> bool {
        self.section == Section::Reasoning
    }

    /// Residue held back because it may be the start of a marker.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Process one chunk and return the text it released.
    pub fn push(&mut self, chunk: &str) -> SplitDelta {
        let mut delta = SplitDelta::default();
        let data = if self.pending.is_empty() {
            chunk.to_string()
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.push_str(chunk);
            joined
        };

        let mut cursor = 0;
        loop {
            let marker = match self.section {
                Section::Visible => self.markers.open.as_str(),
                Section::Reasoning => self.markers.close.as_str(),
            };
            let rest = &data[cursor..];

            if !marker.is_empty() {
                if let Some(found) = rest.find(marker) {
                    delta.push(self.section, &rest[..found]);
                    cursor += found + marker.len();
                    self.section = match self.section {
                        Section::Visible => Section::Reasoning,
                        Section::Reasoning => Section::Visible,
                    };
                    continue;
                }
            }

            let keep = partial_marker_suffix(rest, marker);
            let emit_len = rest.len() - keep;
            delta.push(self.section, &rest[..emit_len]);
            self.pending = rest[emit_len..].to_string();
            break;
        }

        delta
    }

    /// Flush any held-back residue as literal text once the stream ends.
    pub fn finish(&mut self) -> SplitDelta {
        let mut delta = SplitDelta::default();
        let pending = std::mem::take(&mut self.pending);
        delta.push(self.section, &pending);
        delta
    }

    /// Split a complete text in one pass.
    pub fn split_all(markers: ReasoningMarkers, text: &str) -> SplitDelta {
        let mut splitter = Self::new(markers);
        let mut delta = splitter.push(text);
        let tail = splitter.finish();
        delta.visible.push_str(&tail.visible);
        delta.reasoning.push_str(&tail.reasoning);
        delta
    }
}

/// Length of the longest suffix of `haystack` that is a proper prefix of
/// `marker`. The result always ends on a char boundary of `haystack`.
fn partial_marker_suffix(haystack: &str, marker: &str) -> usize {
    let max = marker.len().saturating_sub(1).min(haystack.len());
    for len in (1..=max).rev() {
        let start = haystack.len() - len;
        if !haystack.is_char_boundary(start) || !marker.is_char_boundary(len) {
            continue;
        }
        if haystack[start..] == marker[..len] {
            return len;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_chunks(chunks: &[&str]) -> SplitDelta {
        let mut splitter = TagSplitter::default();
        let mut out = SplitDelta::default();
        for chunk in chunks {
            let delta = splitter.push(chunk);
            out.visible.push_str(&delta.visible);
            out.reasoning.push_str(&delta.reasoning);
        }
        let tail = splitter.finish();
        out.visible.push_str(&tail.visible);
        out.reasoning.push_str(&tail.reasoning);
        out
    }

    #[test]
    fn strips_markers_from_both_streams() {
        let delta = TagSplitter::split_all(
            ReasoningMarkers::default(),
            "<think>plan the answer</think>The answer is 4.",
        );
        assert_eq!(delta.visible, "The answer is 4.");
        assert_eq!(delta.reasoning, "plan the answer");
    }

    #[test]
    fn marker_split_across_chunks_is_recognized() {
        let mut splitter = TagSplitter::default();

        let first = splitter.push("Hello <thi");
        assert_eq!(first.visible, "Hello ");
        assert_eq!(splitter.pending(), "<thi");
        assert!(!splitter.in_reasoning());

        let second = splitter.push("nk>step one</th");
        assert_eq!(second.visible, "");
        assert_eq!(second.reasoning, "step one");
        assert!(splitter.in_reasoning());

        let third = splitter.push("ink> done");
        assert_eq!(third.visible, " done");
        assert_eq!(third.reasoning, "");
        assert!(!splitter.in_reasoning());
    }

    #[test]
    fn every_segmentation_matches_one_shot_split() {
        let text = "Intro <think>weigh options; a < b</think> middle <think>again</think>end<";
        let whole = TagSplitter::split_all(ReasoningMarkers::default(), text);
        assert_eq!(whole.visible, "Intro  middle end<");
        assert_eq!(whole.reasoning, "weigh options; a < bagain");

        for cut in 0..=text.len() {
            let chunked = split_chunks(&[&text[..cut], &text[cut..]]);
            assert_eq!(chunked, whole, "cut at {cut}");
        }

        let single_chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
        let refs: Vec<&str> = single_chars.iter().map(String::as_str).collect();
        assert_eq!(split_chunks(&refs), whole);
    }

    #[test]
    fn cursor_skips_the_whole_marker() {
        let delta = TagSplitter::split_all(ReasoningMarkers::default(), "<think>x</think>y");
        assert_eq!(delta.reasoning, "x");
        assert_eq!(delta.visible, "y");
    }

    #[test]
    fn lone_angle_bracket_is_released_when_it_cannot_be_a_marker() {
        let mut splitter = TagSplitter::default();
        let first = splitter.push("a <");
        assert_eq!(first.visible, "a ");
        let second = splitter.push("b");
        assert_eq!(second.visible, "<b");
        assert!(splitter.pending().is_empty());
    }

    #[test]
    fn unterminated_partial_marker_is_flushed_at_end() {
        let mut splitter = TagSplitter::default();
        assert_eq!(splitter.push("trailing <thin").visible, "trailing ");
        let tail = splitter.finish();
        assert_eq!(tail.visible, "<thin");
        assert!(tail.reasoning.is_empty());
    }

    #[test]
    fn unclosed_reasoning_stays_reasoning() {
        let delta = TagSplitter::split_all(ReasoningMarkers::default(), "<think>still thinking");
        assert_eq!(delta.visible, "");
        assert_eq!(delta.reasoning, "still thinking");
    }

    #[test]
    fn multibyte_text_next_to_markers() {
        let text = "héllo <think>razonación ✓</think>–fin";
        let whole = TagSplitter::split_all(ReasoningMarkers::default(), text);
        assert_eq!(whole.visible, "héllo –fin");
        assert_eq!(whole.reasoning, "razonación ✓");

        for (cut, _) in text.char_indices() {
            assert_eq!(split_chunks(&[&text[..cut], &text[cut..]]), whole);
        }
    }

    #[test]
    fn custom_markers() {
        let markers = ReasoningMarkers::new("[[r]]", "[[/r]]");
        assert_eq!(markers.max_residue_len(), 5);
        let delta = TagSplitter::split_all(markers, "a[[r]]b[[/r]]c");
        assert_eq!(delta.visible, "ac");
        assert_eq!(delta.reasoning, "b");
    }

    #[test]
    fn residue_never_exceeds_marker_length() {
        let mut splitter = TagSplitter::default();
        let limit = ReasoningMarkers::default().max_residue_len();
        for chunk in ["<", "/", "t", "<thin", "k", ">", "</thi", "x"] {
            splitter.push(chunk);
            assert!(splitter.pending().len() <= limit);
        }
    }
}
