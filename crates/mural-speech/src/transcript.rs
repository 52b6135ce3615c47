//! Accumulating transcript of finalized speech segments.

/// Normalize a raw recognition segment: trimmed and lowercased.
///
/// Normalized phrases are the dedup and media-lookup keys for the rest of
/// the system.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Append-only log of finalized transcript segments.
///
/// The only mutation besides appends is suppression of immediately-repeated
/// trailing content: continuous recognition sessions re-emit the last
/// finalized phrase across chained restarts, and those repeats are dropped.
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    segments: Vec<String>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` and append it, unless it is empty or the buffer
    /// already ends with the exact same normalized segment.
    ///
    /// Returns the normalized segment if it was appended.
    pub fn append(&mut self, raw: &str) -> Option<String> {
        let segment = normalize(raw);
        if segment.is_empty() {
            return None;
        }
        if self.segments.last() == Some(&segment) {
            return None;
        }
        self.segments.push(segment.clone());
        Some(segment)
    }

    /// All segments in arrival order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The full transcript, one segment per line.
    pub fn text(&self) -> String {
        self.segments.join("\n")
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Drop all accumulated segments. Explicit user action only.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}
