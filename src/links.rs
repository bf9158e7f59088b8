use std::collections::HashMap;

use crate::block::{BlockAccumulator, BlockStyle, InlineAccumulator, Marker};

/// Link targets seen during one conversion, numbered in first-seen order.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    targets: Vec<String>,
    index: HashMap<String, usize>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the 1-based reference number for `target`, assigning the next
    /// one if the target has not been seen yet.
    pub fn register(&mut self, target: &str) -> usize {
        if let Some(&idx) = self.index.get(target) {
            return idx;
        }
        self.targets.push(target.to_string());
        let idx = self.targets.len();
        self.index.insert(target.to_string(), idx);
        log::debug!("Registered link [{}] {}", idx, target);
        idx
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Drain the registry into reference rows: a blank separator followed by
    /// one `"[n] target"` row per link.
    pub fn flush(&mut self) -> BlockAccumulator {
        let mut blocks = BlockAccumulator::new();
        if self.targets.is_empty() {
            return blocks;
        }

        blocks.append(InlineAccumulator::from(""));
        for (idx, target) in std::mem::take(&mut self.targets).into_iter().enumerate() {
            let mut content = InlineAccumulator::from(format!("[{}] ", idx + 1));
            content.merge(InlineAccumulator::from(target).tagged(Marker::Link));
            blocks.merge(BlockAccumulator::from(content).nested(BlockStyle::Link));
        }
        self.index.clear();
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_first_seen_ordered() {
        let mut links = LinkRegistry::new();
        assert_eq!(links.register("http://x"), 1);
        assert_eq!(links.register("http://y"), 2);
        assert_eq!(links.register("http://x"), 1);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn empty_flush_emits_nothing() {
        assert!(LinkRegistry::new().flush().is_empty());
    }

    #[test]
    fn flush_emits_separator_and_references_then_resets() {
        let mut links = LinkRegistry::new();
        links.register("http://example.com");
        links.register("http://second.example");

        let blocks = links.flush();
        assert_eq!(blocks.len(), 3);

        let rows = blocks.elements();
        assert_eq!(rows[0].content.text(), "");
        assert!(rows[0].styles.is_empty());
        assert_eq!(rows[1].content.text(), "[1] http://example.com");
        assert_eq!(rows[2].content.text(), "[2] http://second.example");
        assert_eq!(rows[1].styles, vec![BlockStyle::Link]);

        let runs = rows[1].content.elements();
        assert!(runs[0].markers.is_empty());
        assert!(runs[1].has(Marker::Link));

        assert!(links.is_empty());
        assert!(links.flush().is_empty());
        assert_eq!(links.register("http://second.example"), 1);
    }
}
