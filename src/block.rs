use std::collections::BTreeSet;

/// Inline formatting applied to a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    Bold,
    Italic,
    Code,
    Strike,
    Link,
}

/// Block-level style tags, stored outermost first on each block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStyle {
    Heading(u8),
    Quote,
    List,
    ListItem,
    Code,
    Rule,
    Link,
}

/// A run of text with its inline markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineElement {
    pub text: String,
    pub markers: BTreeSet<Marker>,
}

impl InlineElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markers: BTreeSet::new(),
        }
    }

    pub fn has(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }
}

/// Ordered runs that end up as the rich text of a single cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineAccumulator {
    elements: Vec<InlineElement>,
}

impl InlineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run with no markers.
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(InlineElement::new(text));
        self
    }

    pub fn merge(&mut self, other: InlineAccumulator) -> &mut Self {
        self.elements.extend(other.elements);
        self
    }

    /// Add `marker` to every run collected so far.
    pub fn tag_all(&mut self, marker: Marker) -> &mut Self {
        for element in &mut self.elements {
            element.markers.insert(marker);
        }
        self
    }

    /// Builder form of [`tag_all`](Self::tag_all).
    pub fn tagged(mut self, marker: Marker) -> Self {
        self.tag_all(marker);
        self
    }

    pub fn elements(&self) -> &[InlineElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Concatenated text of all runs, markers ignored.
    pub fn text(&self) -> String {
        self.elements.iter().map(|e| e.text.as_str()).collect()
    }
}

impl From<&str> for InlineAccumulator {
    fn from(text: &str) -> Self {
        let mut inline = Self::new();
        inline.append(text);
        inline
    }
}

impl From<String> for InlineAccumulator {
    fn from(text: String) -> Self {
        let mut inline = Self::new();
        inline.append(text);
        inline
    }
}

impl IntoIterator for InlineAccumulator {
    type Item = InlineElement;
    type IntoIter = std::vec::IntoIter<InlineElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// One grid row worth of content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockElement {
    pub content: InlineAccumulator,
    pub styles: Vec<BlockStyle>,
}

impl BlockElement {
    pub fn has_style(&self, style: BlockStyle) -> bool {
        self.styles.contains(&style)
    }
}

/// Ordered blocks; insertion order is row order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAccumulator {
    elements: Vec<BlockElement>,
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` as a new unstyled block.
    pub fn append(&mut self, content: InlineAccumulator) -> &mut Self {
        self.elements.push(BlockElement {
            content,
            styles: Vec::new(),
        });
        self
    }

    pub fn merge(&mut self, other: BlockAccumulator) -> &mut Self {
        self.elements.extend(other.elements);
        self
    }

    /// Wrap every block collected so far in `style`.
    ///
    /// The tag is prepended, so applying nests from the innermost construct
    /// outwards leaves each style list reading outermost first.
    pub fn nest(&mut self, style: BlockStyle) -> &mut Self {
        for element in &mut self.elements {
            element.styles.insert(0, style);
        }
        self
    }

    /// Builder form of [`nest`](Self::nest).
    pub fn nested(mut self, style: BlockStyle) -> Self {
        self.nest(style);
        self
    }

    pub fn elements(&self) -> &[BlockElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<InlineAccumulator> for BlockAccumulator {
    fn from(content: InlineAccumulator) -> Self {
        let mut block = Self::new();
        block.append(content);
        block
    }
}

impl IntoIterator for BlockAccumulator {
    type Item = BlockElement;
    type IntoIter = std::vec::IntoIter<BlockElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
