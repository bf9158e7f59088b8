//! Reshapes hook output into a block/inline tree.
//!
//! The event driver opens a fresh [`Collector`] for every container it
//! enters and combines each hook result into the innermost open one. A
//! collector ends up holding either blocks (future rows) or inline runs
//! (future rich text), and [`Collector::into_block`] turns whatever it holds
//! into rows when a block construct closes.

use crate::block::{BlockAccumulator, InlineAccumulator};
use crate::error::Error;
use crate::links::LinkRegistry;

/// A value handed to [`Collector::combine`].
#[derive(Debug)]
pub enum Fragment {
    Block(BlockAccumulator),
    Inline(InlineAccumulator),
    Nested(Collector),
    /// An unsupported construct. Combining it is a no-op.
    Absent,
}

impl From<BlockAccumulator> for Fragment {
    fn from(block: BlockAccumulator) -> Self {
        Fragment::Block(block)
    }
}

impl From<InlineAccumulator> for Fragment {
    fn from(inline: InlineAccumulator) -> Self {
        Fragment::Inline(inline)
    }
}

impl From<Collector> for Fragment {
    fn from(collector: Collector) -> Self {
        Fragment::Nested(collector)
    }
}

#[derive(Debug, Default)]
pub struct Collector {
    block: Option<BlockAccumulator>,
    inline: Option<InlineAccumulator>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combine(mut self, fragment: impl Into<Fragment>) -> Self {
        self.append(fragment);
        self
    }

    pub fn append(&mut self, fragment: impl Into<Fragment>) {
        match fragment.into() {
            Fragment::Block(block) => self.append_block(block),
            Fragment::Inline(inline) => self.append_inline(inline),
            Fragment::Nested(other) => match other.block {
                Some(block) => {
                    self.append_block(block);
                    // Text left over after the other collector's blocks
                    // becomes a row of its own.
                    if let Some(trailing) = other.inline {
                        self.append_block(BlockAccumulator::from(trailing));
                    }
                }
                None => {
                    if let Some(inline) = other.inline {
                        self.append_inline(inline);
                    }
                }
            },
            Fragment::Absent => {}
        }
    }

    fn append_block(&mut self, block: BlockAccumulator) {
        // Text collected before the first block (a list item's own text ahead
        // of its sub-list) becomes the first row.
        let pending = self.block.get_or_insert_with(|| match self.inline.take() {
            Some(inline) => BlockAccumulator::from(inline),
            None => BlockAccumulator::new(),
        });
        pending.merge(block);
    }

    fn append_inline(&mut self, inline: InlineAccumulator) {
        match self.inline.as_mut() {
            Some(pending) => {
                pending.merge(inline);
            }
            None => self.inline = Some(inline),
        }
    }

    #[cfg(test)]
    pub(crate) fn block(&self) -> Option<&BlockAccumulator> {
        self.block.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn inline(&self) -> Option<&InlineAccumulator> {
        self.inline.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.block.is_none() && self.inline.is_none()
    }

    /// Everything collected, as rows. Trailing inline content after blocks is
    /// emitted as a separate final row.
    pub fn into_block(self) -> BlockAccumulator {
        match (self.block, self.inline) {
            (Some(mut block), Some(trailing)) => {
                block.append(trailing);
                block
            }
            (Some(block), None) => block,
            (None, Some(inline)) => BlockAccumulator::from(inline),
            (None, None) => BlockAccumulator::new(),
        }
    }

    /// The collected runs for an inline construct named `construct`.
    ///
    /// Fails if block content reached an inline construct, since the event
    /// source never nests blocks inside inlines.
    pub fn into_inline(self, construct: &str) -> Result<InlineAccumulator, Error> {
        if let Some(block) = self.block {
            return Err(Error::Protocol(format!(
                "{} block(s) collected inside inline construct `{}`",
                block.len(),
                construct
            )));
        }
        Ok(self.inline.unwrap_or_default())
    }

    /// Finalize the document root: wrap bare inline content as a row, then
    /// append the link reference rows and reset the registry.
    pub fn finish(self, links: &mut LinkRegistry) -> BlockAccumulator {
        let mut root = Collector {
            block: Some(self.into_block()),
            inline: None,
        };
        let references = links.flush();
        if !references.is_empty() {
            root.append(references);
        }
        root.into_block()
    }
}
