use pulldown_cmark::{Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::block::{BlockAccumulator, BlockStyle, InlineAccumulator, Marker};
use crate::collector::{Collector, Fragment};
use crate::error::Error;
use crate::links::LinkRegistry;

fn options() -> Options {
    // Tables, footnotes and front matter are enabled so they are recognised
    // and dropped instead of leaking through as literal text.
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options
}

/// Parse markdown into a finished block list, including link reference rows.
pub fn collect(markdown: &str) -> Result<BlockAccumulator, Error> {
    let mut hooks = Hooks::new();
    let root = parse(markdown, &mut hooks)?;
    Ok(root.finish(hooks.links_mut()))
}

/// Run the event source over `markdown`, returning the root collector.
///
/// Every `Start` event opens a fresh collector. Leaf events and `End` events
/// go through `hooks`, and the resulting fragment is combined into the
/// innermost open collector.
pub fn parse(markdown: &str, hooks: &mut Hooks) -> Result<Collector, Error> {
    let mut root = Collector::new();
    let mut stack: Vec<(Tag, Collector)> = Vec::new();

    for event in Parser::new_ext(markdown, options()) {
        let fragment = match event {
            Event::Start(tag) => {
                stack.push((tag, Collector::new()));
                continue;
            }
            Event::End(end) => {
                let (tag, body) = stack.pop().ok_or_else(|| {
                    Error::Protocol(format!("{:?} closed with no open element", end))
                })?;
                if tag.to_end() != end {
                    return Err(Error::Protocol(format!(
                        "{:?} closed by mismatched {:?}",
                        tag, end
                    )));
                }
                hooks.element(tag, body)?
            }
            leaf => hooks.leaf(leaf),
        };

        match stack.last_mut() {
            Some((_, collector)) => collector.append(fragment),
            None => root.append(fragment),
        }
    }

    if let Some((tag, _)) = stack.last() {
        return Err(Error::Protocol(format!("{:?} never closed", tag)));
    }

    Ok(root)
}

/// Turns each recognised construct into a fragment. Owns the link registry
/// for one conversion.
#[derive(Debug, Default)]
pub struct Hooks {
    links: LinkRegistry,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links_mut(&mut self) -> &mut LinkRegistry {
        &mut self.links
    }

    /// Hook for a closed container; `body` holds everything combined into it.
    pub fn element(&mut self, tag: Tag, body: Collector) -> Result<Fragment, Error> {
        let fragment: Fragment = match tag {
            Tag::Paragraph => body.into_block().into(),
            Tag::Heading { level, .. } => at_least_one_row(body)
                .nested(BlockStyle::Heading(heading_level_to_u8(level)))
                .into(),
            Tag::BlockQuote(_) => body.into_block().nested(BlockStyle::Quote).into(),
            Tag::CodeBlock(_) => {
                let code = body.into_inline("code block")?.text();
                let code = code.strip_suffix('\n').unwrap_or(&code);
                BlockAccumulator::from(InlineAccumulator::from(code).tagged(Marker::Code))
                    .nested(BlockStyle::Code)
                    .into()
            }
            Tag::List(_) => body.into_block().nested(BlockStyle::List).into(),
            Tag::Item => at_least_one_row(body)
                .nested(BlockStyle::ListItem)
                .into(),

            Tag::Emphasis => body.into_inline("emphasis")?.tagged(Marker::Italic).into(),
            Tag::Strong => body.into_inline("strong")?.tagged(Marker::Bold).into(),
            Tag::Strikethrough => body
                .into_inline("strikethrough")?
                .tagged(Marker::Strike)
                .into(),
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => {
                let mut content = body.into_inline("link")?.tagged(Marker::Link);
                match link_type {
                    LinkType::Autolink | LinkType::Email => {}
                    _ => {
                        let idx = self.links.register(&dest_url);
                        content.append(format!("[{}]", idx));
                    }
                }
                content.into()
            }

            Tag::Image { .. }
            | Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::HtmlBlock
            | Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_) => {
                log::debug!("Skipping unsupported {:?}", tag);
                Fragment::Absent
            }

            _ => Fragment::Nested(body),
        };
        Ok(fragment)
    }

    /// Hook for an event with no children.
    pub fn leaf(&mut self, event: Event) -> Fragment {
        match event {
            Event::Text(text) => InlineAccumulator::from(text.into_string()).into(),
            Event::Code(code) => InlineAccumulator::from(code.into_string())
                .tagged(Marker::Code)
                .into(),
            Event::SoftBreak | Event::HardBreak => InlineAccumulator::from("\n").into(),
            Event::Rule => BlockAccumulator::from(InlineAccumulator::from(""))
                .nested(BlockStyle::Rule)
                .into(),
            other => {
                log::debug!("Skipping unsupported {:?}", other);
                Fragment::Absent
            }
        }
    }
}

/// Rows for a construct that occupies a row even when it has no content.
fn at_least_one_row(body: Collector) -> BlockAccumulator {
    let block = body.into_block();
    if block.is_empty() {
        BlockAccumulator::from(InlineAccumulator::new())
    } else {
        block
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
