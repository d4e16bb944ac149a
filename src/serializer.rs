//! XML serialization
//!
//! Every node and container implements [`XmlSerialize`]. The entry points
//! ([`serialize`], [`serialize_with`], [`write_to`]) validate the tree first and
//! refuse to render it if any violation is found.

use std::io::{self, Write};

use log::{debug, warn};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::alternation::{Alternation, Choice, Group};
use crate::config::OutputConfig;
use crate::element::Element;
use crate::error::{ModelError, Result};
use crate::quantified::Quantified;
use crate::slot::Slot;

/// Rendering of a node or container as XML events
pub trait XmlSerialize {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()>;
}

/// Event writer producing XML text, indented when the output config asks for it
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    indenting: bool,
    self_close_empty: bool,
}

impl XmlWriter {
    pub fn new(config: &OutputConfig) -> Self {
        let writer = if config.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', config.indent)
        } else {
            Writer::new(Vec::new())
        };
        Self {
            writer,
            indenting: config.indent > 0,
            self_close_empty: config.self_close_empty,
        }
    }

    /// A writer that never breaks lines
    fn plain(self_close_empty: bool) -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            indenting: false,
            self_close_empty,
        }
    }

    pub fn is_indenting(&self) -> bool {
        self.indenting
    }

    pub fn self_close_empty(&self) -> bool {
        self.self_close_empty
    }

    pub fn write_event<'a>(&mut self, event: impl Into<Event<'a>>) -> io::Result<()> {
        self.writer.write_event(event)
    }

    pub fn declaration(&mut self) -> io::Result<()> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Write character data, escaping the five XML-significant characters
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.write_event(Event::Text(BytesText::new(text)))
    }

    /// Render `content` on a single line and emit it as one escaped text run,
    /// so the indenting writer adds no whitespace inside it
    pub fn write_inline(
        &mut self,
        content: impl FnOnce(&mut XmlWriter) -> io::Result<()>,
    ) -> io::Result<()> {
        if !self.indenting {
            return content(self);
        }
        let mut inline = XmlWriter::plain(self.self_close_empty);
        content(&mut inline)?;
        let rendered = inline.finish()?;
        self.write_event(Event::Text(BytesText::from_escaped(rendered)))
    }

    pub fn finish(self) -> io::Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl XmlSerialize for Element {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        let mut start = BytesStart::new(self.name());
        for attribute in self.attributes() {
            start.push_attribute(attribute);
        }

        if !self.has_content() && writer.self_close_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        let block = writer.is_indenting() && self.has_content() && !self.has_inline_text();
        if block {
            self.write_content(writer)?;
        } else {
            writer.write_inline(|inline| self.write_content(inline))?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name())))
    }
}

impl Element {
    fn write_content(&self, writer: &mut XmlWriter) -> io::Result<()> {
        match self.text() {
            Some(text) => writer.text(text),
            None => self.slots().iter().try_for_each(|slot| slot.write_xml(writer)),
        }
    }
}

impl XmlSerialize for Slot {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        match self {
            Slot::Quantified(q) => q.write_xml(writer),
            Slot::Alternation(a) => a.write_xml(writer),
            Slot::Text(t) => writer.text(t.value()),
        }
    }
}

impl XmlSerialize for Quantified {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        self.iter().try_for_each(|item| item.write_xml(writer))
    }
}

impl XmlSerialize for Alternation {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        match self.value() {
            Some(value) => value.write_xml(writer),
            None => Ok(()),
        }
    }
}

impl XmlSerialize for Choice {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        match self {
            Choice::Element(element) => element.write_xml(writer),
            Choice::Text(text) => writer.text(text),
            Choice::Group(group) => group.write_xml(writer),
        }
    }
}

impl XmlSerialize for Group {
    fn write_xml(&self, writer: &mut XmlWriter) -> io::Result<()> {
        self.slots().iter().try_for_each(|slot| slot.write_xml(writer))
    }
}

/// Validate `node` and render it with default output settings
pub fn serialize(node: &Element) -> Result<String> {
    serialize_with(node, &OutputConfig::default())
}

/// Validate `node` and render it; an invalid tree is never rendered
pub fn serialize_with(node: &Element, config: &OutputConfig) -> Result<String> {
    if let Err(report) = node.validate() {
        warn!(
            "refusing to serialize <{}>: {} violation(s)",
            node.name(),
            report.len()
        );
        return Err(ModelError::Invalid(report));
    }

    debug!("serializing <{}>", node.name());
    let mut writer = XmlWriter::new(config);
    if config.xml_declaration {
        writer.declaration()?;
    }
    node.write_xml(&mut writer)?;
    Ok(writer.finish()?)
}

/// Validate `node` and write the rendered document to `out`
pub fn write_to<W: Write>(node: &Element, config: &OutputConfig, mut out: W) -> Result<()> {
    let xml = serialize_with(node, config)?;
    out.write_all(xml.as_bytes())?;
    out.flush()?;
    Ok(())
}
