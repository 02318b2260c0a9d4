//! Markdown to content tree.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::tree::{Element, Node};

/// Parser options: GitHub flavored markdown.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Builds a tree from parser events.
///
/// Each start tag opens zero or more elements; `groups` remembers how many so
/// the matching end tag closes the same number.
struct TreeBuilder {
    stack: Vec<Element>,
    groups: Vec<usize>,
    in_table_head: bool,
}

impl TreeBuilder {
    fn new(root: Element) -> Self {
        Self {
            stack: vec![root],
            groups: Vec::new(),
            in_table_head: false,
        }
    }

    fn current(&mut self) -> &mut Element {
        // The root is never popped.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open(&mut self, elements: Vec<Element>) {
        self.groups.push(elements.len());
        self.stack.extend(elements);
    }

    fn close(&mut self) {
        let count = self.groups.pop().unwrap_or(0);
        for _ in 0..count {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if self.stack.len() > 1
            && let Some(element) = self.stack.pop()
        {
            self.current().push(element);
        }
    }

    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.pop();
        }
        self.stack.pop().unwrap_or_else(|| Element::new("div"))
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.current().push_text(&text),
            Event::Code(code) => {
                let code = Element::new("code").with_text(&code);
                self.current().push(code);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.current().push(Node::Raw(html.into_string()));
            }
            Event::SoftBreak => self.current().push_text("\n"),
            Event::HardBreak => self.current().push(Element::new("br")),
            Event::Rule => self.current().push(Element::new("hr")),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input.set_attr("checked", "");
                }
                self.current().push(input);
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.current().push_text(&math);
            }
            Event::FootnoteReference(name) => {
                let reference = Element::new("sup").with_text(&name);
                self.current().push(reference);
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let elements = match tag {
            Tag::Paragraph => vec![Element::new("p")],
            Tag::Heading { level, .. } => vec![Element::new(heading_tag(level))],
            Tag::BlockQuote(_) => vec![Element::new("blockquote")],
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = info.split_whitespace().next()
                {
                    code.set_attr("class", format!("language-{lang}"));
                }
                vec![Element::new("pre"), code]
            }
            Tag::List(Some(1)) => vec![Element::new("ol")],
            Tag::List(Some(start)) => vec![Element::new("ol").with_attr("start", start.to_string())],
            Tag::List(None) => vec![Element::new("ul")],
            Tag::Item => vec![Element::new("li")],
            Tag::Table(_) => vec![Element::new("table")],
            Tag::TableHead => {
                self.in_table_head = true;
                vec![Element::new("thead"), Element::new("tr")]
            }
            Tag::TableRow => vec![Element::new("tr")],
            Tag::TableCell => vec![Element::new(if self.in_table_head { "th" } else { "td" })],
            Tag::Emphasis => vec![Element::new("em")],
            Tag::Strong => vec![Element::new("strong")],
            Tag::Strikethrough => vec![Element::new("del")],
            Tag::Superscript => vec![Element::new("sup")],
            Tag::Subscript => vec![Element::new("sub")],
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = Element::new("a").with_attr("href", dest_url.into_string());
                if !title.is_empty() {
                    link.set_attr("title", title.into_string());
                }
                vec![link]
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = Element::new("img").with_attr("src", dest_url.into_string());
                if !title.is_empty() {
                    image.set_attr("title", title.into_string());
                }
                vec![image]
            }
            Tag::DefinitionList => vec![Element::new("dl")],
            Tag::DefinitionListTitle => vec![Element::new("dt")],
            Tag::DefinitionListDefinition => vec![Element::new("dd")],
            Tag::FootnoteDefinition(_) => vec![Element::new("div").with_attr("class", "footnote")],
            Tag::HtmlBlock | Tag::MetadataBlock(_) => Vec::new(),
        };
        self.open(elements);
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Image => {
                // Alt text arrives as children; fold it into the attribute.
                let image = self.current();
                let alt = image.text_content();
                image.children.clear();
                image.set_attr("alt", alt);
                self.close();
            }
            TagEnd::TableHead => {
                self.close();
                self.in_table_head = false;
                // Body rows go into a tbody closed together with the table.
                self.stack.push(Element::new("tbody"));
                if let Some(table) = self.groups.last_mut() {
                    *table += 1;
                }
            }
            _ => self.close(),
        }
    }
}

/// Parse markdown into a tree rooted at a `div`.
#[must_use]
pub fn parse_markdown(markdown: &str) -> Element {
    let mut builder = TreeBuilder::new(Element::new("div").with_attr("class", "markdown-rendered"));
    for event in Parser::new_ext(markdown, parser_options()) {
        builder.event(event);
    }
    builder.finish()
}
