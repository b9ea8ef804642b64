//! HTML to laid-out blocks and lines
//!
//! Only the structure the page template and markdown conversion produce is
//! honoured: headings, paragraph-like containers, bold runs, links and line
//! breaks. Styling is ignored.

use scraper::{ElementRef, Html};

use super::fonts::{Face, FontSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockStyle {
    Title,
    Heading,
    Subheading,
    Body,
}

impl BlockStyle {
    pub fn font_size(self) -> f32 {
        match self {
            BlockStyle::Title => 20.0,
            BlockStyle::Heading => 16.0,
            BlockStyle::Subheading => 13.0,
            BlockStyle::Body => 11.0,
        }
    }

    pub fn space_before(self) -> f32 {
        match self {
            BlockStyle::Title => 0.0,
            BlockStyle::Heading => 14.0,
            BlockStyle::Subheading => 10.0,
            BlockStyle::Body => 6.0,
        }
    }

    fn always_bold(self) -> bool {
        !matches!(self, BlockStyle::Body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn face(&self) -> Face {
        if self.bold {
            Face::Bold
        } else {
            Face::Regular
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub style: BlockStyle,
    pub runs: Vec<Run>,
}

pub type Line = Vec<Run>;

pub fn parse_blocks(html: &str) -> Vec<Block> {
    let document = Html::parse_document(html);
    let mut builder = BlockBuilder::new();
    builder.walk(document.root_element(), false);
    builder.flush(BlockStyle::Body);
    builder.blocks
}

struct BlockBuilder {
    blocks: Vec<Block>,
    current: Block,
}

impl BlockBuilder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            current: Block { style: BlockStyle::Body, runs: Vec::new() },
        }
    }

    fn walk(&mut self, element: ElementRef, bold: bool) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(&collapse_whitespace(text), bold);
            } else if let Some(child_element) = ElementRef::wrap(child) {
                self.visit(child_element, bold);
            }
        }
    }

    fn visit(&mut self, element: ElementRef, bold: bool) {
        match element.value().name() {
            "head" | "title" | "style" | "script" | "noscript" => {}
            "h1" => self.block(element, BlockStyle::Title, bold),
            "h2" => self.block(element, BlockStyle::Heading, bold),
            "h3" | "h4" | "h5" | "h6" => self.block(element, BlockStyle::Subheading, bold),
            "p" | "div" | "li" | "ul" | "ol" | "tr" | "blockquote" | "section" | "header"
            | "footer" => self.block(element, BlockStyle::Body, bold),
            "br" => self.flush(BlockStyle::Body),
            "strong" | "b" => self.walk(element, true),
            "a" => {
                self.walk(element, bold);
                if let Some(href) = element.value().attr("href") {
                    self.push_text(&format!(" ({})", href), false);
                }
            }
            _ => self.walk(element, bold),
        }
    }

    fn block(&mut self, element: ElementRef, style: BlockStyle, bold: bool) {
        self.flush(style);
        self.walk(element, bold);
        self.flush(BlockStyle::Body);
    }

    fn push_text(&mut self, text: &str, bold: bool) {
        if !text.is_empty() {
            append(&mut self.current.runs, text, bold);
        }
    }

    /// Close the current block and start the next one with `next_style`
    fn flush(&mut self, next_style: BlockStyle) {
        let mut runs = std::mem::take(&mut self.current.runs);
        if let Some(first) = runs.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = runs.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        runs.retain(|r| !r.text.is_empty());
        if !runs.is_empty() {
            self.blocks.push(Block { style: self.current.style, runs });
        }
        self.current.style = next_style;
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Break a block into lines no wider than `max_width` points
pub fn wrap_block(block: &Block, max_width: f32, fonts: &FontSet) -> Vec<Line> {
    let size = block.style.font_size();
    let mut lines: Vec<Line> = Vec::new();
    let mut line: Line = Vec::new();
    let mut width = 0.0;
    // Spaces at run boundaries still separate words: "a <b>b</b>"
    let mut pending_space = false;

    for run in &block.runs {
        let bold = run.bold || block.style.always_bold();
        let face = if bold { Face::Bold } else { Face::Regular };
        for (i, word) in run.text.split(' ').enumerate() {
            if i > 0 {
                pending_space = true;
            }
            if word.is_empty() {
                continue;
            }
            let piece_width = fonts.width(word, face, size);
            let sep_width = if pending_space && !line.is_empty() {
                fonts.width(" ", face, size)
            } else {
                0.0
            };
            if !line.is_empty() && width + sep_width + piece_width > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            } else if sep_width > 0.0 {
                append(&mut line, " ", bold);
                width += sep_width;
            }
            append(&mut line, word, bold);
            width += piece_width;
            pending_space = false;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn append(runs: &mut Vec<Run>, text: &str, bold: bool) {
    match runs.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => runs.push(Run { text: text.to_string(), bold }),
    }
}
