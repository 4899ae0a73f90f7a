//! Markdown to styled, word-wrapped terminal text

use colored::Colorize;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use unicode_width::UnicodeWidthStr;

/// Indentation applied to code block lines
const CODE_INDENT: &str = "    ";

/// Render `source` for a terminal `width` columns wide, with no left margin.
///
/// Wrapped text never exceeds `width` terminal columns unless a single word
/// is longer than the space available; code blocks are not wrapped. Columns
/// are display columns, so wide CJK characters and emoji count as two.
pub fn render(source: &str, width: usize) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut writer = TerminalWriter::new(width.max(1));
    for event in Parser::new_ext(source, options) {
        writer.event(event);
    }
    writer.finish()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    italic: bool,
    strike: bool,
    code: bool,
    link: bool,
    dim: bool,
}

impl Style {
    fn paint(self, text: &str) -> String {
        let mut s = text.normal();
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        if self.strike {
            s = s.strikethrough();
        }
        if self.code {
            s = s.cyan();
        }
        if self.link {
            s = s.blue().underline();
        }
        if self.dim {
            s = s.dimmed();
        }
        s.to_string()
    }
}

#[derive(Debug, Clone)]
struct Piece {
    text: String,
    style: Style,
}

enum Token {
    Word(Vec<Piece>),
    Break,
}

/// Left gutter contributed by an enclosing block
enum Gutter {
    Quote,
    Item { marker: String, pending: bool },
}

/// One entry per open pulldown-cmark tag; every `End` pops one
enum Open {
    Block,
    Heading,
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String, start: usize },
    Image { dest: String },
    List,
    Item,
    Quote,
    CodeBlock,
    TableHead,
    TableRow,
    TableCell,
    Inline,
}

struct TerminalWriter {
    width: usize,
    lines: Vec<String>,
    pieces: Vec<Piece>,
    open: Vec<Open>,
    gutters: Vec<Gutter>,
    /// Next number of each open list, `None` for bullet lists
    lists: Vec<Option<u64>>,
    code: Option<String>,
    /// (plain, styled) cells of the table row being built
    cells: Vec<(String, String)>,
}

impl TerminalWriter {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            pieces: Vec::new(),
            open: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            code: None,
            cells: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, self.style());
                }
            }
            Event::Code(text) => {
                let style = Style {
                    code: true,
                    ..self.style()
                };
                self.push_text(&text, style);
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, self.style()),
            Event::SoftBreak => self.push_text(" ", self.style()),
            Event::HardBreak => self.push_text("\n", self.style()),
            Event::Rule => {
                self.start_block();
                let rule = "─".repeat(self.width.saturating_sub(self.gutter_width()).max(1));
                let prefix = self.take_prefix();
                self.lines.push(format!("{}{}", prefix, rule.dimmed()));
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker, self.style());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                self.start_block();
                Open::Block
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let hashes = "#".repeat(heading_depth(level));
                self.push_text(&format!("{} ", hashes), Style {
                    bold: true,
                    ..Style::default()
                });
                Open::Heading
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.gutters.push(Gutter::Quote);
                Open::Quote
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.code = Some(String::new());
                Open::CodeBlock
            }
            Tag::HtmlBlock => {
                self.start_block();
                Open::Block
            }
            Tag::List(first) => {
                if self.in_item() {
                    self.flush_inline();
                } else {
                    self.start_block();
                }
                self.lists.push(first);
                Open::List
            }
            Tag::Item => {
                self.flush_inline();
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{}. ", next);
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.gutters.push(Gutter::Item {
                    marker,
                    pending: true,
                });
                Open::Item
            }
            Tag::Table(_) => {
                self.start_block();
                Open::Block
            }
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => {
                self.pieces.clear();
                Open::TableCell
            }
            Tag::Emphasis => Open::Emphasis,
            Tag::Strong => Open::Strong,
            Tag::Strikethrough => Open::Strikethrough,
            Tag::Link { dest_url, .. } => Open::Link {
                dest: dest_url.to_string(),
                start: self.pieces.len(),
            },
            Tag::Image { dest_url, .. } => {
                self.push_text("[image: ", self.style());
                Open::Image {
                    dest: dest_url.to_string(),
                }
            }
            _ => Open::Inline,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };

        match open {
            Open::Block | Open::Heading => self.flush_inline(),
            Open::Quote => {
                self.flush_inline();
                self.gutters.pop();
            }
            Open::List => {
                self.flush_inline();
                self.lists.pop();
            }
            Open::Item => {
                self.flush_inline();
                let empty_item =
                    matches!(self.gutters.last(), Some(Gutter::Item { pending: true, .. }));
                if empty_item {
                    let prefix = self.take_prefix();
                    self.lines.push(prefix.trim_end().to_string());
                }
                self.gutters.pop();
            }
            Open::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                for line in code.trim_end_matches('\n').lines() {
                    let prefix = self.take_prefix();
                    self.lines
                        .push(format!("{}{}{}", prefix, CODE_INDENT, line.cyan()));
                }
            }
            Open::Link { dest, start } => {
                let text: String = self
                    .pieces
                    .get(start..)
                    .unwrap_or_default()
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect();
                if !dest.is_empty() && text.trim() != dest && !dest.starts_with('#') {
                    self.push_text(&format!(" ({})", dest), Style {
                        dim: true,
                        ..Style::default()
                    });
                }
            }
            Open::Image { dest } => {
                self.push_text("]", self.style());
                if !dest.is_empty() {
                    self.push_text(&format!(" ({})", dest), Style {
                        dim: true,
                        ..Style::default()
                    });
                }
            }
            Open::TableCell => {
                let plain: String = self.pieces.iter().map(|p| p.text.as_str()).collect();
                let styled: String = self
                    .pieces
                    .drain(..)
                    .map(|p| p.style.paint(&p.text))
                    .collect();
                self.cells.push((plain.trim().to_string(), styled.trim().to_string()));
            }
            Open::TableHead => {
                let visible = self.emit_row();
                let prefix = self.take_prefix();
                self.lines
                    .push(format!("{}{}", prefix, "─".repeat(visible.max(1)).dimmed()));
            }
            Open::TableRow => {
                self.emit_row();
            }
            Open::Emphasis | Open::Strong | Open::Strikethrough | Open::Inline => {}
        }
    }

    /// Style implied by the inline tags currently open
    fn style(&self) -> Style {
        let mut style = Style::default();
        for open in &self.open {
            match open {
                Open::Heading | Open::Strong | Open::TableHead => style.bold = true,
                Open::Emphasis => style.italic = true,
                Open::Strikethrough => style.strike = true,
                Open::Link { .. } => style.link = true,
                _ => {}
            }
        }
        style
    }

    fn in_item(&self) -> bool {
        self.gutters
            .iter()
            .any(|g| matches!(g, Gutter::Item { .. }))
    }

    fn push_text(&mut self, text: &str, style: Style) {
        match self.pieces.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.pieces.push(Piece {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Separate a new block from what precedes it with one blank line
    fn start_block(&mut self) {
        self.flush_inline();

        let first_in_item = matches!(self.gutters.last(), Some(Gutter::Item { pending: true, .. }));
        let after_blank = self.lines.last().map_or(true, |l| is_blank(l));
        if !first_in_item && !after_blank {
            let blank = self.blank_prefix();
            self.lines.push(blank);
        }
    }

    fn gutter_width(&self) -> usize {
        self.gutters
            .iter()
            .map(|g| match g {
                Gutter::Quote => 2,
                Gutter::Item { marker, .. } => marker.width(),
            })
            .sum()
    }

    /// Gutter text for the next line; consumes pending list markers
    fn take_prefix(&mut self) -> String {
        let mut prefix = String::new();
        for gutter in &mut self.gutters {
            match gutter {
                Gutter::Quote => {
                    prefix.push_str(&"│".dimmed().to_string());
                    prefix.push(' ');
                }
                Gutter::Item { marker, pending } => {
                    if *pending {
                        prefix.push_str(marker);
                        *pending = false;
                    } else {
                        prefix.push_str(&" ".repeat(marker.width()));
                    }
                }
            }
        }
        prefix
    }

    /// Gutter for an empty line: quote bars only
    fn blank_prefix(&self) -> String {
        let bars = self
            .gutters
            .iter()
            .filter(|g| matches!(g, Gutter::Quote))
            .count();
        (0..bars)
            .map(|_| "│".dimmed().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Word-wrap the buffered inline text into lines
    fn flush_inline(&mut self) {
        if self.pieces.is_empty() {
            return;
        }
        let pieces = std::mem::take(&mut self.pieces);
        let available = self.width.saturating_sub(self.gutter_width()).max(1);

        let mut wrapped: Vec<String> = Vec::new();
        let mut line = String::new();
        let mut line_len = 0;

        for token in tokenize(&pieces) {
            match token {
                Token::Word(word) => {
                    let word_len: usize = word.iter().map(|p| p.text.width()).sum();
                    if line_len > 0 && line_len + 1 + word_len > available {
                        wrapped.push(std::mem::take(&mut line));
                        line_len = 0;
                    }
                    if line_len > 0 {
                        line.push(' ');
                        line_len += 1;
                    }
                    for piece in &word {
                        line.push_str(&piece.style.paint(&piece.text));
                    }
                    line_len += word_len;
                }
                Token::Break => {
                    wrapped.push(std::mem::take(&mut line));
                    line_len = 0;
                }
            }
        }
        if line_len > 0 {
            wrapped.push(line);
        }

        while wrapped.last().is_some_and(|l| l.is_empty()) {
            wrapped.pop();
        }

        for text in wrapped {
            let prefix = self.take_prefix();
            self.lines.push(format!("{}{}", prefix, text).trim_end().to_string());
        }
    }

    /// Emit the buffered table cells as one line; returns its visible width
    fn emit_row(&mut self) -> usize {
        let cells = std::mem::take(&mut self.cells);
        let visible = cells
            .iter()
            .map(|(plain, _)| plain.width())
            .sum::<usize>()
            + 3 * cells.len().saturating_sub(1);
        let styled: Vec<String> = cells.into_iter().map(|(_, styled)| styled).collect();
        let prefix = self.take_prefix();
        self.lines.push(format!("{}{}", prefix, styled.join(" │ ")));
        visible
    }

    fn finish(mut self) -> String {
        self.flush_inline();
        while self.lines.last().is_some_and(|l| is_blank(l)) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

/// Split styled text into words; whitespace separates, newlines force a break
fn tokenize(pieces: &[Piece]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<Piece> = Vec::new();

    for piece in pieces {
        for ch in piece.text.chars() {
            if ch == '\n' || ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                if ch == '\n' {
                    tokens.push(Token::Break);
                }
                continue;
            }
            match word.last_mut() {
                Some(last) if last.style == piece.style => last.text.push(ch),
                _ => word.push(Piece {
                    text: ch.to_string(),
                    style: piece.style,
                }),
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// True for lines with nothing but whitespace, quote bars and ANSI escapes
fn is_blank(line: &str) -> bool {
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\u{1b}' => {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            '│' => {}
            c if c.is_whitespace() => {}
            _ => return false,
        }
    }
    true
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
