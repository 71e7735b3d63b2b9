//! # Streaming Tag Scanner
//!
//! An incremental HTML tokenizer that drives per-tag-name listeners with
//! element-open and text events, without ever building a tree. Input arrives
//! as a sequence of buffers via [`HtmlScanner::write`]; all tokenizer state
//! lives in the scanner struct, so a tag, attribute, or text node may span
//! any number of buffer boundaries.
//!
//! The scanner is deliberately forgiving: it best-effort tokenizes malformed
//! markup and never returns an error. Comments, doctypes, processing
//! instructions, and `<script>`/`<style>` bodies are skipped; a stray `<`
//! that does not open a tag is treated as character data; an unclosed tag at
//! end of input is dropped.

/// An element-open event: the tag name and its attributes.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// The tag name, ASCII-lowercased.
    pub fn tag_name(&self) -> &str {
        &self.name
    }

    /// Looks up an attribute value by name. When the source repeats an
    /// attribute, the first occurrence wins, matching HTML parsing rules.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A fragment of character data inside a registered element.
///
/// Fragment boundaries follow input-buffer boundaries: running out of buffer
/// mid-text emits a non-final fragment, and the `<` that ends the text node
/// (or end of input) emits the final one. The final fragment is empty when
/// the text happened to end exactly on a buffer edge.
#[derive(Debug)]
pub struct TextChunk<'a> {
    text: &'a str,
    last_in_text_node: bool,
}

impl TextChunk<'_> {
    pub fn text(&self) -> &str {
        self.text
    }

    /// Whether this fragment is the last of a contiguous text node.
    pub fn last_in_text_node(&self) -> bool {
        self.last_in_text_node
    }
}

/// A listener bound to a tag name. Unused callbacks default to no-ops.
pub trait TagListener {
    /// Called once per opening tag with the parsed attributes.
    fn element(&mut self, _element: &Element) {}

    /// Called with each text fragment inside the element.
    fn text(&mut self, _chunk: &TextChunk) {}
}

/// Elements that never have content, so text following them belongs to the
/// enclosing element.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose body is raw text and must not be tokenized as markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    TagOpen,
    EndTagOpen,
    TagName,
    EndTagName,
    AfterEndTagName,
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValueDq,
    AttrValueSq,
    AttrValueUnquoted,
    SelfClosing,
    MarkupDecl,
    Comment,
    BogusComment,
    RawText,
    RawTextLt,
    RawTextEndOpen,
    RawTextEndTagName,
}

/// The incremental tokenizer. Register listeners with [`HtmlScanner::on`],
/// feed buffers with [`write`](HtmlScanner::write), then call
/// [`finish`](HtmlScanner::finish) to flush any trailing text node.
pub struct HtmlScanner<'a> {
    listeners: Vec<(String, &'a mut (dyn TagListener + Send))>,
    state: State,
    tag_name: String,
    attr_name: String,
    attr_value: String,
    attrs: Vec<(String, String)>,
    text_buf: String,
    text_node_open: bool,
    text_target: Option<String>,
    raw_tag: String,
    end_tag_buf: String,
    dash_run: u8,
    bang_run: u8,
}

impl<'a> HtmlScanner<'a> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            state: State::Text,
            tag_name: String::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            attrs: Vec::new(),
            text_buf: String::new(),
            text_node_open: false,
            text_target: None,
            raw_tag: String::new(),
            end_tag_buf: String::new(),
            dash_run: 0,
            bang_run: 0,
        }
    }

    /// Binds a listener to a tag name. Tag names are matched
    /// case-insensitively. Listeners are `Send` so a scan may be held
    /// across await points on a multi-threaded runtime.
    pub fn on(&mut self, tag: &str, listener: &'a mut (dyn TagListener + Send)) {
        self.listeners.push((tag.to_ascii_lowercase(), listener));
    }

    /// Feeds the next buffer of the document. Text accumulated when the
    /// buffer runs out is flushed to the bound listener as a non-final
    /// fragment, so chunking is observable to text listeners but never
    /// corrupts tag or attribute state.
    pub fn write(&mut self, input: &str) {
        for c in input.chars() {
            self.step(c);
        }
        if self.state == State::Text && !self.text_buf.is_empty() {
            self.emit_text(false);
        }
    }

    /// Signals end of input, flushing an unterminated text node. An
    /// incomplete tag at EOF is silently discarded; a bare trailing `<` is
    /// character data.
    pub fn finish(&mut self) {
        match self.state {
            State::Text => self.emit_text(true),
            State::TagOpen => {
                self.push_text('<');
                self.emit_text(true);
            }
            _ => {}
        }
    }

    fn step(&mut self, c: char) {
        match self.state {
            State::Text => {
                if c == '<' {
                    // The text node only ends if this turns out to open a
                    // tag; emission is deferred until the next character.
                    self.state = State::TagOpen;
                } else {
                    self.push_text(c);
                }
            }
            State::TagOpen => match c {
                '/' => {
                    self.emit_text(true);
                    self.state = State::EndTagOpen;
                }
                '!' => {
                    self.emit_text(true);
                    self.bang_run = 0;
                    self.state = State::MarkupDecl;
                }
                '?' => {
                    self.emit_text(true);
                    self.state = State::BogusComment;
                }
                '<' => self.push_text('<'),
                c if c.is_ascii_alphabetic() => {
                    self.emit_text(true);
                    self.tag_name.clear();
                    self.attrs.clear();
                    self.tag_name.push(c.to_ascii_lowercase());
                    self.state = State::TagName;
                }
                c => {
                    // Not a tag after all; the '<' was character data.
                    self.push_text('<');
                    self.push_text(c);
                    self.state = State::Text;
                }
            },
            State::TagName => match c {
                c if c.is_ascii_whitespace() => self.state = State::BeforeAttrName,
                '/' => self.state = State::SelfClosing,
                '>' => self.finish_open_tag(false),
                c => self.tag_name.push(c.to_ascii_lowercase()),
            },
            State::EndTagOpen => match c {
                c if c.is_ascii_alphabetic() => {
                    self.end_tag_buf.clear();
                    self.end_tag_buf.push(c.to_ascii_lowercase());
                    self.state = State::EndTagName;
                }
                '>' => self.state = State::Text,
                _ => self.state = State::BogusComment,
            },
            State::EndTagName => match c {
                '>' => self.finish_end_tag(),
                c if c.is_ascii_whitespace() => self.state = State::AfterEndTagName,
                c => self.end_tag_buf.push(c.to_ascii_lowercase()),
            },
            State::AfterEndTagName => {
                if c == '>' {
                    self.finish_end_tag();
                }
            }
            State::BeforeAttrName => match c {
                c if c.is_ascii_whitespace() => {}
                '/' => self.state = State::SelfClosing,
                '>' => self.finish_open_tag(false),
                c => {
                    self.attr_name.clear();
                    self.attr_value.clear();
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.state = State::AttrName;
                }
            },
            State::AttrName => match c {
                '=' => self.state = State::BeforeAttrValue,
                c if c.is_ascii_whitespace() => self.state = State::AfterAttrName,
                '/' => {
                    self.commit_attr();
                    self.state = State::SelfClosing;
                }
                '>' => {
                    self.commit_attr();
                    self.finish_open_tag(false);
                }
                c => self.attr_name.push(c.to_ascii_lowercase()),
            },
            State::AfterAttrName => match c {
                c if c.is_ascii_whitespace() => {}
                '=' => self.state = State::BeforeAttrValue,
                '/' => {
                    self.commit_attr();
                    self.state = State::SelfClosing;
                }
                '>' => {
                    self.commit_attr();
                    self.finish_open_tag(false);
                }
                c => {
                    // Previous attribute had no value; a new one starts here.
                    self.commit_attr();
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.state = State::AttrName;
                }
            },
            State::BeforeAttrValue => match c {
                c if c.is_ascii_whitespace() => {}
                '"' => self.state = State::AttrValueDq,
                '\'' => self.state = State::AttrValueSq,
                '>' => {
                    self.commit_attr();
                    self.finish_open_tag(false);
                }
                c => {
                    self.attr_value.push(c);
                    self.state = State::AttrValueUnquoted;
                }
            },
            State::AttrValueDq => match c {
                '"' => {
                    self.commit_attr();
                    self.state = State::BeforeAttrName;
                }
                c => self.attr_value.push(c),
            },
            State::AttrValueSq => match c {
                '\'' => {
                    self.commit_attr();
                    self.state = State::BeforeAttrName;
                }
                c => self.attr_value.push(c),
            },
            State::AttrValueUnquoted => match c {
                c if c.is_ascii_whitespace() => {
                    self.commit_attr();
                    self.state = State::BeforeAttrName;
                }
                '>' => {
                    self.commit_attr();
                    self.finish_open_tag(false);
                }
                c => self.attr_value.push(c),
            },
            State::SelfClosing => match c {
                '>' => self.finish_open_tag(true),
                c => {
                    self.state = State::BeforeAttrName;
                    self.step(c);
                }
            },
            State::MarkupDecl => match c {
                '-' => {
                    self.bang_run += 1;
                    if self.bang_run == 2 {
                        self.dash_run = 0;
                        self.state = State::Comment;
                    }
                }
                '>' => self.state = State::Text,
                _ => self.state = State::BogusComment,
            },
            State::Comment => match c {
                '-' => {
                    if self.dash_run < 2 {
                        self.dash_run += 1;
                    }
                }
                '>' => {
                    if self.dash_run >= 2 {
                        self.state = State::Text;
                    }
                    self.dash_run = 0;
                }
                _ => self.dash_run = 0,
            },
            State::BogusComment => {
                if c == '>' {
                    self.state = State::Text;
                }
            }
            State::RawText => {
                if c == '<' {
                    self.state = State::RawTextLt;
                }
            }
            State::RawTextLt => match c {
                '/' => {
                    self.end_tag_buf.clear();
                    self.state = State::RawTextEndOpen;
                }
                '<' => {}
                _ => self.state = State::RawText,
            },
            State::RawTextEndOpen => match c {
                c if c.is_ascii_alphabetic() => {
                    self.end_tag_buf.push(c.to_ascii_lowercase());
                    self.state = State::RawTextEndTagName;
                }
                _ => self.state = State::RawText,
            },
            State::RawTextEndTagName => match c {
                '>' => {
                    if self.end_tag_buf == self.raw_tag {
                        self.state = State::Text;
                    } else {
                        self.state = State::RawText;
                    }
                }
                c if c.is_ascii_whitespace() => {
                    if self.end_tag_buf == self.raw_tag {
                        self.state = State::AfterEndTagName;
                    } else {
                        self.state = State::RawText;
                    }
                }
                c => self.end_tag_buf.push(c.to_ascii_lowercase()),
            },
        }
    }

    fn push_text(&mut self, c: char) {
        if self.text_target.is_some() {
            self.text_buf.push(c);
            self.text_node_open = true;
        }
    }

    fn commit_attr(&mut self) {
        if !self.attr_name.is_empty() {
            self.attrs.push((
                std::mem::take(&mut self.attr_name),
                std::mem::take(&mut self.attr_value),
            ));
        } else {
            self.attr_value.clear();
        }
    }

    fn finish_open_tag(&mut self, self_closing: bool) {
        let element = Element {
            name: std::mem::take(&mut self.tag_name),
            attrs: std::mem::take(&mut self.attrs),
        };
        let mut registered = false;
        if let Some((_, listener)) = self
            .listeners
            .iter_mut()
            .find(|(name, _)| *name == element.name)
        {
            listener.element(&element);
            registered = true;
        }

        if !self_closing && RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            self.raw_tag = element.name;
            self.state = State::RawText;
            return;
        }

        if registered && !self_closing && !VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.text_target = Some(element.name);
        }
        self.state = State::Text;
    }

    fn finish_end_tag(&mut self) {
        if self.text_target.as_deref() == Some(self.end_tag_buf.as_str()) {
            self.text_target = None;
        }
        self.end_tag_buf.clear();
        self.state = State::Text;
    }

    /// Delivers buffered text to the listener of the enclosing registered
    /// element. A final fragment is emitted only if the node produced any
    /// characters; it may itself be empty when the node ended on a buffer
    /// edge.
    fn emit_text(&mut self, last: bool) {
        let Some(target) = self.text_target.clone() else {
            return;
        };
        if last && !self.text_node_open {
            return;
        }
        if !last && self.text_buf.is_empty() {
            return;
        }
        let buf = std::mem::take(&mut self.text_buf);
        if let Some((_, listener)) = self.listeners.iter_mut().find(|(name, _)| *name == target) {
            listener.text(&TextChunk {
                text: &buf,
                last_in_text_node: last,
            });
        }
        if last {
            self.text_node_open = false;
        }
    }
}

impl Default for HtmlScanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Event {
        Open(String, Vec<(String, String)>),
        Text(String, bool),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl TagListener for Recorder {
        fn element(&mut self, element: &Element) {
            self.events.push(Event::Open(
                element.tag_name().to_string(),
                element.attrs.clone(),
            ));
        }

        fn text(&mut self, chunk: &TextChunk) {
            self.events
                .push(Event::Text(chunk.text().to_string(), chunk.last_in_text_node()));
        }
    }

    fn scan_chunks(tag: &str, chunks: &[&str]) -> Vec<Event> {
        let mut recorder = Recorder::default();
        let mut scanner = HtmlScanner::new();
        scanner.on(tag, &mut recorder);
        for chunk in chunks {
            scanner.write(chunk);
        }
        scanner.finish();
        recorder.events
    }

    #[test]
    fn emits_element_open_with_attributes() {
        let events = scan_chunks(
            "meta",
            &[r#"<meta name="description" content="A page about cats.">"#],
        );
        assert_eq!(
            events,
            vec![Event::Open(
                "meta".into(),
                vec![
                    ("name".into(), "description".into()),
                    ("content".into(), "A page about cats.".into()),
                ],
            )]
        );
    }

    #[test]
    fn supports_single_quoted_unquoted_and_valueless_attributes() {
        let events = scan_chunks("meta", &["<meta name='a' content=b hidden>"]);
        assert_eq!(
            events,
            vec![Event::Open(
                "meta".into(),
                vec![
                    ("name".into(), "a".into()),
                    ("content".into(), "b".into()),
                    ("hidden".into(), String::new()),
                ],
            )]
        );
    }

    #[test]
    fn first_attribute_occurrence_wins_on_lookup() {
        let mut found = None;
        struct Probe<'a>(&'a mut Option<String>);
        impl TagListener for Probe<'_> {
            fn element(&mut self, element: &Element) {
                *self.0 = element.attribute("name").map(str::to_string);
            }
        }
        let mut probe = Probe(&mut found);
        let mut scanner = HtmlScanner::new();
        scanner.on("meta", &mut probe);
        scanner.write(r#"<meta name="first" name="second">"#);
        scanner.finish();
        assert_eq!(found.as_deref(), Some("first"));
    }

    #[test]
    fn tag_and_attribute_names_are_case_insensitive() {
        let events = scan_chunks("meta", &[r#"<META NAME="Description" CONTENT="X"/>"#]);
        assert_eq!(
            events,
            vec![Event::Open(
                "meta".into(),
                vec![
                    ("name".into(), "Description".into()),
                    ("content".into(), "X".into()),
                ],
            )]
        );
    }

    #[test]
    fn text_in_one_buffer_is_a_single_final_fragment() {
        let events = scan_chunks("title", &["<title>Hello</title>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Hello".into(), true),
            ]
        );
    }

    #[test]
    fn buffer_boundaries_split_text_into_fragments() {
        let events = scan_chunks("title", &["<ti", "tle>Hel", "lo wor", "ld</title>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Hel".into(), false),
                Event::Text("lo wor".into(), false),
                Event::Text("ld".into(), true),
            ]
        );
    }

    #[test]
    fn boundary_at_close_tag_yields_empty_final_fragment() {
        let events = scan_chunks("title", &["<title>Hello", "</title>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Hello".into(), false),
                Event::Text(String::new(), true),
            ]
        );
    }

    #[test]
    fn attribute_split_across_buffers_is_preserved() {
        let events = scan_chunks(
            "meta",
            &["<meta name=\"descri", "ption\" conte", "nt=\"A cat\">"],
        );
        assert_eq!(
            events,
            vec![Event::Open(
                "meta".into(),
                vec![
                    ("name".into(), "description".into()),
                    ("content".into(), "A cat".into()),
                ],
            )]
        );
    }

    #[test]
    fn comments_and_doctype_are_skipped() {
        let events = scan_chunks(
            "title",
            &["<!DOCTYPE html><!-- <title>not me</title> --><title>Yes</title>"],
        );
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Yes".into(), true),
            ]
        );
    }

    #[test]
    fn script_and_style_bodies_are_not_tokenized() {
        let events = scan_chunks(
            "title",
            &["<script>if (a < b) { document.write(\"<title>x</title>\"); }</script><title>Real</title>"],
        );
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Real".into(), true),
            ]
        );
    }

    #[test]
    fn raw_text_close_tag_split_across_buffers() {
        let events = scan_chunks("title", &["<style>a { b: c }</st", "yle><title>T</title>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("T".into(), true),
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_is_character_data() {
        let events = scan_chunks("title", &["<title>1 < 2 is true</title>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("1 < 2 is true".into(), true),
            ]
        );
    }

    #[test]
    fn unclosed_tag_at_eof_is_dropped_without_panicking() {
        let events = scan_chunks("meta", &["<title>x</title><meta name=\"descrip"]);
        assert_eq!(events, vec![]);
    }

    #[test]
    fn unterminated_text_node_is_flushed_at_finish() {
        let events = scan_chunks("title", &["<title>Dangling"]);
        // The buffer edge flushes a non-final fragment; finish closes the
        // node with an empty final one.
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("Dangling".into(), false),
                Event::Text(String::new(), true),
            ]
        );
    }

    #[test]
    fn trailing_lone_angle_bracket_is_text() {
        let events = scan_chunks("title", &["<title>a <"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("a <".into(), true),
            ]
        );
    }

    #[test]
    fn text_outside_registered_elements_is_ignored() {
        let events = scan_chunks("title", &["<p>outside</p><title>in</title><p>after</p>"]);
        assert_eq!(
            events,
            vec![
                Event::Open("title".into(), vec![]),
                Event::Text("in".into(), true),
            ]
        );
    }
}
