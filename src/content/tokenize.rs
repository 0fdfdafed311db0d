use crate::content::document::{Line, Segment, TagName};
use crate::content::html::Node;

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line>,
    current: Vec<Segment>,
    pre_depth: usize,
}

impl LineBuilder {
    fn break_line(&mut self) {
        let segments = std::mem::take(&mut self.current);
        self.lines.push(Line { segments });
    }

    fn push_words(&mut self, text: &str) {
        for word in text.split_whitespace() {
            self.current.push(Segment::Word(word.to_string()));
        }
    }

    fn text(&mut self, text: &str) {
        if self.pre_depth == 0 {
            self.push_words(text);
            return;
        }
        // Preformatted newlines are line breaks.
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.break_line();
            }
            self.push_words(part);
        }
    }

    fn walk(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Text(t) => self.text(t),
                Node::Element(el) => match TagName::from_name(&el.name) {
                    Some(TagName::Br) => self.break_line(),
                    Some(tag) => {
                        self.current.push(Segment::Open(tag));
                        if tag == TagName::Pre {
                            self.pre_depth += 1;
                        }
                        self.walk(&el.children);
                        if tag == TagName::Pre {
                            self.pre_depth -= 1;
                        }
                        self.current.push(Segment::Close(tag));
                    }
                    None => self.walk(&el.children),
                },
            }
        }
    }

    fn finish(mut self) -> Vec<Line> {
        self.break_line();
        self.lines
    }
}

/// Split sanitized nodes into lines of tag and word segments.
pub(crate) fn tokenize(nodes: &[Node]) -> Vec<Line> {
    let mut b = LineBuilder::default();
    b.walk(nodes);
    b.finish()
}
