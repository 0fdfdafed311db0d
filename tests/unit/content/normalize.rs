use super::*;

fn words(doc: &ContentDocument) -> Vec<String> {
    doc.words().map(str::to_string).collect()
}

#[test]
fn empty_input_is_single_empty_line() {
    let doc = normalize("");
    assert_eq!(doc.lines().len(), 1);
    assert!(doc.lines()[0].segments.is_empty());
    assert_eq!(doc.word_count(), 0);
}

#[test]
fn bold_markdown_becomes_bold_tag_without_asterisks() {
    let doc = normalize("**bold**");
    assert_eq!(doc.format(), ContentFormat::Markdown);
    assert_eq!(
        doc.lines()[0].segments,
        vec![
            Segment::Open(TagName::B),
            Segment::Word("bold".to_string()),
            Segment::Close(TagName::B),
        ]
    );
    assert!(doc.words().all(|w| !w.contains('*')));
}

#[test]
fn script_tag_is_unwrapped_into_plain_tokens() {
    let doc = normalize("<p>hi</p><script>alert(1)</script>");
    assert_eq!(doc.format(), ContentFormat::Html);
    assert_eq!(words(&doc), vec!["hi", "alert(1)"]);
    let html = doc.to_html();
    assert!(!html.contains("<script"));
    assert!(html.contains("<span class=\"karaoke-word\">alert(1)</span>"));
}

#[test]
fn every_whitespace_run_separates_word_tokens() {
    let doc = normalize("<p>  one\ttwo \n three  </p>");
    assert_eq!(words(&doc), vec!["one", "two", "three"]);
}

#[test]
fn line_breaks_split_lines() {
    let doc = normalize("first line\nsecond *line*");
    assert_eq!(doc.format(), ContentFormat::Markdown);
    assert_eq!(doc.lines().len(), 2);
    assert_eq!(doc.lines()[0].words().collect::<Vec<_>>(), vec!["first", "line"]);
    assert_eq!(
        doc.lines()[1].segments,
        vec![
            Segment::Word("second".to_string()),
            Segment::Open(TagName::I),
            Segment::Word("line".to_string()),
            Segment::Close(TagName::I),
        ]
    );
}

#[test]
fn plain_text_keeps_its_lines_inside_pre() {
    let doc = normalize("alpha beta\ngamma");
    assert_eq!(doc.format(), ContentFormat::Text);
    assert_eq!(doc.lines().len(), 2);
    assert_eq!(doc.lines()[0].segments[0], Segment::Open(TagName::Pre));
    assert_eq!(
        doc.lines()[1].segments.last(),
        Some(&Segment::Close(TagName::Pre))
    );
    assert_eq!(words(&doc), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn nested_preserved_tags_keep_structure() {
    let doc = normalize("<ul><li><b>x</b> y</li></ul>");
    assert_eq!(
        doc.lines()[0].segments,
        vec![
            Segment::Open(TagName::Ul),
            Segment::Open(TagName::Li),
            Segment::Open(TagName::B),
            Segment::Word("x".to_string()),
            Segment::Close(TagName::B),
            Segment::Word("y".to_string()),
            Segment::Close(TagName::Li),
            Segment::Close(TagName::Ul),
        ]
    );
}

#[test]
fn to_html_wraps_words_and_joins_lines() {
    let doc = normalize("<b>a b</b><br>c");
    assert_eq!(
        doc.to_html(),
        "<div><b><span class=\"karaoke-word\">a</span> <span class=\"karaoke-word\">b</span></b></div><br><div><span class=\"karaoke-word\">c</span></div>"
    );
}

#[test]
fn preview_depends_on_format() {
    assert_eq!(preview_html("plain"), "<pre>plain</pre>");
    assert_eq!(preview_html("# T"), "<h1>T</h1>");
    assert_eq!(preview_html("<i>x</i>"), "<i>x</i>");
}

#[test]
fn default_content_normalizes_to_several_lines() {
    let doc = normalize(DEFAULT_CONTENT);
    assert!(doc.lines().len() > 5);
    assert!(doc.word_count() > 10);
}

#[test]
fn misnested_markup_recovers_like_a_browser() {
    let doc = normalize("<b>a <i>b</b> c</i>");
    let w = |s: &str| Segment::Word(s.to_string());
    assert_eq!(
        doc.lines()[0].segments,
        vec![
            Segment::Open(TagName::B),
            w("a"),
            Segment::Open(TagName::I),
            w("b"),
            Segment::Close(TagName::I),
            Segment::Close(TagName::B),
            Segment::Open(TagName::I),
            w("c"),
            Segment::Close(TagName::I),
        ]
    );
}

#[test]
fn entities_decode_before_tokenizing() {
    let doc = normalize("<p>salt &amp; pepper&nbsp;mill</p>");
    assert_eq!(words(&doc), vec!["salt", "&", "pepper", "mill"]);
}
