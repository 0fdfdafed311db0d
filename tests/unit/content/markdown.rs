use super::*;

#[test]
fn rules_run_in_documented_order() {
    let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec![
            "fenced_code",
            "heading_3",
            "heading_2",
            "heading_1",
            "bold_italic",
            "bold",
            "italic",
            "inline_code",
            "list_item",
            "list_wrap",
            "line_break",
        ]
    );
}

#[test]
fn headings_by_level() {
    assert_eq!(markdown_to_html("# One"), "<h1>One</h1>");
    assert_eq!(markdown_to_html("## Two"), "<h2>Two</h2>");
    assert_eq!(markdown_to_html("### Three"), "<h3>Three</h3>");
}

#[test]
fn emphasis_longest_marker_first() {
    assert_eq!(markdown_to_html("***both***"), "<b><i>both</i></b>");
    assert_eq!(markdown_to_html("**bold**"), "<b>bold</b>");
    assert_eq!(markdown_to_html("*it*"), "<i>it</i>");
}

#[test]
fn inline_code_and_fenced_block() {
    assert_eq!(markdown_to_html("use `x`"), "use <code>x</code>");
    assert_eq!(
        markdown_to_html("```\nfn main()\n```"),
        "<pre><br>fn main()<br></pre>"
    );
}

#[test]
fn contiguous_list_items_share_one_list() {
    let html = markdown_to_html("- a\n- b\n\ntail");
    assert_eq!(html, "<ul><li>a</li><br><li>b</li></ul><br><br>tail");
}

#[test]
fn newlines_become_breaks_and_result_is_trimmed() {
    assert_eq!(markdown_to_html("  *a*\nb\n"), "<i>a</i><br>b<br>");
    assert_eq!(markdown_to_html("x\r\ny"), "x<br>y");
}
