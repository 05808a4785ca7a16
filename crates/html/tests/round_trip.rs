use html::{AttrProbe, Node, collect_attr_values, collect_text_nodes, parse_document, serialize};

struct Fixture {
    name: &'static str,
    input: &'static str,
    covers: &'static str,
}

// Inputs that must come back byte-for-byte after parse + serialize.
const CANONICAL: &[Fixture] = &[
    Fixture {
        name: "utf8_non_ascii_text",
        input: "<p>Xin chào thế giới</p><p>日本語</p>",
        covers: "Non-ASCII text between tags.",
    },
    Fixture {
        name: "doctype_and_whitespace",
        input: "<!DOCTYPE html>\n<html>\n  <head><meta charset=\"utf-8\"></head>\n  <body></body>\n</html>\n",
        covers: "Doctype casing and inter-element whitespace.",
    },
    Fixture {
        name: "entity_escapes",
        input: "<p>Tom &amp; Jerry &lt;3&nbsp;you</p>",
        covers: "Escapes decode on parse and re-encode on write.",
    },
    Fixture {
        name: "attribute_order",
        input: "<a id=\"1\" href=\"x.html\" class=\"c\" target=\"_blank\">x</a>",
        covers: "Attributes keep their source order.",
    },
    Fixture {
        name: "comments_inline",
        input: "<div><!-- keep me --><span>s</span><!---->x</div>",
        covers: "Comments, including empty ones.",
    },
    Fixture {
        name: "rawtext_script",
        input: "<script>document.write(\"<p>\" + 1 < 2 + \"</p>\")</script>",
        covers: "Markup-looking text inside script is not parsed.",
    },
    Fixture {
        name: "escapable_raw_text",
        input: "<title>Q &amp; A &lt;b&gt;</title><textarea name=\"t\">&lt;p&gt;x</textarea>",
        covers: "Title and textarea bodies re-escape what they decoded.",
    },
    Fixture {
        name: "slash_in_quoted_value",
        input: "<a href=\"/docs/\">Docs</a><img src=\"img/\">",
        covers: "Trailing slashes inside values are not tag syntax.",
    },
    Fixture {
        name: "nested_lists",
        input: "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>",
        covers: "Nested structure is preserved.",
    },
];

#[test]
fn canonical_fixtures_round_trip_exactly() {
    for fixture in CANONICAL {
        let output = serialize(&parse_document(fixture.input));
        assert_eq!(
            output, fixture.input,
            "fixture {} ({})",
            fixture.name, fixture.covers
        );
    }
}

// Inputs the parser normalizes; normalization must be stable under a second pass.
const NORMALIZED: &[Fixture] = &[
    Fixture {
        name: "uppercase_and_unquoted",
        input: "<IMG SRC=a.png ALT=x><A HREF=/b>b</A>",
        covers: "Names lowercase, values get quotes.",
    },
    Fixture {
        name: "unclosed_paragraphs",
        input: "<p>one<p>two",
        covers: "Open elements close at end of input.",
    },
    Fixture {
        name: "stray_end_tags",
        input: "</div><p>x</span></p></p>",
        covers: "End tags without an open element are dropped.",
    },
    Fixture {
        name: "literal_lt_in_text",
        input: "<p>1 < 2 and 3 <= 4</p>",
        covers: "A `<` that opens nothing stays text.",
    },
    Fixture {
        name: "named_references_outside_basic_set",
        input: "<p title=\"caf&eacute;\">It&rsquo;s &hellip; &copy 2024 &amp co</p><a href=\"?a=1&copy=2\">q</a>",
        covers: "Full named set, legacy names without `;`, query strings in attributes.",
    },
    Fixture {
        name: "unquoted_value_with_slash",
        input: "<p><a href=/docs/>Docs</a> more<img src=img/ alt=x></p>",
        covers: "Unquoted values keep `/`; a non-void `/>` does not close the element.",
    },
    Fixture {
        name: "markup_inside_title_and_textarea",
        input: "<title>a <b> c</title><textarea><p>x</textarea>",
        covers: "No elements are created inside escapable raw text.",
    },
    Fixture {
        name: "unterminated_comment",
        input: "<p>a</p><!-- never closed",
        covers: "Comment running to end of input.",
    },
];

#[test]
fn normalized_fixtures_are_fixed_points() {
    for fixture in NORMALIZED {
        let once = serialize(&parse_document(fixture.input));
        let twice = serialize(&parse_document(&once));
        assert_eq!(twice, once, "fixture {} ({})", fixture.name, fixture.covers);
    }
}

#[test]
fn collected_views_survive_a_round_trip() {
    let input = concat!(
        "<html><body>\n",
        "  <img src=\"logo.png\"><a href=\"https://example.com/\">Home</a>\n",
        "  <p> About &amp; contact </p>\n",
        "</body></html>\n",
    );
    let first = parse_document(input);
    let second = parse_document(&serialize(&first));

    let views = |dom: &Node| {
        let mut images = Vec::new();
        let mut links = Vec::new();
        let mut texts = Vec::new();
        collect_attr_values(dom, AttrProbe::IMG_SRC, &mut images);
        collect_attr_values(dom, AttrProbe::ANCHOR_HREF, &mut links);
        collect_text_nodes(dom, &mut texts);
        (images, links, texts)
    };

    let (images, links, texts) = views(&first);
    assert_eq!(images.len(), 1);
    assert_eq!(links[0].1, "https://example.com/");
    assert_eq!(
        texts.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>(),
        vec!["Home", "About & contact"]
    );
    assert_eq!(views(&second), (images, links, texts));
}

#[test]
fn hand_written_markup_keeps_its_views() {
    let input = concat!(
        "<title>a <b> c</title>",
        "<p>It&rsquo;s caf&eacute; &amp co</p>",
        "<p><a href=/docs/>Docs</a> more</p>",
        "<a href=\"?a=1&copy=2\"><img src=img/logo.png/></a>",
    );
    let first = parse_document(input);
    let second = parse_document(&serialize(&first));

    let texts = |dom: &Node| {
        let mut found = Vec::new();
        collect_text_nodes(dom, &mut found);
        found.into_iter().map(|(_, t)| t).collect::<Vec<_>>()
    };
    let attrs = |dom: &Node, which| {
        let mut found = Vec::new();
        collect_attr_values(dom, which, &mut found);
        found.into_iter().map(|(_, v)| v).collect::<Vec<_>>()
    };

    assert_eq!(
        texts(&first),
        vec!["a <b> c", "It\u{2019}s café & co", "Docs", "more"]
    );
    assert_eq!(attrs(&first, AttrProbe::ANCHOR_HREF), vec!["/docs/", "?a=1&copy=2"]);
    assert_eq!(attrs(&first, AttrProbe::IMG_SRC), vec!["img/logo.png/"]);

    assert_eq!(texts(&second), texts(&first));
    assert_eq!(
        attrs(&second, AttrProbe::ANCHOR_HREF),
        attrs(&first, AttrProbe::ANCHOR_HREF)
    );
    assert_eq!(attrs(&second, AttrProbe::IMG_SRC), attrs(&first, AttrProbe::IMG_SRC));
}
