use gemini_archive::postprocess::{
    live_variables, minimise, prune_dead_variables, prune_fonts,
};

#[test]
fn variable_references_are_collected_including_nested_fallbacks() {
    let content = "color: var(--a); background: var( --b , var(--c, 1px));";
    let live = live_variables(content);

    assert!(live.contains("--a"));
    assert!(live.contains("--b"));
    assert!(live.contains("--c"), "nested fallback references count as live");
}

#[test]
fn transitively_used_variables_are_retained() {
    let content = ":root { --a: var(--b); --b: 1px; } div { color: var(--a); }";
    let live = live_variables(content);
    let pruned = prune_dead_variables(content, &live);

    assert!(pruned.contains("--a:var(--b);"), "directly referenced declaration stays");
    assert!(pruned.contains("--b:1px;"), "declaration referenced from a kept value stays");
}

#[test]
fn unreferenced_variables_are_removed() {
    let content = ":root { --c: 2px; } div { color: red; }";
    let live = live_variables(content);
    let pruned = prune_dead_variables(content, &live);

    assert!(!pruned.contains("--c"), "dead declaration must disappear");
    assert!(!pruned.contains("2px"), "its value must disappear with it");
    assert!(pruned.contains("color: red;"), "unrelated declarations are untouched");
}

#[test]
fn a_closing_brace_next_to_a_removed_declaration_survives() {
    let content = ".x{--dead:1px;} .y{color:blue}";
    let live = live_variables(content);
    let pruned = prune_dead_variables(content, &live);

    assert!(pruned.contains(".x{}"), "block close must stay in place: {pruned}");
    assert!(pruned.contains(".y{color:blue}"));
}

#[test]
fn ordinary_fonts_are_always_dropped() {
    let content = r#"@font-face { font-family: "Arial"; src: url(a.woff2); } body { }"#;

    for keep_math in [false, true] {
        let pruned = prune_fonts(content, keep_math);
        assert!(
            !pruned.contains("@font-face"),
            "Arial must be dropped regardless of the math flag"
        );
        assert!(pruned.contains("body { }"));
    }
}

#[test]
fn math_fonts_are_kept_only_when_the_document_has_math() {
    let content = r#"@font-face { font-family: "KaTeX_Main"; src: url(k.woff2); }"#;

    assert!(
        prune_fonts(content, true).contains("KaTeX_Main"),
        "math font survives when the flag is set"
    );
    assert!(
        !prune_fonts(content, false).contains("KaTeX_Main"),
        "math font is dropped without the flag"
    );
}

#[test]
fn unquoted_font_family_names_are_recognised() {
    let content = "@font-face { font-family: KaTeX_Size1; src: url(k.woff2); }";
    assert!(prune_fonts(content, true).contains("KaTeX_Size1"));
}

#[test]
fn minimise_applies_both_transforms() {
    let content = concat!(
        r#"@font-face { font-family: "Roboto"; src: url(r.woff2); }"#,
        ":root { --used: 1px; --unused: 2px; } div { width: var(--used); }",
    );

    let out = minimise(content, false);

    assert!(!out.contains("@font-face"));
    assert!(out.contains("--used:1px;"));
    assert!(!out.contains("--unused"));
}
