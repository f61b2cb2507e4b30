//! Integration tests for the entity-tolerant pattern builder.

use quokka_pattern::{PatternSet, compile};

/// Helper to check a fragment against a spelling, whole-string
fn covers(fragment: &str, spelling: &str) -> bool {
    let anchored = format!("^{fragment}$");
    compile(&anchored)
        .expect("generated fragment must compile")
        .is_match(spelling)
}

#[test]
fn test_literal_and_numeric_spellings() {
    let mut set = PatternSet::new();
    let x = set.fragment("x");
    assert!(covers(&x, "x"));
    assert!(covers(&x, "X"));
    assert!(covers(&x, "&#120;"));
    assert!(covers(&x, "&#0120;"));
    assert!(covers(&x, "&#x78;"));
    assert!(covers(&x, "&#X78;"));
    assert!(!covers(&x, "y"));
    assert!(!covers(&x, "&#121;"));
}

#[test]
fn test_semicolon_is_optional() {
    let mut set = PatternSet::new();
    let x = set.fragment("x");
    assert!(covers(&x, "&#120"));
    assert!(covers(&x, "&#x78"));
}

#[test]
fn test_cased_letter_gets_uppercase_code_points() {
    let mut set = PatternSet::new();
    // 'e' is 101/0x65, 'E' is 69/0x45
    assert_eq!(set.fragment("e"), "(?:e|&#0*101;?|&#x0*65;?|&#0*69;?|&#x0*45;?)");
    let e = set.fragment("e");
    assert!(covers(&e, "&#69;"));
    assert!(covers(&e, "&#x45;"));
}

#[test]
fn test_uncased_character_has_no_extra_branches() {
    let mut set = PatternSet::new();
    assert_eq!(set.fragment("7"), "(?:7|&#0*55;?|&#x0*37;?)");
}

#[test]
fn test_space_is_the_only_named_reference() {
    let mut set = PatternSet::new();
    assert_eq!(set.fragment(" "), r"(?:\s|&nbsp;?|&#0*32;?|&#x0*20;?)");
    let space = set.fragment(" ");
    assert!(covers(&space, " "));
    assert!(covers(&space, "\t"));
    assert!(covers(&space, "&nbsp;"));
    assert!(covers(&space, "&nbsp"));
    assert!(covers(&space, "&#032;"));
    assert!(covers(&space, "&#x20"));
}

#[test]
fn test_dot_fragment_is_not_a_wildcard() {
    let mut set = PatternSet::new();
    let dot = set.fragment(".");
    assert!(covers(&dot, "."));
    assert!(covers(&dot, "&#46;"));
    assert!(covers(&dot, "&#x2E;"));
    assert!(!covers(&dot, "x"));
}

#[test]
fn test_parenthesis_fragments() {
    let mut set = PatternSet::new();
    let open = set.fragment("(");
    let close = set.fragment(")");
    assert!(covers(&open, "("));
    assert!(covers(&open, "&#40;"));
    assert!(covers(&open, "&#x28"));
    assert!(covers(&close, ")"));
    assert!(covers(&close, "&#0041;"));
    assert!(covers(&close, "&#x0029;"));
}

#[test]
fn test_composite_concatenates_character_fragments() {
    let mut set = PatternSet::new();
    let composite = set.fragment("ab");
    let a = set.fragment("a");
    let b = set.fragment("b");
    assert_eq!(composite, format!("{a}{b}"));
}

#[test]
fn test_keyword_matches_mixed_spellings() {
    let mut set = PatternSet::new();
    let url = set.fragment("url");
    assert!(covers(&url, "url"));
    assert!(covers(&url, "URL"));
    assert!(covers(&url, "&#117;rl"));
    assert!(covers(&url, "u&#114;l"));
    assert!(covers(&url, "U&#82;L"));
    assert!(!covers(&url, "ur"));

    let refresh = set.fragment("refresh");
    let re = compile(&refresh).expect("generated fragment must compile");
    assert!(re.is_match(r#"<meta http-equiv="R&#69;FRESH">"#));
}

#[test]
fn test_whitespace_run_accepts_empty_and_mixed_runs() {
    let mut set = PatternSet::new();
    let run = set.whitespace_run();
    let anchored = format!("^{run}$");
    let re = compile(&anchored).expect("generated fragment must compile");
    assert!(re.is_match(""));
    assert!(re.is_match("   "));
    assert!(re.is_match(" &nbsp;&#32;\t"));
    assert!(!re.is_match("x"));
}

#[test]
fn test_fragment_is_cached() {
    let mut set = PatternSet::new();
    let first = set.fragment("movie");
    let second = set.fragment("movie");
    assert_eq!(first, second);
}

#[test]
fn test_decoders_cover_entity_spellings() {
    let mut set = PatternSet::new();
    let (slash, dot) = set.decoders().expect("decoders must compile");
    assert!(slash.is_match("/"));
    assert!(slash.is_match("&#47;"));
    assert!(slash.is_match("&#x2F"));
    assert!(dot.is_match("&#46"));
    assert!(dot.is_match("&#X2E;"));
}

#[test]
fn test_compile_rejects_malformed_patterns() {
    assert!(compile("(").is_none());
    assert!(compile("a+").is_some());
}
