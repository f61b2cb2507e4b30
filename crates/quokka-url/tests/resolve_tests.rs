//! Integration tests for relative reference resolution.

use quickcheck_macros::quickcheck;
use quokka_url::resolve;

const BASE: &str = "https://example.com/dir/page.html";

#[test]
fn test_sibling_file() {
    assert_eq!(resolve(BASE, "img.png"), "https://example.com/dir/img.png");
}

#[test]
fn test_dot_slash_reference() {
    assert_eq!(resolve(BASE, "./img.png"), "https://example.com/dir/img.png");
}

#[test]
fn test_parent_directory() {
    assert_eq!(resolve(BASE, "../up.png"), "https://example.com/up.png");
}

#[test]
fn test_root_relative() {
    assert_eq!(resolve(BASE, "/c.png"), "https://example.com/c.png");
}

#[test]
fn test_root_relative_keeps_port() {
    let base = "https://example.com:8080/a/b.html";
    assert_eq!(resolve(base, "/x"), "https://example.com:8080/x");
}

#[test]
fn test_scheme_relative() {
    assert_eq!(
        resolve(BASE, "//cdn.example.net/lib.js"),
        "https://cdn.example.net/lib.js"
    );
}

#[test]
fn test_absolute_references_untouched() {
    assert_eq!(resolve(BASE, "http://other.org/a"), "http://other.org/a");
    assert_eq!(resolve(BASE, "HTTPS://OTHER.ORG/A"), "HTTPS://OTHER.ORG/A");
    assert_eq!(resolve(BASE, "ftp://files.example.net/f"), "ftp://files.example.net/f");
    assert_eq!(resolve(BASE, "mailto:a@example.com"), "mailto:a@example.com");
    assert_eq!(resolve(BASE, "javascript:void(0)"), "javascript:void(0)");
}

#[test]
fn test_image_data_uri_untouched() {
    // No escaping either: absolute references are returned verbatim.
    let uri = "data:image/svg+xml;utf8,<svg/>";
    assert_eq!(resolve(BASE, uri), uri);
}

#[test]
fn test_non_image_data_uri_resolved_as_path() {
    // Only image data URIs count as absolute.
    assert_eq!(
        resolve(BASE, "data:text/html;base64,AA=="),
        "https://example.com/dir/data:text/html;base64,AA=="
    );
}

#[test]
fn test_empty_and_whitespace() {
    assert_eq!(resolve(BASE, ""), "");
    assert_eq!(resolve(BASE, "  \t\n"), "");
}

#[test]
fn test_fragment_only_reference() {
    assert_eq!(resolve(BASE, "#top"), "https://example.com/dir/#top");
}

#[test]
fn test_base_fragment_stripped() {
    assert_eq!(
        resolve("https://example.com/a/b.html#sec", "x.png"),
        "https://example.com/a/x.png"
    );
}

#[test]
fn test_directory_base_consumes_last_segment() {
    // The last path segment of the base is always treated as a file,
    // so a directory-style base loses its final segment.
    assert_eq!(resolve("https://example.com/dir/", "x.png"), "https://example.com/x.png");
}

#[test]
fn test_base_without_authority_degrades() {
    assert_eq!(resolve("notes.html", "/x.png"), "https:///x.png");
}

#[test]
fn test_scheme_forced_to_https() {
    let base = "http://example.com/dir/page.html";
    assert_eq!(resolve(base, "/x"), "https://example.com/x");
    assert_eq!(resolve(base, "//cdn.example.net/y"), "https://cdn.example.net/y");
}

#[test]
fn test_query_reference() {
    assert_eq!(resolve(BASE, "?sort=asc"), "https://example.com/dir/?sort=asc");
}

#[test]
fn test_quotes_escaped() {
    assert_eq!(resolve(BASE, "a\"b.png"), "https://example.com/dir/a%22b.png");
    assert_eq!(resolve(BASE, "a'b.png"), "https://example.com/dir/a%27b.png");
}

#[test]
fn test_angle_brackets_escaped() {
    assert_eq!(resolve(BASE, "x<y>.png"), "https://example.com/dir/x%3Cy%3E.png");
}

#[test]
fn test_trailing_dot_stripped() {
    assert_eq!(resolve(BASE, "x."), "https://example.com/dir/x");
}

#[test]
fn test_slash_dot_removed() {
    assert_eq!(resolve(BASE, "a/./b"), "https://example.com/dir/a/b");
}

#[test]
fn test_climbing_past_an_empty_base_terminates() {
    // There is nothing left to climb out of, so the leftover dot
    // segments degrade into a relative path instead of looping.
    assert_eq!(resolve("", "x"), "./x");
}

#[test]
fn test_resolution_is_idempotent() {
    let once = resolve(BASE, "img.png");
    assert_eq!(resolve(BASE, &once), once);
}

#[quickcheck]
fn resolve_never_panics(base: String, url: String) -> bool {
    let _ = resolve(&base, &url);
    true
}

#[quickcheck]
fn resolve_is_idempotent_without_dot_segments(path: String) -> bool {
    // A leading letter keeps the reference out of every special
    // branch, so it always takes the path-joining route. Dot
    // segments are excluded: enough of them can climb through the
    // authority, and the leftovers then resolve a second time.
    let url = format!("p{}", path.replace('.', ""));
    let once = resolve(BASE, &url);
    resolve(BASE, &once) == once
}

#[quickcheck]
fn resolved_paths_never_leak_markup_characters(path: String) -> bool {
    let url = format!("p{path}");
    !resolve(BASE, &url).contains(['"', '\'', '<', '>'])
}
