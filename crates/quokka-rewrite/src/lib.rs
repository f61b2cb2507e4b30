//! Relative-to-absolute URL rewriting for extracted HTML.
//!
//! [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
//!
//! A page copied out of its origin keeps relative references that no longer
//! lead anywhere. [`rewrite`] walks a fixed table of constructs, the places
//! URLs live in HTML:
//!
//! - **`<meta http-equiv=refresh>`** - the `url=` inside `content`
//! - **`href` / `src`** - on any tag
//! - **`<object data>`, `<applet codebase>`, `<param name=movie>`**
//! - **CSS `url(…)`** - in `<style>` blocks and `style` attributes
//!
//! and resolves every reference found there against the page's base URL.
//!
//! The scan is textual: no tokenizer, no DOM. Selectors tolerate
//! entity-encoded keyword spellings (`&#117;rl=` for `url=`), all three
//! attribute quoting forms, and `>` inside quoted values. Anything the scan
//! cannot place is left untouched; the transform never fails.

mod construct;
mod locator;

use quokka_pattern::PatternSet;
pub use quokka_url::resolve;

/// Rewrite every relative reference in `html` to an absolute URL against
/// `base_url`.
///
/// The constructs run in a fixed order over the whole document, each pass
/// feeding the next. State lives in a per-call pattern cache, so concurrent
/// rewrites of different documents are independent.
///
/// # Example
/// ```
/// use quokka_rewrite::rewrite;
///
/// let page = r#"<a href="a.html">x</a>"#;
/// let out = rewrite("https://example.com/dir/page.html", page);
/// assert_eq!(out, r#"<a href="https://example.com/dir/a.html">x</a>"#);
/// ```
#[must_use]
pub fn rewrite(base_url: &str, html: &str) -> String {
    let mut patterns = PatternSet::new();
    let table = construct::table(&mut patterns);
    let decoders = patterns.decoders();
    let mut document = html.to_owned();
    for construct in &table {
        document = locator::apply(construct, base_url, &document, decoders);
    }
    document
}
