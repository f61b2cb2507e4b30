//! The construct table: where URLs live in a page.
//!
//! Each construct pairs a selector (the HTML span to look inside, usually
//! one tag) with a value grammar: either the attribute's own value is the
//! URL, or the URL sits inside another attribute's value behind a keyword
//! such as `url=` or `url(`. The table order is fixed and every construct
//! runs over the whole document in turn.

use quokka_pattern::PatternSet;

/// Boundary class preceding an attribute name, so that `data-href` can
/// never pass for `href`.
pub(crate) const ATT: &str = "[^-a-z0-9:._]";

/// Boundary before `url` inside a style block. Unlike [`ATT`] it admits
/// `:`, which in CSS sits between a property name and its value
/// (`background:url(…)`).
pub(crate) const CSS_ATT: &str = "[^-a-z0-9._]";

/// Any run of attributes inside a tag. Quoted values may contain `>`.
pub(crate) const ANY: &str = r#"(?:[^>"']*(?:"[^"]*"|'[^']*'))*?[^>]*"#;

/// How the URL is located once the selector has matched.
pub(crate) enum Mode {
    /// The attribute's own value is the URL (`href="x"`).
    Direct {
        /// Character class required before the name; [`ATT`] for real
        /// attributes, [`CSS_ATT`] inside style blocks.
        boundary: &'static str,
        /// Attribute name, matched literally after the boundary.
        attr: &'static str,
        /// Between name and value: `\s*=\s*` for attributes, `\s*\(\s*` for
        /// CSS `url(`.
        marker: String,
        /// Extra characters that terminate an unquoted value.
        delimiter: String,
        /// Pattern required after the value, if any.
        end: Option<String>,
    },
    /// The URL sits inside the attribute's value, behind a keyword
    /// (`content="0; url=x"`, `style="background:url(x)"`).
    Inner {
        /// Carrier attribute name.
        attr: &'static str,
        /// Entity-tolerant pattern preceding the URL.
        front: String,
        /// Characters that terminate an unquoted inner URL; `None` means
        /// only quoted inner URLs are recognized.
        delimiter: Option<String>,
        /// Pattern required after the inner URL, if any.
        end: Option<String>,
        /// Rewrite only the first inner URL per attribute value.
        first_only: bool,
    },
}

/// One place URLs live, named for degradation warnings.
pub(crate) struct Construct {
    pub(crate) name: &'static str,
    pub(crate) selector: String,
    pub(crate) mode: Mode,
}

/// Build the construct table in application order.
///
/// Keyword fragments come from `patterns`, so spellings shared between
/// constructs (the whitespace run, `url`) are built once per document.
pub(crate) fn table(patterns: &mut PatternSet) -> Vec<Construct> {
    let space = patterns.fragment(" ");
    let ws = patterns.whitespace_run();
    let refresh = patterns.fragment("refresh");
    let movie = patterns.fragment("movie");
    let url_kw = patterns.fragment("url");
    let equals = patterns.fragment("=");
    let open_paren = patterns.fragment("(");
    let close_paren = patterns.fragment(")");

    vec![
        // <meta http-equiv=refresh content="0; url=…">
        Construct {
            name: "meta refresh",
            selector: keyed_tag("meta", "http-equiv", &refresh, &space),
            mode: Mode::Inner {
                attr: "content",
                front: format!("{url_kw}{ws}{equals}{ws}"),
                delimiter: Some(r"\s".to_owned()),
                end: None,
                first_only: true,
            },
        },
        // Linked elements
        Construct {
            name: "href",
            selector: format!(r"<{ANY}{ATT}href\s*={ANY}>"),
            mode: attribute("href"),
        },
        // Embedded elements
        Construct {
            name: "src",
            selector: format!(r"<{ANY}{ATT}src\s*={ANY}>"),
            mode: attribute("src"),
        },
        // <object data=…>
        Construct {
            name: "object data",
            selector: format!(r"<object{ANY}{ATT}data\s*={ANY}>"),
            mode: attribute("data"),
        },
        // <applet codebase=…>
        Construct {
            name: "applet codebase",
            selector: format!(r"<applet{ANY}{ATT}codebase\s*={ANY}>"),
            mode: attribute("codebase"),
        },
        // <param name=movie value=…>
        Construct {
            name: "param movie",
            selector: keyed_tag("param", "name", &movie, &space),
            mode: attribute("value"),
        },
        // url(…) inside <style> blocks. Only the unquoted form participates;
        // a quoted url("…") keeps its quotes and is left alone.
        Construct {
            name: "style block",
            selector: r#"<style[^>]*>(?:[^"']*(?:"[^"]*"|'[^']*'))*?[^'"]*(?:</style|$)"#
                .to_owned(),
            mode: Mode::Direct {
                boundary: CSS_ATT,
                attr: "url",
                marker: r"\s*\(\s*".to_owned(),
                delimiter: String::new(),
                end: Some(r"\s*\)".to_owned()),
            },
        },
        // url(…) inside style attributes.
        Construct {
            name: "inline style",
            selector: format!(r"<{ANY}{ATT}style\s*={ANY}>"),
            mode: Mode::Inner {
                attr: "style",
                front: format!("{url_kw}{ws}{open_paren}{ws}"),
                delimiter: Some(r"\s)".to_owned()),
                end: Some(close_paren),
                first_only: false,
            },
        },
    ]
}

/// Plain attribute whose value is the URL.
fn attribute(attr: &'static str) -> Mode {
    Mode::Direct {
        boundary: ATT,
        attr,
        marker: r"\s*=\s*".to_owned(),
        delimiter: String::new(),
        end: None,
    }
}

/// Selector for `<tag … key=KEYWORD …>` where the keyword may be quoted
/// either way or bare, in any entity spelling.
///
/// The bare branch captures its terminating whitespace and the rest of the
/// tag, so the locator can reject a space reference left open before a
/// digit.
fn keyed_tag(tag: &str, key: &str, keyword: &str, space: &str) -> String {
    format!(
        r#"<{tag}{ANY}{ATT}{key}\s*=\s*(?:"{keyword}"{ANY}>|'{keyword}'{ANY}>|{keyword}(?:({space})({ANY})>|>))"#
    )
}
