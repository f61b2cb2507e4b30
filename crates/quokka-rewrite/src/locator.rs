//! Attribute location and value replacement.
//!
//! Implements the two matching modes of the construct table. Within each
//! selector match, three value grammars are tried in order (double quoted,
//! single quoted, unquoted); a matched value is replaced by its resolved
//! form with every surrounding token preserved byte for byte.

use std::borrow::Cow;
use std::sync::LazyLock;

use quokka_common::warning::warn_once;
use quokka_pattern::compile;
use quokka_url::resolve;
use regex::{Captures, Regex};

use crate::construct::{ATT, Construct, Mode};

/// A numeric character reference left open at the end of a span.
///
/// [§ 13.2.5.74 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
/// A digit after `&#32` extends the reference instead of terminating it, so
/// a match whose accepted text ends like this must not be allowed to claim
/// the span right before a digit.
static OPEN_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#(?:0*[0-9]+|x0*[0-9a-f]+)$").expect("invalid open-reference regex")
});

/// Apply one construct to the document.
///
/// A selector or value grammar that fails to compile skips the construct
/// with a warning and returns the document unchanged; no failure in one
/// construct can abort the remaining ones.
pub(crate) fn apply(
    construct: &Construct,
    base_url: &str,
    html: &str,
    decoders: Option<(&Regex, &Regex)>,
) -> String {
    let Some(selector) = compile(&construct.selector) else {
        skip(construct.name);
        return html.to_owned();
    };
    match &construct.mode {
        Mode::Direct {
            boundary,
            attr,
            marker,
            delimiter,
            end,
        } => {
            let Some(grammars) =
                direct_grammars(boundary, attr, marker, delimiter, end.as_deref())
            else {
                skip(construct.name);
                return html.to_owned();
            };
            selector
                .replace_all(html, |tag: &Captures| {
                    if space_extended_by_digit(tag) {
                        return tag[0].to_owned();
                    }
                    grammars.iter().fold(tag[0].to_owned(), |span, grammar| {
                        replace_direct(grammar, &span, base_url)
                    })
                })
                .into_owned()
        }
        Mode::Inner {
            attr,
            front,
            delimiter,
            end,
            first_only,
        } => {
            let Some(inner) = inner_grammars(attr, front, delimiter.as_deref(), end.as_deref())
            else {
                skip(construct.name);
                return html.to_owned();
            };
            selector
                .replace_all(html, |tag: &Captures| {
                    if space_extended_by_digit(tag) {
                        return tag[0].to_owned();
                    }
                    inner
                        .carriers
                        .iter()
                        .fold(tag[0].to_owned(), |span, carrier| {
                            carrier
                                .replace_all(&span, |attr_caps: &Captures| {
                                    let value = inner.candidates.iter().fold(
                                        attr_caps[2].to_owned(),
                                        |value, candidate| {
                                            replace_inner(
                                                candidate,
                                                &value,
                                                base_url,
                                                decoders,
                                                *first_only,
                                            )
                                        },
                                    );
                                    format!("{}{value}", &attr_caps[1])
                                })
                                .into_owned()
                        })
                })
                .into_owned()
        }
    }
}

/// Warn (once) that a construct is being skipped.
fn skip(name: &str) {
    warn_once(
        "Rewrite",
        &format!("construct '{name}' skipped: pattern did not compile"),
    );
}

/// Keyed selectors capture the whitespace after a bare keyword and the rest
/// of the tag. When that whitespace is an open space reference and the rest
/// starts with a digit, the digit extends the reference (`&#320` is one
/// code point, not a space and a zero), so the tag does not carry the
/// keyword at all.
fn space_extended_by_digit(tag: &Captures) -> bool {
    let (Some(space), Some(rest)) = (tag.get(1), tag.get(2)) else {
        return false;
    };
    OPEN_REFERENCE.is_match(space.as_str())
        && rest
            .as_str()
            .as_bytes()
            .first()
            .is_some_and(u8::is_ascii_digit)
}

/// The three value grammars of direct mode, in trial order.
///
/// The value group never includes the quotes; an unquoted value runs until
/// whitespace, `>`, or a construct delimiter. With an end pattern the value
/// turns lazy and the end is captured so it can be put back verbatim.
fn direct_grammars(
    boundary: &str,
    attr: &str,
    marker: &str,
    delimiter: &str,
    end: Option<&str>,
) -> Option<[Regex; 3]> {
    let attribute = format!("{boundary}{attr}");
    let (lazily, end_group) =
        end.map_or_else(|| ("", "()".to_owned()), |after| ("?", format!("({after})")));
    let quoted_double = compile(&format!(
        r#"({attribute}{marker}")([^"{delimiter}]+{lazily}){end_group}"#
    ))?;
    let quoted_single = compile(&format!(
        "({attribute}{marker}')([^'{delimiter}]+{lazily}){end_group}"
    ))?;
    let unquoted = compile(&format!(
        r#"({attribute}{marker})([^"'][^\s>{delimiter}]*{lazily}){end_group}"#
    ))?;
    Some([quoted_double, quoted_single, unquoted])
}

/// Compiled inner-mode grammars: two carrier-attribute matchers plus the
/// candidate matchers tried inside each carrier value.
struct InnerGrammars {
    carriers: [Regex; 2],
    candidates: Vec<Regex>,
}

/// A quoted inner URL wears the quotes its carrier cannot contain, so each
/// quoted candidate requires the full opposite-quote pair around the value.
/// The unquoted candidate exists only when the construct names a delimiter
/// set.
fn inner_grammars(
    attr: &str,
    front: &str,
    delimiter: Option<&str>,
    end: Option<&str>,
) -> Option<InnerGrammars> {
    let attribute = format!("{ATT}{attr}");
    let carriers = [
        compile(&format!(r#"({attribute}\s*=\s*")([^"]*)"#))?,
        compile(&format!(r"({attribute}\s*=\s*')([^']+)"))?,
    ];
    let mut candidates = vec![
        compile(&format!(r#"({front}")([^"]+)(")"#))?,
        compile(&format!(r"({front}')([^']+)(')"))?,
    ];
    if let Some(delim) = delimiter {
        let unquoted = match end {
            Some(after) => format!(r#"({front})([^"'][^{delim}]*?)({after})"#),
            None => format!(r#"({front})([^"'][^{delim}]*)()"#),
        };
        candidates.push(compile(&unquoted)?);
    }
    Some(InnerGrammars {
        carriers,
        candidates,
    })
}

/// Splice `lead + resolve(value) + tail` for every match. Direct values go
/// to the resolver raw.
fn replace_direct(grammar: &Regex, span: &str, base_url: &str) -> String {
    grammar
        .replace_all(span, |caps: &Captures| {
            format!("{}{}{}", &caps[1], resolve(base_url, &caps[2]), &caps[3])
        })
        .into_owned()
}

/// Rewrite keyword-prefixed URLs inside one attribute value.
///
/// Matching is spliced by hand so the open-reference rule can be enforced
/// at the two seams where a digit can legally follow a fragment: where the
/// keyword pattern meets the URL, and where the end pattern meets the rest
/// of the value.
fn replace_inner(
    grammar: &Regex,
    value: &str,
    base_url: &str,
    decoders: Option<(&Regex, &Regex)>,
    first_only: bool,
) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in grammar.captures_iter(value) {
        let (Some(whole), Some(lead), Some(found), Some(tail)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        // An end pattern that swallowed an open reference must not sit
        // directly before a digit.
        if OPEN_REFERENCE.is_match(tail.as_str())
            && value
                .as_bytes()
                .get(whole.end())
                .is_some_and(u8::is_ascii_digit)
        {
            continue;
        }
        let mut lead_text = lead.as_str();
        let mut candidate = Cow::Borrowed(found.as_str());
        if value
            .as_bytes()
            .get(found.start())
            .is_some_and(u8::is_ascii_digit)
        {
            match OPEN_REFERENCE.find(lead_text) {
                Some(open) if reference_code_point(open.as_str()) == Some(32) => {
                    // An open encoded space right before a digit: the
                    // whitespace run overreached. Hand the reference text
                    // to the URL, as a one-shorter run would have.
                    candidate = Cow::Owned(format!("{}{}", open.as_str(), found.as_str()));
                    lead_text = &lead_text[..open.start()];
                }
                Some(_) => continue,
                None => {}
            }
        }
        out.push_str(&value[last..whole.start()]);
        out.push_str(lead_text);
        out.push_str(&resolve(base_url, &decode_references(&candidate, decoders)));
        out.push_str(tail.as_str());
        last = whole.end();
        if first_only {
            break;
        }
    }
    out.push_str(&value[last..]);
    out
}

/// Normalize entity spellings of `/` and `.` in an inner URL before
/// resolution. Direct values skip this step.
fn decode_references(candidate: &str, decoders: Option<(&Regex, &Regex)>) -> String {
    let Some((slash, dot)) = decoders else {
        return candidate.to_owned();
    };
    let decoded = decode_with(slash, candidate, '/');
    decode_with(dot, &decoded, '.')
}

/// Replace every spelling matched by `grammar` with `plain`. An open
/// reference directly followed by a digit keeps its text; the digit would
/// have been part of the reference.
fn decode_with(grammar: &Regex, text: &str, plain: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in grammar.find_iter(text) {
        let spelled = found.as_str();
        if spelled.starts_with('&')
            && !spelled.ends_with(';')
            && text
                .as_bytes()
                .get(found.end())
                .is_some_and(u8::is_ascii_digit)
        {
            continue;
        }
        out.push_str(&text[last..found.start()]);
        out.push(plain);
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Code point spelled by an open numeric reference (`&#32`, `&#x0020`).
fn reference_code_point(reference: &str) -> Option<u32> {
    let digits = reference.get(2..)?;
    if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        digits.parse().ok()
    }
}
