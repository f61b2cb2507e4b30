//! Best-effort URL resolution for rewritten documents.
//!
//! [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Turns a reference found in a page into an absolute URL against the page's
//! base. This is a textual approximation of the URL Standard, shaped for the
//! rewriting pipeline: it never fails, never allocates a parser state, and
//! degrades to a recognizable string on malformed input instead of raising.
//!
//! NOTE: Outputs are not validated. A nonsensical base produces a
//! nonsensical absolute URL, which is exactly what a later fetch layer
//! should surface to the user.

use std::borrow::Cow;
use std::sync::LazyLock;

use quokka_common::warning::warn_once;
use regex::Regex;

/// [URL Standard § 4.3](https://url.spec.whatwg.org/#url-parsing)
/// "An absolute-URL string is a URL-scheme string, followed by U+003A (:),
/// followed by a scheme-specific part."
///
/// Recognized schemes are the fetchable ones plus `javascript:` (left alone
/// rather than resolved into garbage) and image `data:` URIs, which carry
/// their payload after the `<mediatype>;` prefix.
static ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:https?|file|ftps?|mailto|javascript):|data:image/[^;]{2,9};)")
        .expect("invalid absolute-url regex")
});

/// [URL Standard § 3.1](https://url.spec.whatwg.org/#host-representation)
///
/// Authority of an `http(s)` base: everything between the scheme's `//` and
/// the first `/`, `?`, or `#`.
static AUTHORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://([^/?#]+)(?:[/?#]|$)").expect("invalid authority regex"));

/// [RFC 3986 § 5.2.4](https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4)
/// "Remove Dot Segments", as a textual rule: one non-empty segment followed
/// by `/../` cancels out.
static COLLAPSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^/]+/+\.\./").expect("invalid dot-segment regex"));

/// Resolve a candidate reference against the page's base URL.
///
/// # Algorithm
///
/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// STEP 1: "If url is an absolute URL, return url." Absolute references,
/// including `javascript:` and image `data:` URIs, pass through byte for
/// byte.
///
/// STEP 2: Normalize the base: drop a `#fragment`, trim trailing slashes,
/// then append exactly one `/` so the base always names a directory.
///
/// STEP 3: A scheme-relative reference (`//host/x`) gets `https:` prepended.
///
/// STEP 4: A host-relative reference (`/x`) is joined to the base's
/// authority. When no authority can be extracted the output keeps an empty
/// host and a warning is printed once per base.
///
/// STEP 5: Everything else is joined to the normalized base as a path
/// reference, then `segment/../` pairs are collapsed until no rewrite
/// applies. A residual `/../` that nothing can cancel (the reference climbed
/// past the root) is left in place.
///
/// STEP 6: One trailing `.` and every remaining `/.` are dropped, and the
/// characters `"` `'` `<` `>` are percent-escaped so a rewritten value can
/// never terminate its surrounding attribute.
///
/// NOTE: The scheme of the output is always `https` for host-relative and
/// scheme-relative references, regardless of the base's scheme.
///
/// # Example
/// ```
/// use quokka_url::resolve;
///
/// let base = "https://example.com/dir/page.html";
/// assert_eq!(resolve(base, "img.png"), "https://example.com/dir/img.png");
/// assert_eq!(resolve(base, "/c.png"), "https://example.com/c.png");
/// ```
#[must_use]
pub fn resolve(base_url: &str, url: &str) -> String {
    // STEP 1: Absolute references are already done.
    if ABSOLUTE.is_match(url) {
        return url.to_owned();
    }

    // STEP 2: Normalize the base into directory form.
    //
    // [URL Standard § 4.4](https://url.spec.whatwg.org/#url-equivalence)
    // The fragment never participates in resolution.
    let without_fragment = base_url.find('#').map_or(base_url, |pos| &base_url[..pos]);
    let base = format!("{}/", without_fragment.trim_end_matches('/'));

    // STEP 3: Scheme-relative reference.
    if url.starts_with("//") {
        return format!("https:{url}");
    }

    // STEP 4: Host-relative reference.
    if url.starts_with('/') {
        let authority = AUTHORITY.captures(&base).and_then(|caps| caps.get(1)).map_or_else(
            || {
                warn_once(
                    "URL",
                    &format!("cannot extract an authority from base '{base_url}'"),
                );
                ""
            },
            |host| host.as_str(),
        );
        return format!("https://{authority}{url}");
    }

    // STEP 5: Path reference. `./x` and bare `x` both become `../x` so the
    // join below can treat the base's final segment as the current
    // directory.
    let adjusted = if let Some(rest) = url.strip_prefix("./") {
        format!("../{rest}")
    } else if url.trim().is_empty() {
        // An empty reference resolves to nothing at all.
        return String::new();
    } else {
        format!("../{url}")
    };
    let mut joined = format!("{base}{adjusted}");

    // [RFC 3986 § 5.2.4](https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4)
    // Collapse `segment/../` pairs to a fixed point. Every effective pass
    // strictly shrinks the string, so this terminates; when no pass applies
    // any leftover `/../` stays put.
    loop {
        match COLLAPSE.replace_all(&joined, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(collapsed) => joined = collapsed,
        }
    }

    // STEP 6: Trailing-dot and `/.` cleanup, then escape the four characters
    // that could break out of an HTML attribute value.
    let trimmed = joined.strip_suffix('.').unwrap_or(&joined);
    trimmed
        .replace("/.", "")
        .replace('"', "%22")
        .replace('\'', "%27")
        .replace('<', "%3C")
        .replace('>', "%3E")
}
