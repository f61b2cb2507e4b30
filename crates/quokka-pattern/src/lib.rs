//! Entity-tolerant regex fragments for scanning extracted HTML.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! [§ 13.2.5.74 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
//!
//! Extracted HTML may spell any character of a keyword as a character
//! reference: `url=` can arrive as `&#117;rl&#x3D;` and still name the same
//! token once decoded. The scanners in `quokka-rewrite` therefore never match
//! keywords literally; they match fragments built here, each accepting every
//! spelling of one character:
//!
//! - the character itself (the final regex is compiled case-insensitively),
//! - `&#` + optional leading zeros + the decimal code point,
//! - `&#x` + optional leading zeros + the hexadecimal code point,
//! - for cased letters, the uppercase code point in both numerations
//!   (case-insensitive matching folds letters, not the digits inside a
//!   numeric reference).
//!
//! Per the
//! [missing-semicolon-after-character-reference](https://html.spec.whatwg.org/multipage/parsing.html#parse-error-missing-semicolon-after-character-reference)
//! parse error, the terminating `;` may be absent. A reference without it
//! must not run into a digit (the digit would extend the reference), so the
//! fragments carry an optional `;` and the scanner enforces the digit rule at
//! the seams where a digit can legally follow a fragment.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

/// Terminator grammar shared by every numeric reference branch.
///
/// NOTE: The followed-by-a-digit restriction on the semicolon-less form is
/// not expressible here (no lookahead); `quokka-rewrite` rejects those
/// matches positionally.
const ENTITY_END: &str = ";?";

/// Cache of entity-tolerant fragments, keyed by the literal token they match.
///
/// One `PatternSet` is built per rewritten document and threaded through the
/// construct table, so concurrent rewrites never share cache state.
#[derive(Debug)]
pub struct PatternSet {
    fragments: HashMap<String, String>,
    decoders: Option<(Regex, Regex)>,
}

impl PatternSet {
    /// Create a cache pre-seeded with the whole-token fragments that do not
    /// follow the per-character grammar.
    ///
    /// The space fragment is the only one with a named-reference branch
    /// (`&nbsp;`); the parentheses and the dot pre-escape their literal so
    /// they are not misread as regex metacharacters.
    #[must_use]
    pub fn new() -> Self {
        let mut fragments = HashMap::new();
        let _ = fragments.insert(
            " ".to_owned(),
            format!(r"(?:\s|&nbsp;?|&#0*32{ENTITY_END}|&#x0*20{ENTITY_END})"),
        );
        let _ = fragments.insert(
            "(".to_owned(),
            format!(r"(?:\(|&#0*40{ENTITY_END}|&#x0*28{ENTITY_END})"),
        );
        let _ = fragments.insert(
            ")".to_owned(),
            format!(r"(?:\)|&#0*41{ENTITY_END}|&#x0*29{ENTITY_END})"),
        );
        let _ = fragments.insert(
            ".".to_owned(),
            format!(r"(?:\.|&#0*46{ENTITY_END}|&#x0*2e{ENTITY_END})"),
        );
        Self {
            fragments,
            decoders: None,
        }
    }

    /// Fragment matching `token` in any entity spelling.
    ///
    /// Multi-character tokens concatenate their per-character fragments; both
    /// the composite and each character land in the cache. Matching the
    /// result is case-insensitive, so `fragment("refresh")` also covers
    /// `REFRESH` and `Re&#70;resh`.
    #[must_use]
    pub fn fragment(&mut self, token: &str) -> String {
        if let Some(found) = self.fragments.get(token) {
            return found.clone();
        }
        let mut built = String::new();
        for ch in token.chars() {
            built.push_str(&self.character_fragment(ch));
        }
        let _ = self.fragments.insert(token.to_owned(), built.clone());
        built
    }

    /// Fragment matching a possibly-empty run of whitespace, where each
    /// whitespace character may itself be entity-encoded.
    #[must_use]
    pub fn whitespace_run(&mut self) -> String {
        let mut run = self.fragment(" ");
        run.push('*');
        run
    }

    /// Compiled matchers for every spelling of `/` and of `.`, used to
    /// normalize a candidate URL before resolution.
    ///
    /// Returns `None` only if compilation fails, which the generated grammar
    /// never does; callers treat `None` as "leave the value undecoded".
    pub fn decoders(&mut self) -> Option<(&Regex, &Regex)> {
        if self.decoders.is_none() {
            let slash = self.fragment("/");
            let dot = self.fragment(".");
            self.decoders = compile(&slash).zip(compile(&dot));
        }
        self.decoders.as_ref().map(|(slash, dot)| (slash, dot))
    }

    /// [§ 13.2.5.73 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    ///
    /// Build the alternation for one character. Cased letters get branches
    /// for the uppercase code point as well; the literal branch relies on
    /// case-insensitive compilation instead.
    fn character_fragment(&mut self, ch: char) -> String {
        let lower = ch.to_ascii_lowercase();
        let key = lower.to_string();
        if let Some(found) = self.fragments.get(&key) {
            return found.clone();
        }
        let upper = ch.to_ascii_uppercase();
        let mut branches = vec![regex::escape(&key)];
        branches.push(format!("&#0*{}{ENTITY_END}", u32::from(lower)));
        branches.push(format!("&#x0*{:x}{ENTITY_END}", u32::from(lower)));
        if lower != upper {
            branches.push(format!("&#0*{}{ENTITY_END}", u32::from(upper)));
            branches.push(format!("&#x0*{:x}{ENTITY_END}", u32::from(upper)));
        }
        let built = format!("(?:{})", branches.join("|"));
        let _ = self.fragments.insert(key, built.clone());
        built
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a generated pattern case-insensitively.
///
/// Compilation of builder output is expected to succeed; a `None` maps to
/// the construct-skipping degradation in `quokka-rewrite` rather than an
/// error.
#[must_use]
pub fn compile(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()
}
