//! Rewriter warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the URL resolver and the attribute locator to report inputs they
//! can only handle in a degraded way (a base URL without an extractable
//! authority, a construct pattern that failed to compile). The rewrite
//! itself never fails; these warnings are the only visible trace of a
//! degradation.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Warnings already printed in this process, keyed by component and text.
static WARNED: LazyLock<Mutex<HashSet<String>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// Warn about a degraded rewrite (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("URL", "cannot extract an authority from base 'notes.html'");
/// ```
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    if WARNED.lock().unwrap().insert(key) {
        eprintln!("{YELLOW}[Quokka {component}] ⚠ {message}{RESET}");
    }
}

/// Forget every recorded warning, so the next degradation prints again.
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn clear_warnings() {
    WARNED.lock().unwrap().clear();
}
