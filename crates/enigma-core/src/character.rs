// Character helpers used at the text boundary.
//
// Messages arrive as free text: spaced into groups, sometimes in lower case.
// The machine itself only sees alphabet symbols, so the session layer uses
// these helpers to strip separators and fold case before converting.

use crate::alphabet::Alphabet;

/// Convert a character to its simple uppercase equivalent.
///
/// For characters with multi-character uppercase expansions (such as `ß`),
/// returns only the first character.
pub fn simple_upper(c: char) -> char {
    let mut iter = c.to_uppercase();
    iter.next().unwrap_or(c)
}

/// Check whether a character is whitespace.
///
/// Recognizes ASCII control whitespace, the space and no-break space, and
/// the Unicode space separators.
pub fn is_whitespace(c: char) -> bool {
    let cp = c as u32;
    (0x09..=0x0D).contains(&cp)
        || cp == 0x20
        || cp == 0x85
        || cp == 0xA0
        || cp == 0x1680
        || (0x2000..=0x200A).contains(&cp)
        || cp == 0x2028
        || cp == 0x2029
        || cp == 0x202F
        || cp == 0x205F
        || cp == 0x3000
}

/// Remove every whitespace character from `text`.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|&c| !is_whitespace(c)).collect()
}

/// Map `c` onto `alphabet`, folding case when needed.
///
/// Returns `c` itself when it is a symbol, otherwise its simple uppercase
/// form when that is a symbol, otherwise `None`. Alphabets that contain
/// both cases of a letter keep the two apart.
pub fn normalize_symbol(alphabet: &Alphabet, c: char) -> Option<char> {
    if alphabet.contains(c) {
        return Some(c);
    }
    let upper = simple_upper(c);
    alphabet.contains(upper).then_some(upper)
}
