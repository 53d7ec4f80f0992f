//! Four-character phonetic codes used for out-of-vocabulary query fallback.
//!
//! Letters map to digit classes; vowels and `H`, `W`, `Y` (and any other
//! character outside the table) separate runs so that a repeated class on
//! either side of them is written twice. A digit equal to the last one
//! written is dropped. The first character is kept uppercased as-is.

/// Length of every code produced by [`soundex`].
pub const CODE_LEN: usize = 4;

fn digit_class(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Encode a token as a Soundex code, e.g. `"Robert"` -> `"R163"`.
///
/// Returns `None` for the empty string, which has no code.
pub fn soundex(token: &str) -> Option<String> {
    let upper = token.to_uppercase();
    let mut chars = upper.chars();
    let first = chars.next()?;

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first);
    // '0' marks a separator; it is compared against but never written.
    let mut last = first;
    for c in chars {
        match digit_class(c) {
            Some(d) if d != last => {
                code.push(d);
                last = d;
            }
            Some(_) => {}
            None => last = '0',
        }
    }

    let mut out: String = code.chars().take(CODE_LEN).collect();
    while out.chars().count() < CODE_LEN {
        out.push('0');
    }
    Some(out)
}
