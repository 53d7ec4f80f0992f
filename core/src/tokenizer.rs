use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[A-Za-z0-9]+").expect("valid regex");
}

/// Tokenize text into lowercase ASCII alphanumeric runs, left to right.
///
/// The iterator borrows `text` and holds no other state, so calling this again
/// on the same input yields the same sequence. Every token is non-empty.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    RE.find_iter(text).map(|m| m.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t: Vec<String> = tokenize("The Cat, sat!").collect();
        assert_eq!(t, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("  ,;- ").count(), 0);
    }
}
