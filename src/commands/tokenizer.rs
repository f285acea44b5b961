//! Command line tokenizer.
//!
//! Splits the text following the command marker into the command name and
//! its argument tokens. Double quotes group words into one token and are
//! never emitted themselves. Unbalanced quotes are not an error: the rest
//! of the line simply stays inside the last token.

/// Split a command line into tokens.
///
/// Only the ASCII space delimits tokens outside of quotes; runs of spaces
/// collapse. A quote pair with nothing between it yields no token.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            ' ' if !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_quoted_argument() {
        assert_eq!(tokenize("add 5 \"my item\""), vec!["add", "5", "my item"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn consecutive_spaces_collapse() {
        assert_eq!(tokenize("a  b"), vec!["a", "b"]);
        assert_eq!(tokenize("  a b  "), vec!["a", "b"]);
    }

    #[test]
    fn quotes_join_mid_token() {
        assert_eq!(tokenize("say he\"llo wor\"ld"), vec!["say", "hello world"]);
    }

    #[test]
    fn empty_quote_pair_is_dropped() {
        assert_eq!(tokenize("a \"\" b"), vec!["a", "b"]);
        assert_eq!(tokenize("\"\""), Vec::<String>::new());
        assert_eq!(tokenize("x\"\"y"), vec!["xy"]);
    }

    #[test]
    fn quoted_spaces_survive() {
        assert_eq!(tokenize("\"  \""), vec!["  "]);
    }

    #[test]
    fn unterminated_quote_absorbs_rest() {
        assert_eq!(tokenize("note \"left open  here"), vec!["note", "left open  here"]);
    }

    #[test]
    fn tabs_are_not_delimiters() {
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn balanced_quotes_never_reach_output() {
        let inputs = [
            "\"a\" \"b c\" d",
            "x\"y\"z \"\" q",
            "\"\"\"\"",
            "one \"two three\" \"four\"",
        ];
        for input in inputs {
            assert_eq!(input.matches('"').count() % 2, 0);
            for token in tokenize(input) {
                assert!(!token.contains('"'), "{input:?} leaked a quote");
            }
        }
    }
}
