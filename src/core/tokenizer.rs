// File: src/core/tokenizer.rs

/// Splits uppercased input into an alternating word/separator stream and
/// enforces a sentence-terminal token. Input is treated as bytes with
/// ASCII letter/digit classes; tokenization is total.
pub fn tokenize(input: &str) -> Vec<Vec<u8>> {
    let bytes: Vec<u8> = input.bytes().map(|b| b.to_ascii_uppercase()).collect();
    if bytes.is_empty() {
        return vec![b".".to_vec()];
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    for p in 1..bytes.len() {
        if is_boundary(&bytes, p) {
            tokens.push(bytes[start..p].to_vec());
            start = p;
        }
    }
    tokens.push(bytes[start..].to_vec());

    terminate(&mut tokens);
    tokens
}

/// Boundary test at position `p` in `[1, len)`. Apostrophes flanked by
/// letters stay inside the word; otherwise a flip of the letter class or
/// the digit class splits.
fn is_boundary(bytes: &[u8], p: usize) -> bool {
    if bytes[p] == b'\''
        && bytes[p - 1].is_ascii_alphabetic()
        && p + 1 < bytes.len()
        && bytes[p + 1].is_ascii_alphabetic()
    {
        return false;
    }
    if bytes[p - 1] == b'\''
        && p >= 2
        && bytes[p - 2].is_ascii_alphabetic()
        && bytes[p].is_ascii_alphabetic()
    {
        return false;
    }
    (bytes[p].is_ascii_alphabetic() != bytes[p - 1].is_ascii_alphabetic())
        || (bytes[p].is_ascii_digit() != bytes[p - 1].is_ascii_digit())
}

/// Sentence-terminal rule for the final token: bare words gain a ".",
/// separators not ending in terminal punctuation become ".".
fn terminate(tokens: &mut Vec<Vec<u8>>) {
    let last = tokens.last_mut().expect("token stream is never empty");
    if last.first().is_some_and(|b| b.is_ascii_alphanumeric()) {
        tokens.push(b".".to_vec());
    } else if !matches!(last.last(), Some(b'!') | Some(b'.') | Some(b'?')) {
        *last = b".".to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input)
            .into_iter()
            .map(|t| String::from_utf8(t).unwrap())
            .collect()
    }

    #[test]
    fn splits_words_and_separators() {
        assert_eq!(
            words("The quick fox."),
            vec!["THE", " ", "QUICK", " ", "FOX", "."]
        );
    }

    #[test]
    fn keeps_apostrophes_inside_words() {
        assert_eq!(words("don't"), vec!["DON'T", "."]);
        assert_eq!(words("I'm fine!"), vec!["I'M", " ", "FINE", "!"]);
        // A quote without letters on both sides still splits.
        assert_eq!(words("'hi"), vec!["'", "HI", "."]);
    }

    #[test]
    fn digits_split_from_letters() {
        assert_eq!(words("room101"), vec!["ROOM", "101", "."]);
        assert_eq!(words("101 dogs?"), vec!["101", " ", "DOGS", "?"]);
    }

    #[test]
    fn appends_terminal_after_word() {
        assert_eq!(words("hello"), vec!["HELLO", "."]);
    }

    #[test]
    fn rewrites_loose_separator_tail() {
        assert_eq!(words("hello,"), vec!["HELLO", "."]);
        assert_eq!(words("hello   "), vec!["HELLO", "."]);
    }

    #[test]
    fn keeps_terminal_punctuation() {
        assert_eq!(words("what?!"), vec!["WHAT", "?!"]);
        assert_eq!(words("stop."), vec!["STOP", "."]);
    }

    #[test]
    fn empty_input_yields_terminal_only() {
        assert_eq!(words(""), vec!["."]);
        assert_eq!(words("   "), vec!["."]);
    }

    #[test]
    fn concatenation_recovers_uppercased_input() {
        let input = "The quick brown fox, jumps!";
        let joined: Vec<u8> = tokenize(input).concat();
        assert_eq!(joined, input.to_uppercase().into_bytes());
    }
}
