use serde::{Deserialize, Serialize};

/// Case handling applied before splitting on whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    #[default]
    Sensitive,
    Insensitive,
}

/// Whitespace tokenizer. Tokens compare by exact string match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    pub case: CaseMode,
}

impl Tokenizer {
    pub fn new(case: CaseMode) -> Self {
        Self { case }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self.case {
            CaseMode::Sensitive => str_to_word_vec(text),
            CaseMode::Insensitive => str_to_word_vec(&text.to_lowercase()),
        }
    }
}

pub struct Sequence {
    pub text: String,
    pub word_vector: Vec<String>,
    pub n_words: usize,
}

impl Sequence {
    pub fn new(text: &str) -> Self {
        Self::with_tokenizer(text, &Tokenizer::default())
    }

    pub fn with_tokenizer(text: &str, tokenizer: &Tokenizer) -> Self {
        let word_vec = tokenizer.tokenize(text);
        let word_vec_len = word_vec.len();
        Sequence {
            text: text.to_string(),
            word_vector: word_vec,
            n_words: word_vec_len,
        }
    }

    /// Keeps only the first `limit` words. The raw text is left as given.
    pub fn truncate_words(&mut self, limit: usize) {
        self.word_vector.truncate(limit);
        self.n_words = self.word_vector.len();
    }
}

pub fn str_to_word_vec(string: &str) -> Vec<String> {
    string.split_whitespace().map(|s| s.to_string()).collect()
}

/// Longest prefix of `text` that is at most `limit` bytes and ends on a char boundary.
pub fn truncate_bytes(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert!(Tokenizer::default().tokenize("").is_empty());
        assert!(Tokenizer::default().tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        let tokens = Tokenizer::default().tokenize(" the\tcat\n sat ");
        assert_eq!(tokens, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let tokens = Tokenizer::default().tokenize("The the");
        assert_eq!(tokens, vec!["The", "the"]);

        let tokens = Tokenizer::new(CaseMode::Insensitive).tokenize("The the");
        assert_eq!(tokens, vec!["the", "the"]);
    }

    #[test]
    fn test_truncate_words() {
        let mut seq = Sequence::new("a b c d e");
        seq.truncate_words(3);
        assert_eq!(seq.word_vector, vec!["a", "b", "c"]);
        assert_eq!(seq.n_words, 3);

        let mut short = Sequence::new("a b");
        short.truncate_words(10);
        assert_eq!(short.n_words, 2);
    }

    #[test]
    fn test_truncate_bytes_respects_char_boundary() {
        assert_eq!(truncate_bytes("hello world", 5), "hello");
        assert_eq!(truncate_bytes("hi", 10), "hi");
        // 'é' is two bytes; cutting inside it backs off to the boundary
        assert_eq!(truncate_bytes("café", 4), "caf");
    }
}
