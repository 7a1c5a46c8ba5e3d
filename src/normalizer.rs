// Text normalization shared by the matcher stages and the fuzzy index.

const TRADEMARK_GLYPHS: &[char] = &['™', '®', '©'];

/// Removes ™, ® and © from a product name.
pub fn strip_trademarks(text: &str) -> String {
    text.chars().filter(|c| !TRADEMARK_GLYPHS.contains(c)).collect()
}

/// Lowercased product name with trademark glyphs removed, as used for literal matching.
pub fn literal_name(name: &str) -> String {
    strip_trademarks(name).to_lowercase()
}

/// Splits lowercased text on every non-alphanumeric character, keeping tokens of at least `min_len` chars.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    strip_trademarks(text)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && t.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}
