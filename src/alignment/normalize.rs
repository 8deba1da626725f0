/// Canonical comparison form of a word: lower-cased, letters and digits only.
///
/// Classification is Unicode-aware, so accented and non-Latin letters survive.
/// The result is only ever used for matching, never for output text.
pub fn normalize(word: &str) -> String {
    let mut normalized = String::with_capacity(word.len());
    for ch in word.chars() {
        if ch.is_alphanumeric() {
            normalized.extend(ch.to_lowercase());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(normalize("Hello,"), "hello");
        assert_eq!(normalize("world!"), "world");
        assert_eq!(normalize("can't"), "cant");
        assert_eq!(normalize("R2-D2"), "r2d2");
    }

    #[test]
    fn punctuation_only_becomes_empty() {
        assert_eq!(normalize("--"), "");
        assert_eq!(normalize("..."), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(normalize("Ça"), "ça");
        assert_eq!(normalize("Über!"), "über");
        assert_eq!(normalize("«Привет»"), "привет");
        assert_eq!(normalize("東京。"), "東京");
    }
}
