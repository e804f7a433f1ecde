use veille_core::keywords::{extract_keywords, is_stopword, tokenize, KeywordCount};
use veille_core::Mention;

fn titled(titles: &[Option<&str>]) -> Vec<Mention> {
    titles
        .iter()
        .map(|title| Mention::new(None, Some("A"), "neutral", *title))
        .collect()
}

#[test]
fn tokenizer_keeps_alphabetic_runs_of_four_or_more() {
    let tokens = tokenize("Big News Today: 2023 budget, l'économie et les PME");
    assert_eq!(tokens, vec!["news", "today", "budget", "économie"]);
}

#[test]
fn tokenizer_skips_stopwords_and_mixed_digit_tokens() {
    assert!(is_stopword("dans"));
    assert!(is_stopword("pour"));
    let tokens = tokenize("Dans la ville pour covid19 et 2024 vaccins");
    assert_eq!(tokens, vec!["ville", "vaccins"]);
}

#[test]
fn short_function_words_are_dropped_by_length_alone() {
    for word in ["les", "des", "une", "est", "sur", "été"] {
        assert!(!is_stopword(word), "{word} should not need a stopword entry");
    }
    let tokens = tokenize("Les élus sur les ondes été comme hiver");
    assert_eq!(tokens, vec!["élus", "ondes", "hiver"]);
}

#[test]
fn counts_and_ranks_with_first_occurrence_tie_break() {
    let mentions = titled(&[
        Some("Grève des transports"),
        Some("Transports publics en grève"),
        Some("Budget publics"),
        None,
        Some("Inflation record"),
    ]);

    let keywords = extract_keywords(&mentions, 15);
    let pairs: Vec<(&str, usize)> = keywords
        .iter()
        .map(|k| (k.token.as_str(), k.count))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("grève", 2),
            ("transports", 2),
            ("publics", 2),
            ("budget", 1),
            ("inflation", 1),
            ("record", 1),
        ]
    );
}

#[test]
fn limits_to_top_n() {
    let title = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike november oscar papa quebec romeo";
    let mentions = titled(&[Some(title)]);

    let keywords = extract_keywords(&mentions, 15);

    assert_eq!(keywords.len(), 15);
    assert_eq!(keywords[0].token, "alpha");
    assert_eq!(keywords[14].token, "oscar");
}

#[test]
fn extraction_is_idempotent() {
    let mentions = titled(&[Some("Usine inaugurée"), Some("Usine fermée"), Some("Nouvelle usine")]);

    let first = extract_keywords(&mentions, 15);
    let second = extract_keywords(&mentions, 15);

    assert_eq!(first, second);
    assert_eq!(first[0], KeywordCount::new("usine", 3));
}

#[test]
fn labels_combine_token_and_count() {
    let keyword = KeywordCount::new("économie", 4);
    assert_eq!(keyword.label, "économie (4)");
}

#[test]
fn titleless_input_yields_no_keywords() {
    let mentions = titled(&[None, None]);
    assert!(extract_keywords(&mentions, 15).is_empty());
}
