use retrieval::tokenizer::{important_words, is_unimportant, presence_terms, strip_punctuation, words};

#[test]
fn it_lowercases_and_splits_on_word_boundaries() {
    let toks = words("Running Runners RUN! The café's menu.");
    assert_eq!(toks, vec!["running", "runners", "run", "the", "café", "s", "menu"]);
}

#[test]
fn it_does_not_stem() {
    let toks = words("connected connection connecting");
    assert!(toks.contains(&"connected".to_string()));
    assert!(toks.contains(&"connecting".to_string()));
}

#[test]
fn importance_filter_drops_stopwords_and_verb_suffixes() {
    let toks = important_words("The quick fox is jumping over the lazy dog, and it barked.");
    assert_eq!(toks, vec!["quick", "fox", "over", "lazy", "dog", "it"]);
}

#[test]
fn importance_filter_only_trims_commas_and_periods() {
    let toks = important_words("fox! (dog) ...cat...");
    assert_eq!(toks, vec!["fox!", "(dog)", "cat"]);
}

#[test]
fn suffix_heuristic_has_false_positives() {
    for w in ["garden", "red", "plate", "spoon"] {
        let dropped = is_unimportant(w);
        assert_eq!(dropped, w != "spoon", "{w}");
    }
}

#[test]
fn presence_terms_strip_punctuation_before_splitting() {
    assert_eq!(strip_punctuation("don't stop, now."), "dont stop now");
    assert_eq!(presence_terms("The cat's at the door."), vec!["cats", "door"]);
}
