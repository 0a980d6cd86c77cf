use super::r#trait::AdviceClassifier;

/// Phrases that mark a question as seeking advice rather than information.
pub const QUERY_KEYWORDS: &[&str] = &[
    "should i",
    "recommend",
    "advice",
    "suggest",
    "help me",
    "what's best",
    "what is best",
    "better option",
];

/// Phrases that mark generated text as containing advice.
pub const RESPONSE_KEYWORDS: &[&str] = &[
    "recommend",
    "should",
    "consider",
    "advise",
    "suggest",
    "better to",
    "optimal",
    "best option",
    "strategy",
    "allocation",
];

/// Case-insensitive substring match against a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    name: String,
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut c = Self {
            name: name.into(),
            keywords: Vec::new(),
        };
        for k in keywords {
            c.push_keyword(k.as_ref());
        }
        c
    }

    pub fn query_default() -> Self {
        Self::new("query_keywords", QUERY_KEYWORDS)
    }

    pub fn response_default() -> Self {
        Self::new("response_keywords", RESPONSE_KEYWORDS)
    }

    /// Adds more keywords. Growth can only turn results from false to true.
    pub fn with_keywords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for k in extra {
            self.push_keyword(k.as_ref());
        }
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn push_keyword(&mut self, k: &str) {
        let k = k.trim().to_lowercase();
        if !k.is_empty() && !self.keywords.contains(&k) {
            self.keywords.push(k);
        }
    }

    /// First keyword found in `text`, if any.
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl AdviceClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_advice(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }
}

/// Whether a question is seeking advice, using the default vocabulary.
pub fn classify_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUERY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether generated text contains advice, using the default vocabulary.
pub fn classify_response(text: &str) -> bool {
    let lower = text.to_lowercase();
    RESPONSE_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_classifier_is_case_insensitive() {
        assert!(classify_query("Recommend a fund"));
        assert!(classify_query("recommend a fund"));
        assert!(classify_query("SHOULD I buy bonds?"));
        assert_eq!(classify_query("Recommend"), classify_query("recommend"));
    }

    #[test]
    fn informational_questions_are_not_advice_seeking() {
        assert!(!classify_query("What is an index fund?"));
        assert!(!classify_query("When does the market open?"));
    }

    #[test]
    fn classifier_is_deterministic() {
        let q = "Can you suggest some basic investment strategies for beginners?";
        let first = classify_query(q);
        for _ in 0..10 {
            assert_eq!(classify_query(q), first);
        }
        assert!(first);
    }

    #[test]
    fn vocabularies_differ() {
        // "strategy" marks content as advice but not a question as advice-seeking
        assert!(classify_response("A common strategy is dollar-cost averaging."));
        assert!(!classify_query("strategy"));
        // "help me" seeks advice, the matching answer need not contain any
        assert!(classify_query("help me understand bonds"));
        assert!(!classify_response("Bonds are loans to an issuer."));
    }

    #[test]
    fn keyword_growth_is_monotonic() {
        let texts = [
            "What is an ETF?",
            "Should I rebalance?",
            "Tell me about annuities",
            "Which is wiser, stocks or bonds?",
        ];
        let base = KeywordClassifier::query_default();
        let grown = base.clone().with_keywords(["wiser", "annuit"]);
        for t in texts {
            if base.is_advice(t) {
                assert!(grown.is_advice(t), "growth flipped `{t}` to false");
            }
        }
        assert!(!base.is_advice("Which is wiser, stocks or bonds?"));
        assert!(grown.is_advice("Which is wiser, stocks or bonds?"));
    }

    #[test]
    fn trait_impl_matches_free_functions() {
        let q = KeywordClassifier::query_default();
        let r = KeywordClassifier::response_default();
        for t in ["Should I?", "consider diversifying", "plain facts", "Optimal allocation"] {
            assert_eq!(q.is_advice(t), classify_query(t));
            assert_eq!(r.is_advice(t), classify_response(t));
        }
    }

    #[test]
    fn extra_keywords_are_normalized_and_deduplicated() {
        let c = KeywordClassifier::query_default().with_keywords(["  ADVICE ", "", "Hedge"]);
        assert_eq!(c.keywords().len(), QUERY_KEYWORDS.len() + 1);
        assert_eq!(c.matched_keyword("how do I HEDGE?"), Some("hedge"));
    }
}
