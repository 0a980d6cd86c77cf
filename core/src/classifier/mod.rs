mod keywords;
mod r#trait;

pub use keywords::{
    classify_query, classify_response, KeywordClassifier, QUERY_KEYWORDS, RESPONSE_KEYWORDS,
};
pub use r#trait::AdviceClassifier;
