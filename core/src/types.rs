use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearanceLevel {
    #[default]
    Low,
    High,
}

impl ClearanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearanceLevel::Low => "low",
            ClearanceLevel::High => "high",
        }
    }
}

impl fmt::Display for ClearanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller a request is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub tier: Tier,
    #[serde(default)]
    pub clearance_level: ClearanceLevel,
    #[serde(default)]
    pub ai_advice_opted_in: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, tier: Tier) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
            clearance_level: ClearanceLevel::default(),
            ai_advice_opted_in: false,
        }
    }

    pub fn with_clearance(mut self, level: ClearanceLevel) -> Self {
        self.clearance_level = level;
        self
    }

    pub fn opted_in(mut self, opted_in: bool) -> Self {
        self.ai_advice_opted_in = opted_in;
        self
    }

    /// Premium caller with high clearance who has opted in to AI advice.
    pub fn example_premium() -> Self {
        Identity::new("user@example.com", Tier::PremiumUser)
            .with_clearance(ClearanceLevel::High)
            .opted_in(true)
    }

    /// Restricted caller with low clearance who has not opted in.
    pub fn example_restricted() -> Self {
        Identity::new("restricted@example.com", Tier::RestrictedUser)
            .with_clearance(ClearanceLevel::Low)
            .opted_in(false)
    }

    pub fn example(user_id: &str) -> Option<Self> {
        [Self::example_premium(), Self::example_restricted()]
            .into_iter()
            .find(|i| i.user_id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub question: String,
    pub context: Identity,
}

impl Query {
    pub fn new(question: impl Into<String>, context: Identity) -> Self {
        Self {
            question: question.into(),
            context,
        }
    }
}

/// Generated answer plus its compliance flags. Only the compliance gate
/// changes the flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    #[serde(default)]
    pub includes_advice: bool,
    #[serde(default)]
    pub disclaimer_added: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Response {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            includes_advice: false,
            disclaimer_added: false,
            metadata: None,
        }
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }
}
