use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::keys;

/// Resource part of a decision request: a type plus its attribute bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// A typed request for one resource type. The attribute bag is produced by
/// serializing `Self`, so field names are the attribute names.
pub trait ResourceRequest: Serialize {
    const RESOURCE_TYPE: &'static str;
    const ACTION: &'static str;
    /// Attribute names the serialized form will carry.
    const ATTRIBUTES: &'static [&'static str];

    fn to_resource(&self) -> CheckResource {
        let attributes = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        CheckResource {
            resource_type: Self::RESOURCE_TYPE.to_string(),
            attributes,
        }
    }
}

/// Pre-generation check: may this caller receive (AI-generated) advice?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdviceRequest {
    pub is_ai_generated: bool,
}

impl ResourceRequest for AdviceRequest {
    const RESOURCE_TYPE: &'static str = keys::FINANCIAL_ADVICE;
    const ACTION: &'static str = keys::RECEIVE;
    const ATTRIBUTES: &'static [&'static str] = &[keys::IS_AI_GENERATED];
}

/// Post-generation check: does this response require a disclaimer?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseContentRequest {
    pub contains_advice: bool,
}

impl ResourceRequest for ResponseContentRequest {
    const RESOURCE_TYPE: &'static str = keys::FINANCIAL_RESPONSE;
    const ACTION: &'static str = keys::REQUIRES_DISCLAIMER;
    const ATTRIBUTES: &'static [&'static str] = &[keys::CONTAINS_ADVICE];
}
