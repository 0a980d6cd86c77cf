use thiserror::Error;

/// Static inconsistency in a policy model. Each variant names the item that
/// holds the reference and the key that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate {kind} key `{key}`")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("{owner} references unknown resource `{resource}`")]
    UnknownResource { owner: String, resource: String },

    #[error("{owner} references unknown action `{action}` on resource `{resource}`")]
    UnknownAction {
        owner: String,
        resource: String,
        action: String,
    },

    #[error("{owner} references unknown attribute `{attribute}`")]
    UnknownAttribute { owner: String, attribute: String },

    #[error("{owner} references unknown condition set `{condition_set}`")]
    UnknownConditionSet { owner: String, condition_set: String },

    #[error("{owner} expects `{condition_set}` to be a {expected}")]
    ConditionSetKindMismatch {
        owner: String,
        condition_set: String,
        expected: &'static str,
    },

    #[error("{owner}: resource set `{resource_set}` targets `{actual}` but permission targets `{expected}`")]
    RuleResourceMismatch {
        owner: String,
        resource_set: String,
        expected: String,
        actual: String,
    },

    #[error("{owner}: malformed permission `{permission}` (expected `<resource>:<action>`)")]
    MalformedPermission { owner: String, permission: String },

    #[error("{owner}: {reason}")]
    Invalid { owner: String, reason: String },
}
