/// Maps free text to "is this advice-related". Implementations must be pure
/// and total; the gates never handle a classifier failure.
pub trait AdviceClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn is_advice(&self, text: &str) -> bool;
}
