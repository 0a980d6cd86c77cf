mod canned;
mod r#trait;

pub use canned::CannedGenerator;
pub use r#trait::ContentGenerator;
