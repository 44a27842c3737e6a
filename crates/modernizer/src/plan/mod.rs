pub mod extractor;
pub mod types;

pub use extractor::extract_plan;
pub use types::{normalize_framework, LegacyPattern, TransformationPlan, MANUAL_REVIEW_STEP};
