pub mod detector;
pub mod selection;
pub mod stats;

pub use detector::{
    ContentClassification, ContentKind, ContentTypeDetector, DetectionRule, DurationBuckets,
};
pub use selection::{SelectedTitle, TitleRole, TitleSelector};
