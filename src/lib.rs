pub mod analysis;
pub mod cli;
pub mod config;
pub mod disc;
pub mod metadata;
pub mod naming;
pub mod processing;
pub mod utils;

pub use analysis::{
    ContentClassification, ContentKind, ContentTypeDetector, DetectionRule, TitleSelector,
};
pub use config::Config;
pub use disc::{DiscInfo, DiscReader, DiscSource, DiscType, MakeMkv, RipExecutor, TitleRecord};
pub use metadata::{Metadata, MetadataProvider, NoMetadata, TmdbProvider};
pub use processing::{RipOptions, RipSummary, RipWorkflow};
pub use utils::{Error, Result};
