//! External-facing services: AI gateway and the features built on it

pub mod ai_gateway;
pub mod duplicate_detector;
pub mod metadata_suggester;

pub use ai_gateway::{AiGatewayClient, AiGatewayError, CompletionClient};
pub use duplicate_detector::{
    CandidateSource, Confidence, DuplicateCheckRequest, DuplicateCheckResult, DuplicateDetector,
};
pub use metadata_suggester::{MetadataRequest, MetadataSuggester, MetadataSuggestion};
