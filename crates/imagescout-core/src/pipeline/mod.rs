//! Search pipeline stages, in call order:
//! - **keywords**: description to English search phrase
//! - **paginate**: page-by-page photo search, gated by **quality**
//! - **selector**: pick the best candidate
//! - **assemble**: build the client-facing image list

pub(crate) mod json;
pub mod assemble;
pub mod keywords;
pub mod paginate;
pub mod quality;
pub mod selector;

pub use assemble::assemble_images;
pub use keywords::KeywordExtractor;
pub use paginate::MultiPageSearch;
pub use quality::{GateVerdict, QualityGate};
pub use selector::BestImageSelector;
