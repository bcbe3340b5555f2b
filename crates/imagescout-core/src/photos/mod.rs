//! Stock-photo search integration.

pub(crate) mod source;
pub(crate) mod unsplash;

pub use source::PhotoSource;
pub use unsplash::UnsplashClient;
