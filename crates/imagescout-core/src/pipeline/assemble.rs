//! Candidate records to client-facing images.

use crate::types::{CandidateImage, ProcessedImage};

/// Map candidates to [`ProcessedImage`]s, flagging position `selected` as best.
///
/// A negative or out-of-range `selected` flags nothing. Titles fall back to
/// `keyword` when the record carries no usable caption.
pub fn assemble_images(
    images: &[CandidateImage],
    selected: i32,
    keyword: &str,
) -> Vec<ProcessedImage> {
    images
        .iter()
        .enumerate()
        .map(|(i, img)| ProcessedImage {
            id: img.id.clone(),
            url: img.regular_url().to_string(),
            title: img.caption().unwrap_or(keyword).to_string(),
            description: format!("摄影师: {}", img.user.name),
            photographer: img.user.name.clone(),
            is_best: i as i64 == selected as i64,
        })
        .collect()
}
