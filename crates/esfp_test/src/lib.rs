//! Shared helpers for the esfp integration tests.

use esfp::{PipelineConfig, TransformResult};

/// Split `bytes` at the given offsets, in any order and with duplicates.
pub fn split_at_points<'a>(bytes: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> = points.iter().map(|&p| p.min(bytes.len())).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for point in points {
        chunks.push(&bytes[start..point]);
        start = point;
    }
    chunks.push(&bytes[start..]);
    chunks
}

/// Run the one-shot transform and render the result as comparable text.
pub fn run_to_string(chunks: &[&[u8]], config: &PipelineConfig) -> anyhow::Result<String> {
    let result: TransformResult = esfp::transform(chunks.iter().copied(), config)?;
    Ok(result.into_inline_code()?)
}
