use chunkvault_core::{ChunkvaultError, ChunkvaultResult};

/// Checks that an embedding has a direction: non-empty, finite, non-zero.
/// Returns its largest absolute component, used to rescale it before any
/// sum of squares so that tiny or huge components neither underflow nor
/// overflow.
pub fn validate_embedding(v: &[f64]) -> ChunkvaultResult<f64> {
    if v.is_empty() {
        return Err(ChunkvaultError::DegenerateVector(
            "embedding is empty".to_string(),
        ));
    }
    if let Some(pos) = v.iter().position(|x| !x.is_finite()) {
        return Err(ChunkvaultError::DegenerateVector(format!(
            "component {pos} is not finite"
        )));
    }
    let scale = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return Err(ChunkvaultError::DegenerateVector(
            "embedding is the zero vector".to_string(),
        ));
    }
    Ok(scale)
}

/// Cosine similarity between two embeddings.
///
/// Fails with [`ChunkvaultError::DimensionMismatch`] when the lengths differ
/// and with [`ChunkvaultError::DegenerateVector`] when either side is empty,
/// zero or non-finite. Valid inputs score in `[-1, 1]`; a zero score is
/// always `+0.0`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> ChunkvaultResult<f64> {
    if a.len() != b.len() {
        return Err(ChunkvaultError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let sa = validate_embedding(a)?;
    let sb = validate_embedding(b)?;

    // Each rescaled vector has a component of magnitude 1, so both sums of
    // squares are at least 1.
    let (mut dot, mut na, mut nb) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / sa, y / sb);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let score = (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0);
    // Fold -0.0 into +0.0 so orthogonal vectors tie exactly.
    Ok(score + 0.0)
}
