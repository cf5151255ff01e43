//! Embedding function seam for the rule store.
//!
//! The store only depends on the [`EmbeddingProvider`] trait; the default
//! implementation produces hashed tf–idf dense vectors, which keeps the
//! whole pipeline deterministic and usable offline.

/// Turns text into a fixed-dimension dense vector.
///
/// Deterministic for a fixed provider: identical input text must always
/// produce an identical vector.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    fn dimensions(&self) -> usize;
}

/// Hashed tf–idf embedding provider.
///
/// Terms are hashed into fixed-dimension buckets with FNV-1a and weighted
/// by term frequency times a length-based idf approximation, then the
/// vector is L2-normalised. Not as rich as a neural model, but cheap,
/// deterministic, and good enough to rank short rule descriptions against
/// code snippets that share identifier terms.
pub struct HashedTfIdf {
    dimensions: usize,
}

pub const DEFAULT_DIMENSIONS: usize = 256;

impl HashedTfIdf {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Default for HashedTfIdf {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl EmbeddingProvider for HashedTfIdf {
    fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut counts: std::collections::HashMap<&str, f32> = std::collections::HashMap::new();
        for tok in &tokens {
            *counts.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vector = vec![0.0f32; self.dimensions];
        for (term, count) in &counts {
            let tf = count / total;
            let idf = 1.0 + (term.len() as f32).ln();
            vector[Self::hash_term(term, self.dimensions)] += tf * idf;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Cosine distance: 0.0 for identical direction, 1.0 for orthogonal.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b)
}
