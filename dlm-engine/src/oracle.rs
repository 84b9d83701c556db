//! Semantic similarity oracle.
//!
//! The engine only ever asks one question of it: how close are these two
//! texts, as a score in `[0, 1]`, or "no opinion" when either text has no
//! usable embedding or the backend is unreachable.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::embeddings::EmbeddingClient;

#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    async fn similarity(&self, a: &str, b: &str) -> Option<f64>;
}

/// Oracle used when embeddings are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOracle;

#[async_trait]
impl SimilarityOracle for NoopOracle {
    async fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
        None
    }
}

/// Cosine similarity over embedding vectors, cached per text.
///
/// Operator detection asks about the same lexicon phrases over and over, so
/// every text is embedded at most once per process. The first failed request
/// takes the backend out of service for the rest of the process.
#[derive(Debug)]
pub struct EmbeddingOracle {
    client: EmbeddingClient,
    cache: Mutex<HashMap<String, Vec<f32>>>,
    available: AtomicBool,
}

impl EmbeddingOracle {
    pub fn new(client: EmbeddingClient) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    fn cached(&self, text: &str) -> Option<Vec<f32>> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(text).cloned())
    }

    async fn vectors(&self, a: &str, b: &str) -> Option<(Vec<f32>, Vec<f32>)> {
        let mut missing: Vec<&str> = Vec::new();
        for text in [a, b] {
            if self.cached(text).is_none() && !missing.contains(&text) {
                missing.push(text);
            }
        }

        if !missing.is_empty() {
            if !self.available.load(Ordering::Relaxed) {
                return None;
            }
            match self.client.embed(&missing).await {
                Ok(vectors) => {
                    if let Ok(mut cache) = self.cache.lock() {
                        for (text, vector) in missing.iter().zip(vectors) {
                            cache.insert(text.to_string(), vector);
                        }
                    }
                }
                Err(err) => {
                    if self.available.swap(false, Ordering::Relaxed) {
                        warn!(
                            "similarity oracle unavailable ({}), semantic matching is off: {}",
                            self.client.model(),
                            err
                        );
                    }
                    return None;
                }
            }
        }

        Some((self.cached(a)?, self.cached(b)?))
    }
}

#[async_trait]
impl SimilarityOracle for EmbeddingOracle {
    async fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let (a, b) = (a.trim(), b.trim());
        if a.is_empty() || b.is_empty() {
            return None;
        }
        let (va, vb) = self.vectors(a, b).await?;
        let score = cosine_similarity(&va, &vb);
        debug!("semantic similarity {:?} ~ {:?} = {:?}", a, b, score);
        score
    }
}

/// Cosine of two vectors clamped to `[0, 1]`; `None` for zero or mismatched vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0))
}
