use std::hash::Hash;

use indexmap::IndexMap;
use num::Float;

/// L2 norm of a sequence of weights
///
/// # Arguments
/// * `weights` - vector components
///
/// # Returns
/// * `N` - sqrt(Σ w²)
#[inline]
pub fn l2_norm<N, I>(weights: I) -> N
where
    N: Float,
    I: IntoIterator<Item = N>,
{
    weights
        .into_iter()
        .fold(N::zero(), |acc, w| acc + w * w)
        .sqrt()
}

/// Dot product of two sparse vectors keyed by dimension
///
/// Iterates the shorter side and probes the longer one, so only dimensions
/// present in both contribute.
#[inline]
pub fn sparse_dot<K, N>(a: &IndexMap<K, N>, b: &IndexMap<K, N>) -> N
where
    K: Hash + Eq,
    N: Float,
{
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short
        .iter()
        .filter_map(|(key, &x)| long.get(key).map(|&y| x * y))
        .fold(N::zero(), |acc, v| acc + v)
}

/// cosθ = A・B / (|A||B|)
///
/// Returns `None` when either norm is zero or the result is not finite,
/// instead of propagating NaN or infinity.
#[inline]
pub fn cosine<N>(dot: N, norm_a: N, norm_b: N) -> Option<N>
where
    N: Float,
{
    let denom = norm_a * norm_b;
    if denom <= N::zero() {
        return None;
    }
    let score = dot / denom;
    score.is_finite().then_some(score)
}
