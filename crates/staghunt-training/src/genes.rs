//! Gene vector operations for the genetic algorithm.
//!
//! These are the building blocks [`PopulationEvolver`](crate::genetic::PopulationEvolver)
//! uses for initialization, crossover and mutation. Genes are integers; every operation
//! that creates a new value keeps it within the given bounds, while genes copied from a
//! parent are passed on unchanged.

use rand::Rng;
use rand_distr::Normal;

/// Creates a gene vector by applying a function to each index.
pub fn from_fn<F>(f: F, len: usize) -> Vec<i32>
where
    F: FnMut(usize) -> i32,
{
    (0..len).map(f).collect()
}

/// Samples every gene independently and uniformly from `min..=max`.
///
/// ```
/// use staghunt_training::genes;
///
/// let genes = genes::random(&mut rand::rng(), 0, 100, 7);
/// assert_eq!(genes.len(), 7);
/// assert!(genes.iter().all(|g| (0..=100).contains(g)));
/// ```
pub fn random<R>(rng: &mut R, min: i32, max: i32, len: usize) -> Vec<i32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(min..=max), len)
}

/// Swaps the tails of two parents after a random cut point.
///
/// The cut is drawn from `1..len`, so both children take at least one gene from each
/// parent. Parents shorter than two genes are returned unchanged.
///
/// # Panics
///
/// Panics if the parents differ in length.
pub fn single_point<R>(p1: &[i32], p2: &[i32], rng: &mut R) -> (Vec<i32>, Vec<i32>)
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    if p1.len() < 2 {
        return (p1.to_vec(), p2.to_vec());
    }
    let cut = rng.random_range(1..p1.len());
    (
        [&p1[..cut], &p2[cut..]].concat(),
        [&p2[..cut], &p1[cut..]].concat(),
    )
}

/// Swaps the segment between two distinct random cut points.
///
/// Falls back to [`single_point`] for parents shorter than three genes.
///
/// # Panics
///
/// Panics if the parents differ in length.
pub fn two_point<R>(p1: &[i32], p2: &[i32], rng: &mut R) -> (Vec<i32>, Vec<i32>)
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let len = p1.len();
    if len < 3 {
        return single_point(p1, p2, rng);
    }
    let first = rng.random_range(1..len - 1);
    let second = rng.random_range(first + 1..len);
    let mut c1 = p1.to_vec();
    let mut c2 = p2.to_vec();
    c1[first..second].copy_from_slice(&p2[first..second]);
    c2[first..second].copy_from_slice(&p1[first..second]);
    (c1, c2)
}

/// Exchanges every gene position between the parents with probability one half.
///
/// # Panics
///
/// Panics if the parents differ in length.
pub fn uniform<R>(p1: &[i32], p2: &[i32], rng: &mut R) -> (Vec<i32>, Vec<i32>)
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let mut c1 = p1.to_vec();
    let mut c2 = p2.to_vec();
    for (a, b) in c1.iter_mut().zip(&mut c2) {
        if rng.random_bool(0.5) {
            std::mem::swap(a, b);
        }
    }
    (c1, c2)
}

/// Replaces each gene, with probability `rate`, by a fresh uniform draw from `min..=max`.
pub fn mutate_range<R>(genes: &mut [i32], min: i32, max: i32, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random_bool(rate) {
            *gene = rng.random_range(min..=max);
        }
    }
}

/// Adds rounded `N(0, sigma)` noise to each gene with probability `rate`, then clamps
/// the result to `min..=max`.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite.
#[expect(clippy::cast_possible_truncation)]
pub fn mutate_gaussian<R>(genes: &mut [i32], sigma: f64, min: i32, max: i32, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma)
        .unwrap_or_else(|e| panic!("invalid mutation sigma {sigma}: {e}"));
    for gene in genes {
        if rng.random_bool(rate) {
            let value = (f64::from(*gene) + rng.sample(normal)).round();
            *gene = value.clamp(f64::from(min), f64::from(max)) as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    const P1: [i32; 7] = [0, 0, 0, 0, 0, 0, 0];
    const P2: [i32; 7] = [1, 1, 1, 1, 1, 1, 1];

    #[test]
    fn test_random_stays_in_bounds() {
        let mut rng = rng();
        for _ in 0..100 {
            let genes = random(&mut rng, -5, 5, 10);
            assert!(genes.iter().all(|g| (-5..=5).contains(g)));
        }
    }

    #[test]
    fn test_single_point_swaps_tails() {
        let mut rng = rng();
        for _ in 0..50 {
            let (c1, c2) = single_point(&P1, &P2, &mut rng);
            let cut = c1.iter().position(|&g| g == 1).unwrap();
            assert!((1..P1.len()).contains(&cut));
            assert!(c1[cut..].iter().all(|&g| g == 1));
            assert!(c2[..cut].iter().all(|&g| g == 1));
            assert!(c2[cut..].iter().all(|&g| g == 0));
        }
    }

    #[test]
    fn test_two_point_swaps_inner_segment() {
        let mut rng = rng();
        for _ in 0..50 {
            let (c1, c2) = two_point(&P1, &P2, &mut rng);
            let first = c1.iter().position(|&g| g == 1).unwrap();
            let second = c1.iter().rposition(|&g| g == 1).unwrap() + 1;
            assert!(first >= 1 && first < second && second < P1.len());
            assert!(c1[first..second].iter().all(|&g| g == 1));
            assert_eq!(c1[0], 0);
            for (a, b) in c1.iter().zip(&c2) {
                assert_eq!(a + b, 1);
            }
        }
    }

    #[test]
    fn test_uniform_keeps_gene_positions() {
        let p1 = [1, 2, 3, 4, 5];
        let p2 = [10, 20, 30, 40, 50];
        let (c1, c2) = uniform(&p1, &p2, &mut rng());
        for i in 0..p1.len() {
            let mut pair = [c1[i], c2[i]];
            pair.sort_unstable();
            assert_eq!(pair, [p1[i], p2[i]]);
        }
    }

    #[test]
    fn test_short_parents_pass_through() {
        let (c1, c2) = single_point(&[7], &[9], &mut rng());
        assert_eq!((c1, c2), (vec![7], vec![9]));
    }

    #[test]
    fn test_mutation_rate_extremes() {
        let mut rng = rng();
        let mut genes = [500; 20];
        mutate_range(&mut genes, 0, 100, 0.0, &mut rng);
        assert_eq!(genes, [500; 20]);
        mutate_range(&mut genes, 0, 100, 1.0, &mut rng);
        assert!(genes.iter().all(|g| (0..=100).contains(g)));
    }

    #[test]
    fn test_gaussian_mutation_is_clamped() {
        let mut rng = rng();
        let mut genes = [100; 50];
        mutate_gaussian(&mut genes, 30.0, 0, 100, 1.0, &mut rng);
        assert!(genes.iter().all(|g| (0..=100).contains(g)));
        assert!(genes.iter().any(|&g| g < 100));
    }
}
