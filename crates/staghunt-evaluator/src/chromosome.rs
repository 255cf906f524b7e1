//! Weight vectors parameterizing the decision engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Conventional lower bound of a gene.
pub const GENE_MIN: i32 = 0;
/// Conventional upper bound of a gene.
pub const GENE_MAX: i32 = 100;

/// An ordered vector of integer weights, one per heuristic.
///
/// Genes are meant to lie in [`GENE_MIN`]`..=`[`GENE_MAX`], but values outside that
/// range are accepted and used as-is. A chromosome never changes after creation;
/// genetic operators produce new ones.
///
/// # Example
///
/// ```
/// use staghunt_evaluator::chromosome::Chromosome;
///
/// let chromosome: Chromosome = "15, 15, 13, 15, 15".parse().unwrap();
/// assert_eq!(chromosome.genes(), [15, 15, 13, 15, 15]);
/// assert_eq!(chromosome.to_string(), "[15, 15, 13, 15, 15]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chromosome(Vec<i32>);

impl Chromosome {
    #[must_use]
    pub fn new(genes: Vec<i32>) -> Self {
        Self(genes)
    }

    #[must_use]
    pub fn genes(&self) -> &[i32] {
        &self.0
    }

    #[must_use]
    pub fn into_genes(self) -> Vec<i32> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every gene lies within the conventional bounds.
    #[must_use]
    pub fn is_conventional(&self) -> bool {
        self.0.iter().all(|g| (GENE_MIN..=GENE_MAX).contains(g))
    }
}

impl From<Vec<i32>> for Chromosome {
    fn from(genes: Vec<i32>) -> Self {
        Self(genes)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid gene {gene:?}: expected a comma-separated list of integers")]
pub struct ParseChromosomeError {
    gene: String,
}

impl FromStr for Chromosome {
    type Err = ParseChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('[').trim_end_matches(']');
        s.split(',')
            .map(|gene| {
                let gene = gene.trim();
                gene.parse().map_err(|_| ParseChromosomeError {
                    gene: gene.to_owned(),
                })
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}
