//! Statistical helpers for the stag hunt workspace.
//!
//! This crate provides the small amount of statistics the rest of the workspace needs:
//!
//! - **Central tendency**: [`descriptive::mean`] and [`descriptive::median`], used by the
//!   reputation heuristics of the decision engine
//! - **Descriptive statistics**: [`descriptive::DescriptiveStats`], used to summarize
//!   the population fitness of every generation during training
//!
//! # Examples
//!
//! ## Mean and median of reputations
//!
//! ```
//! use staghunt_stats::descriptive;
//!
//! let reputations = [0.2, 0.4, 0.6, 0.8];
//! assert_eq!(descriptive::median(&reputations), Some(0.5));
//! assert!(descriptive::mean(&[]).is_none());
//! ```
//!
//! ## Summarizing a dataset
//!
//! ```
//! use staghunt_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 4.0, 9.0]).unwrap();
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.max, 9.0);
//! ```

pub mod descriptive;
