//! Ordered, indexable collection of strategies.
//!
//! The registry is the selection side-channel of the engine: a UI lists
//! [`AlgorithmRegistry::infos`], picks an index, and routes every
//! calculation through [`AlgorithmRegistry::calculate`]. New strategies
//! are added with [`AlgorithmRegistry::register`] without touching the
//! built-in ones.

use crate::algorithm::{zero_allocation, AllocationAlgorithm};
use crate::bucket::{BucketSmoothing, Proportional};
use crate::error::AllocError;
use crate::greedy::{BalancedApproach, PriorityNecessity, PureUtility};
use crate::marginal::{DirectSolve, GradientDescent, OptimisedMarginal};
use crate::types::{AllocationResult, Category};

/// Name and description of a registered strategy, for selection lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub name: String,
    pub description: String,
}

impl AlgorithmInfo {
    fn of(algorithm: &dyn AllocationAlgorithm) -> Self {
        Self {
            name: algorithm.name().to_string(),
            description: algorithm.description().to_string(),
        }
    }
}

/// Strategies in display order plus the current selection.
///
/// # Examples
///
/// ```
/// use u_budget::{AlgorithmRegistry, Category};
///
/// let mut registry = AlgorithmRegistry::with_defaults();
/// assert_eq!(registry.selected_index(), 0);
/// assert!(registry.select(99).is_err());
/// assert_eq!(registry.selected_index(), 0);
///
/// registry.select(2).unwrap();
/// let categories = vec![Category::new("Food", 1.0).with_basic_need(3.0)];
/// let result = registry.calculate(&categories, 10.0);
/// assert!(result.total_spent <= 10.0 + 1e-6);
/// ```
pub struct AlgorithmRegistry {
    algorithms: Vec<Box<dyn AllocationAlgorithm>>,
    selected: usize,
}

impl AlgorithmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
            selected: 0,
        }
    }

    /// Creates a registry holding every built-in strategy, with
    /// Priority Necessity selected.
    pub fn with_defaults() -> Self {
        let builtins: Vec<Box<dyn AllocationAlgorithm>> = vec![
            Box::new(PriorityNecessity::new()),
            Box::new(PureUtility::new()),
            Box::new(BalancedApproach::new()),
            Box::new(OptimisedMarginal::new()),
            Box::new(DirectSolve::new()),
            Box::new(GradientDescent::new()),
            Box::new(Proportional::new()),
            Box::new(BucketSmoothing::new()),
        ];
        Self {
            algorithms: builtins,
            selected: 0,
        }
    }

    /// Appends a strategy. Names must be unique.
    pub fn register(&mut self, algorithm: Box<dyn AllocationAlgorithm>) -> Result<usize, AllocError> {
        if self.find(algorithm.name()).is_some() {
            return Err(AllocError::DuplicateAlgorithm(algorithm.name().to_string()));
        }
        self.algorithms.push(algorithm);
        Ok(self.algorithms.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Name and description of every entry, in order.
    pub fn infos(&self) -> Vec<AlgorithmInfo> {
        self.algorithms.iter().map(|a| AlgorithmInfo::of(a.as_ref())).collect()
    }

    pub fn get(&self, index: usize) -> Option<&dyn AllocationAlgorithm> {
        self.algorithms.get(index).map(|a| a.as_ref())
    }

    /// Index of the entry called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.algorithms.iter().position(|a| a.name() == name)
    }

    /// Selects the entry at `index`. An out-of-range index leaves the
    /// current selection unchanged.
    pub fn select(&mut self, index: usize) -> Result<(), AllocError> {
        if index >= self.algorithms.len() {
            tracing::warn!(index, len = self.algorithms.len(), "ignoring out-of-range algorithm selection");
            return Err(AllocError::IndexOutOfRange {
                index,
                len: self.algorithms.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// The selected entry; `None` only for an empty registry.
    pub fn selected(&self) -> Option<&dyn AllocationAlgorithm> {
        self.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Runs the selected strategy. An empty registry allocates nothing.
    pub fn calculate(&self, categories: &[Category], budget: f64) -> AllocationResult {
        match self.selected() {
            Some(algorithm) => algorithm.calculate(categories, budget),
            None => zero_allocation(categories),
        }
    }

    /// Runs every strategy on the same input, in registry order.
    pub fn compare(&self, categories: &[Category], budget: f64) -> Vec<(AlgorithmInfo, AllocationResult)> {
        let run = |a: &Box<dyn AllocationAlgorithm>| {
            (AlgorithmInfo::of(a.as_ref()), a.calculate(categories, budget))
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.algorithms.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.algorithms.iter().map(run).collect()
        }
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field(
                "algorithms",
                &self.algorithms.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("selected", &self.selected)
            .finish()
    }
}
