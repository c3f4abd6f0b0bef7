/*!
The ordering builder collects comparison criteria in priority order and compiles them into a single
comparator.

Criteria are appended from the highest priority to the lowest. The compiled comparator consults
them in that order and stops at the first criterion that can tell the two values apart, which is
the same as comparing tuples made of each criterion's key.

```
use ordkit::OrderingBuilder;

struct Employee {
    team: &'static str,
    age: Option<u8>,
}

let mut builder = OrderingBuilder::new();
builder
    .append_by_key(|employee: &Employee| employee.team)
    .append_by_key(|employee: &Employee| employee.age);

let mut employees = vec![
    Employee { team: "b", age: Some(30) },
    Employee { team: "a", age: Some(41) },
    Employee { team: "a", age: None },
];
builder.compile().sort(&mut employees);

let ages: Vec<Option<u8>> = employees.iter().map(|employee| employee.age).collect();
assert_eq!(ages, vec![None, Some(41), Some(30)]);
```
*/

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::comparator::{by_key, by_key_with, from_fn, nulls_lowest, Comparator};

/// A comparator that can be shared between compiled orderings and threads.
type SharedComparator<'a, T> = Arc<dyn Comparator<T> + Send + Sync + 'a>;

/**
Accumulates comparison criteria and compiles them into a [`CompiledOrdering`].

# Concurrency

The builder is not synchronized. Appending criteria from several threads requires an external
lock. The orderings it compiles are immutable and can be shared freely.
*/
pub struct OrderingBuilder<'a, T: ?Sized> {
    /// The registered criteria in descending priority order.
    criteria: Vec<SharedComparator<'a, T>>,
}

/// Public methods
impl<'a, T: ?Sized + 'a> OrderingBuilder<'a, T> {
    /// Create a new [`OrderingBuilder`] without any criteria.
    pub fn new() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }

    /**
    Add a comparator to the end of the list of criteria.

    Criteria are ordered by priority in descending order.
    */
    pub fn append<C>(&mut self, comparator: C) -> &mut Self
    where
        C: Comparator<T> + Send + Sync + 'a,
    {
        self.criteria.push(Arc::new(comparator));
        self
    }

    /// Add a plain comparison function over present values as the next criterion.
    pub fn append_fn<F>(&mut self, compare_fn: F) -> &mut Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'a,
    {
        self.append(from_fn(compare_fn))
    }

    /// Add a criterion comparing the natural ordering of the key `key_extractor` returns.
    pub fn append_by_key<R, F>(&mut self, key_extractor: F) -> &mut Self
    where
        R: Ord + 'a,
        F: Fn(&T) -> R + Send + Sync + 'a,
    {
        self.append(by_key(key_extractor))
    }

    /// Add a criterion comparing the key `key_extractor` returns with `key_comparator`.
    pub fn append_by_key_with<R, F, C>(
        &mut self,
        key_extractor: F,
        key_comparator: C,
    ) -> &mut Self
    where
        R: 'a,
        F: Fn(&T) -> R + Send + Sync + 'a,
        C: Comparator<R> + Send + Sync + 'a,
    {
        self.append(by_key_with(key_extractor, key_comparator))
    }

    /**
    Add a criterion that ranks absent values below present ones.

    This is usually placed in front of criteria whose key extractors can report absence so that
    absent values sort first overall.
    */
    pub fn append_null_guard(&mut self) -> &mut Self {
        self.append(nulls_lowest())
    }

    /**
    Compile the registered criteria into a single ordering.

    The result is the same as folding the criteria from the first to the last with
    [`combine`](crate::comparator::combine), starting from a comparator that considers everything
    equal. An empty builder therefore compiles to an ordering where all values are equal. The
    criteria are kept in a flat list rather than nested so that the depth of a comparison does not
    grow with the number of criteria.

    The builder keeps its criteria so it can be compiled again or extended afterwards.
    */
    pub fn compile(&self) -> CompiledOrdering<'a, T> {
        log::debug!(
            "Compiling an ordering from {} criteria.",
            self.criteria.len()
        );

        CompiledOrdering {
            criteria: self.criteria.iter().cloned().collect(),
        }
    }

    /// Get the number of registered criteria.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns `true` if no criteria were registered, otherwise `false`.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /**
    Remove all registered criteria.

    Orderings compiled before the reset are not affected.
    */
    pub fn clear(&mut self) {
        log::trace!("Clearing {} criteria from the builder.", self.criteria.len());
        self.criteria.clear();
    }
}

impl<'a, T: ?Sized + 'a> Default for OrderingBuilder<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: ?Sized> fmt::Debug for OrderingBuilder<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderingBuilder")
            .field("num_criteria", &self.criteria.len())
            .finish()
    }
}

/**
A comparator compiled from the criteria of an [`OrderingBuilder`].

Cloning is cheap since the criteria are shared.
*/
pub struct CompiledOrdering<'a, T: ?Sized> {
    /// A snapshot of the builder's criteria in descending priority order.
    criteria: Arc<[SharedComparator<'a, T>]>,
}

/// Public methods
impl<'a, T: ?Sized> CompiledOrdering<'a, T> {
    /// Get the number of criteria this ordering was compiled from.
    pub fn criteria_count(&self) -> usize {
        self.criteria.len()
    }

    /**
    Sort `items` with this ordering.

    This uses the stable sort of the standard library so items that compare equal keep their
    relative order.
    */
    pub fn sort(&self, items: &mut [T])
    where
        T: Sized,
    {
        items.sort_by(|lhs, rhs| self.compare(lhs, rhs));
    }
}

impl<'a, T: ?Sized> Comparator<T> for CompiledOrdering<'a, T> {
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        if lhs.is_none() && rhs.is_none() {
            return Ordering::Equal;
        }

        self.criteria
            .iter()
            .map(|criterion| criterion.compare_nullable(lhs, rhs))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<'a, T: ?Sized> Clone for CompiledOrdering<'a, T> {
    fn clone(&self) -> Self {
        Self {
            criteria: Arc::clone(&self.criteria),
        }
    }
}

impl<'a, T: ?Sized> fmt::Debug for CompiledOrdering<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledOrdering")
            .field("criteria_count", &self.criteria.len())
            .finish_non_exhaustive()
    }
}
