/*!
ordkit composes single-criterion comparators into one combined ordering.

Orderings are null-aware. A comparator compares two values that may each be absent and, unless it
says otherwise, ranks absent values below present ones. The building blocks live in the
[`comparator`] module and the [`OrderingBuilder`] stitches them together in priority order.

ordkit does not sort anything itself. A compiled ordering is handed to the sorting facility of the
caller's choice, typically [`slice::sort_by`].

```
use ordkit::comparator::{by_key, combine, natural, Comparator};
use std::cmp::Ordering;

let by_length_then_text = combine(by_key(|s: &str| s.len()), natural());

assert_eq!(by_length_then_text.compare("zz", "aaa"), Ordering::Less);
assert_eq!(by_length_then_text.compare("ab", "aa"), Ordering::Greater);
assert_eq!(by_length_then_text.compare_nullable(None, Some("")), Ordering::Less);
```
*/

#![warn(missing_debug_implementations, missing_docs)]

pub mod builder;
pub use builder::{CompiledOrdering, OrderingBuilder};

pub mod comparator;
pub use comparator::Comparator;
