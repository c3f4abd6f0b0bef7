/*!
Primitives for building, combining and null-adjusting comparators.

A comparator in this crate is null-aware: it compares two values that may each be absent. Absence
is modeled with `Option<&T>` and, unless stated otherwise, an absent value ranks lower than any
present value. This lets orderings be composed over data that has missing attributes without the
caller having to special-case `None` at every criterion.

Each primitive is a small adaptor struct implementing [`Comparator`], created with a constructor
function in the same spirit as the adaptors of [`Iterator`]. Natural ordering is only available for
types that implement [`Ord`], so asking for the natural ordering of something like `f64` is a
compile error rather than a runtime surprise.
*/

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An interface for structs intended to be used as a comparator.
pub trait Comparator<T: ?Sized> {
    /**
    Return an ordering obtained by comparing `lhs` and `rhs`, either of which may be absent.

    [`Ordering::Less`] means `lhs` sorts before `rhs` and [`Ordering::Greater`] means it sorts
    after.

    Invariants:

    1. Two absent values are equal
    1. Unless the comparator documents otherwise, an absent value sorts before any present value
    1. The ordering is consistent i.e. the same inputs always produce the same result
    1. The ordering is transitive and antisymmetric so that it can drive a sort

    These are assumed and not checked.
    */
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering;

    /// Return an ordering obtained by comparing two present values.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self.compare_nullable(Some(lhs), Some(rhs))
    }
}

impl<T, C> Comparator<T> for &C
where
    T: ?Sized,
    C: Comparator<T> + ?Sized,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        (**self).compare_nullable(lhs, rhs)
    }
}

impl<T, C> Comparator<T> for Box<C>
where
    T: ?Sized,
    C: Comparator<T> + ?Sized,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        (**self).compare_nullable(lhs, rhs)
    }
}

impl<T, C> Comparator<T> for Arc<C>
where
    T: ?Sized,
    C: Comparator<T> + ?Sized,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        (**self).compare_nullable(lhs, rhs)
    }
}

/**
Compare two possibly absent values, delegating to `compare_fn` only when both are present.

1. Both absent: [`Ordering::Equal`]
1. Only `lhs` absent: [`Ordering::Less`]
1. Only `rhs` absent: [`Ordering::Greater`]
1. Both present: the result of `compare_fn(lhs, rhs)`
*/
pub fn null_safe_compare<T, F>(lhs: Option<&T>, rhs: Option<&T>, compare_fn: F) -> Ordering
where
    T: ?Sized,
    F: FnOnce(&T, &T) -> Ordering,
{
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => compare_fn(lhs, rhs),
    }
}

/// Same as [`null_safe_compare`] but present values are compared by their natural ordering.
pub fn null_safe_compare_natural<T>(lhs: Option<&T>, rhs: Option<&T>) -> Ordering
where
    T: Ord + ?Sized,
{
    null_safe_compare(lhs, rhs, T::cmp)
}

/// A comparator that considers all values equal, absent ones included.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

/// Create a comparator that considers all values equal.
pub fn identity() -> Identity {
    Identity
}

impl<T: ?Sized> Comparator<T> for Identity {
    fn compare_nullable(&self, _lhs: Option<&T>, _rhs: Option<&T>) -> Ordering {
        Ordering::Equal
    }
}

/**
A comparator that only looks at presence: absent values rank lowest.

Two present values are always equal under this comparator. It is usually combined in front of a
criterion that needs absent values to sort first.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct NullsLowest;

/// Create a comparator that ranks absent values below present ones.
pub fn nulls_lowest() -> NullsLowest {
    NullsLowest
}

impl<T: ?Sized> Comparator<T> for NullsLowest {
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        null_safe_compare(lhs, rhs, |_, _| Ordering::Equal)
    }
}

/// A comparator over the natural ordering of present values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        null_safe_compare_natural(lhs, rhs)
    }
}

/// Create a comparator from the natural ordering of `T`, with absent values ranked lowest.
pub fn natural() -> Combined<NullsLowest, Natural> {
    combine(nulls_lowest(), Natural)
}

/**
Two comparators applied in priority order.

The second comparator only breaks ties left by the first one. When both values are absent the
result is [`Ordering::Equal`] and neither comparator is consulted.
*/
#[derive(Clone, Copy, Debug)]
pub struct Combined<A, B> {
    /// The comparator with the higher priority.
    first: A,

    /// The comparator consulted when `first` reports equality.
    second: B,
}

/// Combine two comparators, `first` having the higher priority.
pub fn combine<A, B>(first: A, second: B) -> Combined<A, B> {
    Combined { first, second }
}

impl<T, A, B> Comparator<T> for Combined<A, B>
where
    T: ?Sized,
    A: Comparator<T>,
    B: Comparator<T>,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        if lhs.is_none() && rhs.is_none() {
            return Ordering::Equal;
        }

        self.first
            .compare_nullable(lhs, rhs)
            .then_with(|| self.second.compare_nullable(lhs, rhs))
    }
}

/**
Compares values by the natural ordering of a key extracted from them.

The key extractor is only called for present values. An absent value has an absent key and absent
keys rank lowest.
*/
pub struct ByKey<F, R> {
    key_extractor: F,
    _key: PhantomData<fn() -> R>,
}

/// Create a comparator that orders values by the key `key_extractor` returns for them.
pub fn by_key<T, R, F>(key_extractor: F) -> ByKey<F, R>
where
    T: ?Sized,
    R: Ord,
    F: Fn(&T) -> R,
{
    ByKey {
        key_extractor,
        _key: PhantomData,
    }
}

impl<T, R, F> Comparator<T> for ByKey<F, R>
where
    T: ?Sized,
    R: Ord,
    F: Fn(&T) -> R,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        let lhs_key = lhs.map(&self.key_extractor);
        let rhs_key = rhs.map(&self.key_extractor);
        null_safe_compare_natural(lhs_key.as_ref(), rhs_key.as_ref())
    }
}

impl<F, R> Clone for ByKey<F, R>
where
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            key_extractor: self.key_extractor.clone(),
            _key: PhantomData,
        }
    }
}

impl<F, R> fmt::Debug for ByKey<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByKey")
            .field("key", &std::any::type_name::<R>())
            .finish_non_exhaustive()
    }
}

/**
Compares values by handing extracted keys to another comparator.

No null adjustment is applied on top of the key comparator. If either value is absent its key is
absent too, and the key comparator decides how that ranks.

The key extractor is never called with an absent value, so it cannot map absence to a sentinel key
(e.g. the string `"null"`). Compare `Option`s directly if absent values need a custom rank.
*/
pub struct ByKeyWith<F, C, R> {
    key_extractor: F,
    key_comparator: C,
    _key: PhantomData<fn() -> R>,
}

/// Create a comparator that orders values by comparing their keys with `key_comparator`.
pub fn by_key_with<T, R, F, C>(key_extractor: F, key_comparator: C) -> ByKeyWith<F, C, R>
where
    T: ?Sized,
    F: Fn(&T) -> R,
    C: Comparator<R>,
{
    ByKeyWith {
        key_extractor,
        key_comparator,
        _key: PhantomData,
    }
}

impl<T, R, F, C> Comparator<T> for ByKeyWith<F, C, R>
where
    T: ?Sized,
    F: Fn(&T) -> R,
    C: Comparator<R>,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        let lhs_key = lhs.map(&self.key_extractor);
        let rhs_key = rhs.map(&self.key_extractor);
        self.key_comparator
            .compare_nullable(lhs_key.as_ref(), rhs_key.as_ref())
    }
}

impl<F, C, R> Clone for ByKeyWith<F, C, R>
where
    F: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            key_extractor: self.key_extractor.clone(),
            key_comparator: self.key_comparator.clone(),
            _key: PhantomData,
        }
    }
}

impl<F, C, R> fmt::Debug for ByKeyWith<F, C, R>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByKeyWith")
            .field("key", &std::any::type_name::<R>())
            .field("key_comparator", &self.key_comparator)
            .finish_non_exhaustive()
    }
}

/// A comparator backed by a plain comparison function over present values.
#[derive(Clone, Copy)]
pub struct FromFn<F> {
    compare_fn: F,
}

/**
Create a comparator from a function comparing two present values.

Absent values are handled with [`null_safe_compare`] so `compare_fn` never has to deal with them.
*/
pub fn from_fn<T, F>(compare_fn: F) -> FromFn<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    FromFn { compare_fn }
}

impl<T, F> Comparator<T> for FromFn<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        null_safe_compare(lhs, rhs, &self.compare_fn)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// A comparator with the result of the wrapped comparator reversed.
#[derive(Clone, Copy, Debug)]
pub struct Reversed<C> {
    inner: C,
}

/**
Create a comparator that reverses the result of `comparator`.

Reversing a null-aware comparator also moves absent values to the top.
*/
pub fn reversed<C>(comparator: C) -> Reversed<C> {
    Reversed { inner: comparator }
}

impl<T, C> Comparator<T> for Reversed<C>
where
    T: ?Sized,
    C: Comparator<T>,
{
    fn compare_nullable(&self, lhs: Option<&T>, rhs: Option<&T>) -> Ordering {
        self.inner.compare_nullable(lhs, rhs).reverse()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn length_comparator() -> ByKey<impl Fn(&str) -> usize, usize> {
        by_key(|s: &str| s.len())
    }

    #[test]
    fn identity_considers_everything_equal() {
        let comparator = identity();

        assert_eq!(comparator.compare("", ""), Ordering::Equal);
        assert_eq!(comparator.compare("", "foo"), Ordering::Equal);
        assert_eq!(comparator.compare("foo", ""), Ordering::Equal);
        assert_eq!(comparator.compare("foo", "bar"), Ordering::Equal);
        assert_eq!(
            comparator.compare_nullable(None, Some("bar")),
            Ordering::Equal
        );
        assert_eq!(
            Comparator::<str>::compare_nullable(&comparator, None, None),
            Ordering::Equal
        );
    }

    #[test]
    fn nulls_lowest_only_looks_at_presence() {
        let comparator = nulls_lowest();

        assert_eq!(comparator.compare("", ""), Ordering::Equal);
        assert_eq!(comparator.compare("foo", "bar"), Ordering::Equal);
        assert_eq!(
            Comparator::<str>::compare_nullable(&comparator, None, None),
            Ordering::Equal
        );
        assert_eq!(comparator.compare_nullable(None, Some("bar")), Ordering::Less);
        assert_eq!(comparator.compare_nullable(Some(""), None), Ordering::Greater);
    }

    #[test]
    fn null_safe_compare_guards_absent_values() {
        let never_called = |_: &u32, _: &u32| -> Ordering {
            panic!("The comparison function must not see absent values")
        };

        assert_eq!(null_safe_compare(None, None, never_called), Ordering::Equal);
        assert_eq!(null_safe_compare(None, Some(&1), never_called), Ordering::Less);
        assert_eq!(
            null_safe_compare(Some(&1), None, never_called),
            Ordering::Greater
        );
    }

    #[test]
    fn null_safe_compare_delegates_for_present_values() {
        let reverse_cmp = |lhs: &u32, rhs: &u32| rhs.cmp(lhs);

        assert_eq!(
            null_safe_compare(Some(&1), Some(&2), reverse_cmp),
            Ordering::Greater
        );
        assert_eq!(
            null_safe_compare(Some(&2), Some(&1), reverse_cmp),
            Ordering::Less
        );
        assert_eq!(
            null_safe_compare(Some(&2), Some(&2), reverse_cmp),
            Ordering::Equal
        );
    }

    #[test]
    fn null_safe_compare_natural_uses_ord() {
        assert_eq!(
            null_safe_compare_natural(Some("a"), Some("b")),
            Ordering::Less
        );
        assert_eq!(null_safe_compare_natural(Some("a"), None), Ordering::Greater);
        assert_eq!(null_safe_compare_natural::<str>(None, None), Ordering::Equal);
    }

    #[test]
    fn by_key_compares_extracted_keys() {
        let comparator = length_comparator();

        assert_eq!(comparator.compare("", ""), Ordering::Equal);
        assert_eq!(comparator.compare("foo", "bar"), Ordering::Equal);
        assert_eq!(comparator.compare("foo", "barbaz"), Ordering::Less);
        assert_eq!(comparator.compare("foobars", "barbaz"), Ordering::Greater);
        assert_eq!(
            comparator.compare_nullable(None, Some("barbaz")),
            Ordering::Less
        );
    }

    #[test]
    fn by_key_ranks_absent_keys_lowest() {
        let comparator = by_key(|s: &str| if s == "foo" { None } else { Some(s.len()) });

        assert_eq!(comparator.compare("foo", "foo"), Ordering::Equal);
        assert_eq!(comparator.compare("foo", ""), Ordering::Less);
        assert_eq!(comparator.compare("bar", "foo"), Ordering::Greater);
    }

    #[test]
    fn by_key_with_delegates_keys_to_the_given_comparator() {
        let comparator = by_key_with(|i: &i32| i.to_string(), by_key(|s: &String| s.len()));

        assert_eq!(
            Comparator::<i32>::compare_nullable(&comparator, None, None),
            Ordering::Equal
        );
        assert_eq!(comparator.compare(&1, &1), Ordering::Equal);
        assert_eq!(comparator.compare(&5, &9), Ordering::Equal);
        assert_eq!(comparator.compare(&990, &32), Ordering::Greater);
        assert_eq!(comparator.compare(&8, &12), Ordering::Less);
    }

    #[test]
    fn by_key_with_never_calls_the_key_extractor_for_absent_values() {
        let calls = Cell::new(0);
        let comparator = by_key_with(
            |i: &i32| {
                calls.set(calls.get() + 1);
                i.to_string()
            },
            by_key(|s: &String| s.len()),
        );

        assert_eq!(comparator.compare_nullable(None, Some(&5)), Ordering::Less);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            Comparator::<i32>::compare_nullable(&comparator, None, None),
            Ordering::Equal
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn by_key_with_does_not_adjust_absent_keys() {
        // A key comparator that ranks absent keys highest keeps doing so.
        let comparator = by_key_with(|i: &i32| *i, reversed(nulls_lowest()));

        assert_eq!(comparator.compare_nullable(None, Some(&1)), Ordering::Greater);
        assert_eq!(comparator.compare_nullable(Some(&1), None), Ordering::Less);
    }

    #[test]
    fn combine_prefers_the_first_comparator() {
        let comparator = combine(length_comparator(), natural());

        assert_eq!(comparator.compare("", ""), Ordering::Equal);
        assert_eq!(comparator.compare("", "foo"), Ordering::Less);
        assert_eq!(comparator.compare("foo", "bar"), Ordering::Greater);
        assert_eq!(comparator.compare("foo", "barbaz"), Ordering::Less);
        assert_eq!(
            comparator.compare_nullable(None, Some("barbaz")),
            Ordering::Less
        );
    }

    #[test]
    fn combine_does_not_evaluate_the_second_comparator_when_the_first_decides() {
        let calls = Cell::new(0);
        let counting = from_fn(|lhs: &u32, rhs: &u32| {
            calls.set(calls.get() + 1);
            lhs.cmp(rhs)
        });
        let comparator = combine(by_key(|n: &u32| n % 10), counting);

        assert_eq!(comparator.compare(&1, &2), Ordering::Less);
        assert_eq!(calls.get(), 0);
        assert_eq!(comparator.compare(&12, &2), Ordering::Greater);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn combine_short_circuits_when_both_values_are_absent() {
        let comparator = combine(identity(), reversed(nulls_lowest()));

        assert_eq!(
            Comparator::<str>::compare_nullable(&comparator, None, None),
            Ordering::Equal
        );
        assert_eq!(
            comparator.compare_nullable(None, Some("foo")),
            Ordering::Greater
        );
    }

    #[test]
    fn natural_orders_present_values_and_ranks_absent_lowest() {
        let comparator = natural();

        assert_eq!(comparator.compare(&1_u8, &2), Ordering::Less);
        assert_eq!(comparator.compare(&2_u8, &2), Ordering::Equal);
        assert_eq!(comparator.compare_nullable(None, Some(&0_u8)), Ordering::Less);
        assert_eq!(
            comparator.compare_nullable(Some(&0_u8), None),
            Ordering::Greater
        );
    }

    #[test]
    fn from_fn_accepts_comparisons_for_partially_ordered_types() {
        let comparator = from_fn::<f64, _>(f64::total_cmp);

        assert_eq!(comparator.compare(&0.5, &1.5), Ordering::Less);
        assert_eq!(comparator.compare(&-0.0, &0.0), Ordering::Less);
        assert_eq!(comparator.compare_nullable(None, Some(&f64::MIN)), Ordering::Less);
    }

    #[test]
    fn reversed_flips_the_ordering() {
        let comparator = reversed(length_comparator());

        assert_eq!(comparator.compare("a", "bb"), Ordering::Greater);
        assert_eq!(comparator.compare("bb", "a"), Ordering::Less);
        assert_eq!(comparator.compare("bb", "cc"), Ordering::Equal);
        assert_eq!(comparator.compare_nullable(None, Some("a")), Ordering::Greater);
    }

    #[test]
    fn boxed_and_shared_comparators_delegate() {
        let boxed: Box<dyn Comparator<str>> = Box::new(length_comparator());
        let shared: Arc<dyn Comparator<str>> = Arc::new(natural());

        assert_eq!(boxed.compare("a", "bb"), Ordering::Less);
        assert_eq!(shared.compare("b", "a"), Ordering::Greater);
        assert_eq!(combine(&boxed, &shared).compare("b", "a"), Ordering::Greater);
    }
}
