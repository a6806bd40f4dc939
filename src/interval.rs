use std::{cmp::Ordering, fmt, fmt::Display, ops::Range};

use crate::Error;

/// The capability set an interval value must provide to be stored in an
/// [`IntervalTreeSet`].
///
/// An implementation carries a half-open interval `[min, max)` whose lower
/// bound may be unbounded below (`None` is negative infinity) and whose upper
/// bound may be unbounded above (`None` is positive infinity).
///
/// The set rewrites keys through [`IntervalBounds::with_bounds()`] when
/// merging and splitting coverage, so a user-defined interval type flows
/// through unchanged - the set never fabricates values of a different type.
///
/// [`IntervalTreeSet`]: crate::IntervalTreeSet
pub trait IntervalBounds: Clone + PartialEq {
    /// The ordered domain of the interval endpoints.
    type Point: Ord + Clone;

    /// The inclusive lower bound, or [`None`] if unbounded below.
    fn min(&self) -> Option<&Self::Point>;

    /// The exclusive upper bound, or [`None`] if unbounded above.
    fn max(&self) -> Option<&Self::Point>;

    /// Construct a new instance of `Self` spanning `[min, max)`.
    ///
    /// Callers guarantee `min < max` where both bounds are finite.
    fn with_bounds(&self, min: Option<Self::Point>, max: Option<Self::Point>) -> Self;

    /// Order `self` relative to `other` by lower bound, tie-broken by the
    /// upper bound.
    fn compare(&self, other: &Self) -> Ordering {
        cmp_mins(self.min(), other.min()).then_with(|| cmp_maxes(self.max(), other.max()))
    }

    /// Returns true if `self` and `other` share at least one point.
    ///
    /// Intervals that merely touch (`a.max == b.min`) share no point under
    /// half-open semantics and do not intersect.
    fn intersects(&self, other: &Self) -> bool {
        cmp_max_to_min(self.max(), other.min()) == Ordering::Greater
            && cmp_max_to_min(other.max(), self.min()) == Ordering::Greater
    }

    /// Returns true if `self` and `other` are adjacent, sharing exactly one
    /// endpoint value.
    fn touches(&self, other: &Self) -> bool {
        let meet = |max: Option<&Self::Point>, min: Option<&Self::Point>| match (max, min) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        meet(self.max(), other.min()) || meet(other.max(), self.min())
    }

    /// Returns true if `point` falls within `[min, max)`.
    fn contains_point(&self, point: &Self::Point) -> bool {
        let above_min = match self.min() {
            Some(min) => point >= min,
            None => true,
        };
        let below_max = match self.max() {
            Some(max) => point < max,
            None => true,
        };
        above_min && below_max
    }
}

/// Compare two lower bounds, where [`None`] is negative infinity.
pub(crate) fn cmp_mins<T>(a: Option<&T>, b: Option<&T>) -> Ordering
where
    T: Ord,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Compare two upper bounds, where [`None`] is positive infinity.
pub(crate) fn cmp_maxes<T>(a: Option<&T>, b: Option<&T>) -> Ordering
where
    T: Ord,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Compare a lower bound against an upper bound.
///
/// An unbounded value on either side yields [`Ordering::Less`]: negative
/// infinity is below everything, and everything is below positive infinity.
pub(crate) fn cmp_min_to_max<T>(min: Option<&T>, max: Option<&T>) -> Ordering
where
    T: Ord,
{
    match (min, max) {
        (Some(min), Some(max)) => min.cmp(max),
        _ => Ordering::Less,
    }
}

/// Compare an upper bound against a lower bound.
///
/// An unbounded value on either side yields [`Ordering::Greater`].
pub(crate) fn cmp_max_to_min<T>(max: Option<&T>, min: Option<&T>) -> Ordering
where
    T: Ord,
{
    match (max, min) {
        (Some(max), Some(min)) => max.cmp(min),
        _ => Ordering::Greater,
    }
}

/// A half-open interval `[min, max)` over `T`, optionally unbounded at either
/// end.
///
/// An [`Interval`] is ordered by the lower bound, and tie-braked with the
/// upper bound. An unbounded lower bound sorts below all finite values; an
/// unbounded upper bound sorts above.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Interval<T>
where
    T: Ord,
{
    /// Construct the interval `[min, max)`, where [`None`] marks an unbounded
    /// endpoint.
    ///
    /// Returns [`Error::EmptyInterval`] if both bounds are finite and
    /// `min >= max`.
    pub fn new(min: Option<T>, max: Option<T>) -> Result<Self, Error> {
        match (&min, &max) {
            (Some(min), Some(max)) if min >= max => Err(Error::EmptyInterval),
            _ => Ok(Self { min, max }),
        }
    }

    /// Construct the finite interval `[min, max)`.
    pub fn bounded(min: T, max: T) -> Result<Self, Error> {
        Self::new(Some(min), Some(max))
    }

    /// The interval spanning the entire domain.
    pub fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// The inclusive lower bound, or [`None`] if unbounded below.
    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    /// The exclusive upper bound, or [`None`] if unbounded above.
    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }
}

impl<T> IntervalBounds for Interval<T>
where
    T: Ord + Clone,
{
    type Point = T;

    fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    fn with_bounds(&self, min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }
}

impl<T> PartialOrd for Interval<T>
where
    T: Ord + Clone,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Interval<T>
where
    T: Ord + Clone,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T> TryFrom<Range<T>> for Interval<T>
where
    T: Ord,
{
    type Error = Error;

    fn try_from(value: Range<T>) -> Result<Self, Error> {
        Self::bounded(value.start, value.end)
    }
}

impl<T> Display for Interval<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min {
            Some(min) => write!(f, "[{min},")?,
            None => write!(f, "[-∞,")?,
        }
        match &self.max {
            Some(max) => write!(f, "{max})"),
            None => write!(f, "+∞)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{arbitrary_interval, POINT_MAX};

    #[test]
    fn test_empty_interval_rejected() {
        assert_eq!(Interval::bounded(4_usize, 4), Err(Error::EmptyInterval));
        assert_eq!(Interval::bounded(5_usize, 4), Err(Error::EmptyInterval));
        assert_eq!(Interval::try_from(4_usize..4), Err(Error::EmptyInterval));

        // Unbounded endpoints cannot form an empty interval.
        assert!(Interval::new(None, Some(4_usize)).is_ok());
        assert!(Interval::new(Some(4_usize), None).is_ok());
        assert!(Interval::<usize>::new(None, None).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::bounded(3, 7).unwrap().to_string(), "[3,7)");
        assert_eq!(Interval::new(None, Some(5)).unwrap().to_string(), "[-∞,5)");
        assert_eq!(
            Interval::new(Some(12), None).unwrap().to_string(),
            "[12,+∞)"
        );
        assert_eq!(Interval::<u8>::unbounded().to_string(), "[-∞,+∞)");
    }

    #[test]
    fn test_touching_does_not_intersect() {
        let a = Interval::bounded(3, 5).unwrap();
        let b = Interval::bounded(5, 7).unwrap();

        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        assert!(a.touches(&b));
        assert!(b.touches(&a));
    }

    #[test]
    fn test_unbounded_swallows_comparisons() {
        let all = Interval::<u8>::unbounded();
        let low = Interval::new(None, Some(5_u8)).unwrap();
        let high = Interval::new(Some(200_u8), None).unwrap();

        assert!(all.intersects(&low));
        assert!(all.intersects(&high));
        assert!(!low.intersects(&high));

        assert!(low.contains_point(&0));
        assert!(!low.contains_point(&5));
        assert!(high.contains_point(&255));
        assert!(!high.contains_point(&199));
    }

    proptest! {
        #[test]
        fn prop_ordering_by_min_then_max(
            a in arbitrary_interval(),
            b in arbitrary_interval(),
        ) {
            let got = a.cmp(&b);

            if IntervalBounds::min(&a) == IntervalBounds::min(&b) {
                // If the lower bounds are equal, the ordering is defined by
                // the upper bounds.
                assert_eq!(got, cmp_maxes(IntervalBounds::max(&a), IntervalBounds::max(&b)));
            } else {
                assert_eq!(got, cmp_mins(IntervalBounds::min(&a), IntervalBounds::min(&b)));
            }
        }

        #[test]
        fn prop_intersects_symmetric(
            a in arbitrary_interval(),
            b in arbitrary_interval(),
        ) {
            assert_eq!(a.intersects(&b), b.intersects(&a));
            assert_eq!(a.touches(&b), b.touches(&a));

            // Touching intervals share an endpoint but never a point.
            if a.touches(&b) {
                assert!(!a.intersects(&b));
            }
        }

        #[test]
        fn prop_intersects_matches_point_scan(
            a in arbitrary_interval(),
            b in arbitrary_interval(),
        ) {
            // Brute-force check over the small test domain.
            let shared = (0..=POINT_MAX).any(|p| a.contains_point(&p) && b.contains_point(&p));
            assert_eq!(a.intersects(&b), shared);
        }

        #[test]
        fn prop_with_bounds_round_trip(a in arbitrary_interval()) {
            let b = a.with_bounds(IntervalBounds::min(&a).cloned(), IntervalBounds::max(&a).cloned());
            assert_eq!(a, b);
            assert_eq!(a.cmp(&b), Ordering::Equal);
        }
    }
}
