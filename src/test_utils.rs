use std::cmp::Ordering;

use proptest::prelude::*;

use crate::{
    interval::{cmp_max_to_min, cmp_min_to_max, cmp_maxes, cmp_mins},
    Interval, IntervalBounds,
};

/// Upper bound (inclusive) of the finite endpoint domain used by the
/// generators below.
///
/// A small domain encourages generated intervals to overlap and touch.
pub(crate) const POINT_MAX: usize = 20;

/// Shorthand for a finite interval in tests.
///
/// # Panics
///
/// Panics if the range is empty.
pub(crate) fn iv(range: std::ops::Range<usize>) -> Interval<usize> {
    Interval::try_from(range).unwrap()
}

fn arbitrary_endpoint() -> impl Strategy<Value = Option<usize>> {
    prop_oneof![
        9 => (0..POINT_MAX).prop_map(Some),
        1 => Just(None),
    ]
}

/// Generate valid intervals over a small domain, occasionally unbounded at
/// either end.
pub(crate) fn arbitrary_interval() -> impl Strategy<Value = Interval<usize>> {
    (arbitrary_endpoint(), arbitrary_endpoint()).prop_map(|(a, b)| match (a, b) {
        (Some(a), Some(b)) if a == b => Interval::bounded(a, b + 1),
        (Some(a), Some(b)) if a > b => Interval::bounded(b, a),
        (a, b) => Interval::new(a, b),
    }
    .unwrap())
}

/// Generate valid finite intervals over a small domain.
pub(crate) fn arbitrary_bounded_interval() -> impl Strategy<Value = Interval<usize>> {
    (0..POINT_MAX, 0..POINT_MAX).prop_map(|(a, b)| match a.cmp(&b) {
        Ordering::Less => iv(a..b),
        Ordering::Greater => iv(b..a),
        Ordering::Equal => iv(a..b + 1),
    })
}

/// A brute-force interval-merging set over a sorted `Vec`, used as the
/// control model for property tests.
///
/// Mirrors the coverage semantics of [`IntervalTreeSet`]: no two stored
/// intervals intersect or touch.
///
/// [`IntervalTreeSet`]: crate::IntervalTreeSet
#[derive(Debug, Default, Clone)]
pub(crate) struct NaiveSet {
    items: Vec<Interval<usize>>,
}

impl NaiveSet {
    pub(crate) fn items(&self) -> &[Interval<usize>] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn add(&mut self, key: Interval<usize>) -> bool {
        let covered = self.contains(&key);

        let mut min = IntervalBounds::min(&key).cloned();
        let mut max = IntervalBounds::max(&key).cloned();
        let mut out = Vec::with_capacity(self.items.len() + 1);

        for item in self.items.drain(..) {
            if key.intersects(&item) || key.touches(&item) {
                if cmp_mins(IntervalBounds::min(&item), min.as_ref()) == Ordering::Less {
                    min = IntervalBounds::min(&item).cloned();
                }
                if cmp_maxes(IntervalBounds::max(&item), max.as_ref()) == Ordering::Greater {
                    max = IntervalBounds::max(&item).cloned();
                }
            } else {
                out.push(item);
            }
        }

        out.push(Interval::new(min, max).unwrap());
        out.sort_by(|a, b| cmp_mins(IntervalBounds::min(a), IntervalBounds::min(b)));
        self.items = out;

        !covered
    }

    pub(crate) fn remove(&mut self, key: &Interval<usize>) -> bool {
        let mut changed = false;
        let mut out = Vec::with_capacity(self.items.len() + 1);

        for item in self.items.drain(..) {
            if !key.intersects(&item) {
                out.push(item);
                continue;
            }

            changed = true;
            if cmp_mins(IntervalBounds::min(&item), IntervalBounds::min(key)) == Ordering::Less {
                out.push(
                    Interval::new(
                        IntervalBounds::min(&item).cloned(),
                        IntervalBounds::min(key).cloned(),
                    )
                    .unwrap(),
                );
            }
            if cmp_maxes(IntervalBounds::max(&item), IntervalBounds::max(key)) == Ordering::Greater {
                out.push(
                    Interval::new(
                        IntervalBounds::max(key).cloned(),
                        IntervalBounds::max(&item).cloned(),
                    )
                    .unwrap(),
                );
            }
        }

        out.sort_by(|a, b| cmp_mins(IntervalBounds::min(a), IntervalBounds::min(b)));
        self.items = out;
        changed
    }

    pub(crate) fn contains_point(&self, point: &usize) -> bool {
        self.items.iter().any(|item| item.contains_point(point))
    }

    pub(crate) fn contains(&self, key: &Interval<usize>) -> bool {
        self.items.iter().any(|item| {
            cmp_mins(IntervalBounds::min(item), IntervalBounds::min(key)) != Ordering::Greater
                && cmp_maxes(IntervalBounds::max(item), IntervalBounds::max(key)) != Ordering::Less
        })
    }

    pub(crate) fn intersects(&self, key: &Interval<usize>) -> bool {
        self.items.iter().any(|item| item.intersects(key))
    }

    pub(crate) fn difference(&self, key: &Interval<usize>) -> Vec<Interval<usize>> {
        let mut out = Vec::new();
        let mut prev = IntervalBounds::min(key).cloned();

        for item in &self.items {
            if cmp_max_to_min(IntervalBounds::max(item), IntervalBounds::min(key)) != Ordering::Greater {
                continue;
            }
            if cmp_min_to_max(IntervalBounds::min(item), IntervalBounds::max(key)) != Ordering::Less {
                break;
            }

            if cmp_mins(prev.as_ref(), IntervalBounds::min(item)) == Ordering::Less {
                out.push(Interval::new(prev, IntervalBounds::min(item).cloned()).unwrap());
            }
            prev = match IntervalBounds::max(item) {
                Some(max) => Some(max.clone()),
                None => return out,
            };
        }

        if cmp_min_to_max(prev.as_ref(), IntervalBounds::max(key)) == Ordering::Less {
            out.push(Interval::new(prev, IntervalBounds::max(key).cloned()).unwrap());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_set_merges() {
        let mut model = NaiveSet::default();

        assert!(model.add(iv(3..5)));
        assert!(model.add(iv(5..7)));
        assert_eq!(model.items(), &[iv(3..7)]);

        // Re-adding covered coverage reports no change.
        assert!(!model.add(iv(4..6)));
        assert_eq!(model.items(), &[iv(3..7)]);
    }

    #[test]
    fn test_naive_set_removes() {
        let mut model = NaiveSet::default();
        model.add(iv(1..10));

        assert!(model.remove(&iv(4..6)));
        assert_eq!(model.items(), &[iv(1..4), iv(6..10)]);

        assert!(!model.remove(&iv(4..6)));
    }

    #[test]
    fn test_naive_set_difference() {
        let mut model = NaiveSet::default();
        model.add(iv(1..3));
        model.add(iv(5..7));

        assert_eq!(model.difference(&iv(0..9)), vec![iv(0..1), iv(3..5), iv(7..9)]);
        assert_eq!(model.difference(&iv(1..3)), vec![]);
        assert_eq!(model.difference(&iv(10..12)), vec![iv(10..12)]);
    }
}
