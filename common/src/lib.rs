pub use float_cmp;

use num_traits::{Float, cast::NumCast};
use std::{
    collections::{hash_map::DefaultHasher, HashMap, HashSet},
    f64::consts::{PI, TAU},
    hash::{Hash, Hasher},
};

// DEFAULT_F64_MARGIN is the (epsilon, ulps) pair used for approximate float equality.
pub const DEFAULT_F64_MARGIN: (f64, i64) = (0.000_001, 5);

// EPSILON is the absolute tolerance used when comparing accumulated angles and lengths.
pub const EPSILON: f64 = 1e-5;

pub const DEG2RAD: f64 = PI / 180.;

#[macro_export]
macro_rules! approx_eq {
    ($type:ty, $left:expr, $right:expr) => {{
        let (left, right): ($type, $type) = ($left, $right);
        assert!(
            $crate::float_cmp::approx_eq!($type, left, right, epsilon = 0.000_01, ulps = 2),
            "assertion failed: `(left ~= right)`\n  left: `{:?}`\n right: `{:?}`",
            left,
            right,
        );
    }};
}

pub fn calc_hash<T: Hash>(t: &T) -> u64 {
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}

// fmt_float truncates digits from a float
pub fn fmt_float<F: Float>(f: F, decimal_precision: u32) -> String {
    let pow = 10_i64.pow(decimal_precision);
    let scale: F = NumCast::from(pow).unwrap_or_else(F::one);
    let i = (f * scale).round().to_i64().unwrap_or_default();
    format!(
        "{}{}.{}",
        if i < 0 { "-" } else { "" },
        (i / pow).abs(),
        if decimal_precision == 0 {
            String::from("")
        } else {
            format!("{:0width$}", (i % pow).abs(), width = decimal_precision as usize)
        }
    )
}

// rad wraps an angle into [0, TAU)
pub fn rad(angle: f64) -> f64 {
    let angle = angle % TAU;
    if angle < 0. { angle + TAU } else { angle }
}

// deg rounds a radian angle to whole degrees
pub fn deg(angle: f64) -> i64 {
    (angle / DEG2RAD).round() as i64
}

// rotate_array returns a copy of values starting at offset and wrapping around
pub fn rotate_array<T: Clone>(values: &[T], offset: usize) -> Vec<T> {
    let n = values.len();
    (0..n).map(|i| values[(i + offset) % n].clone()).collect()
}

// map_to_index replaces every value with the order in which it was first seen,
// e.g. [b, b, a, c] -> [0, 0, 1, 2]
pub fn map_to_index<T: Eq + Hash>(values: &[T]) -> Vec<usize> {
    let mut seen: HashMap<&T, usize> = HashMap::new();
    values
        .iter()
        .map(|value| {
            let next = seen.len();
            *seen.entry(value).or_insert(next)
        })
        .collect()
}

// canonical_rotation is the lexicographically smallest rotation of values
fn canonical_rotation<T: Clone + Ord>(values: &[T]) -> Vec<T> {
    (0..values.len())
        .map(|offset| rotate_array(values, offset))
        .min()
        .unwrap_or_default()
}

// UniqueCycleSet collects sequences while rejecting any that is a cyclic rotation of one already seen.
#[derive(Clone, Debug)]
pub struct UniqueCycleSet<T: Clone + Eq + Hash + Ord> {
    canonical: HashSet<Vec<T>>,
    items: Vec<Vec<T>>,
}

impl<T: Clone + Eq + Hash + Ord> UniqueCycleSet<T> {
    pub fn new() -> UniqueCycleSet<T> {
        UniqueCycleSet { canonical: HashSet::new(), items: vec![] }
    }

    // insert returns false when values is a rotation of an existing entry
    pub fn insert(&mut self, values: Vec<T>) -> bool {
        if !self.canonical.insert(canonical_rotation(&values)) {
            return false
        }
        self.items.push(values);
        true
    }

    pub fn contains(&self, values: &[T]) -> bool {
        self.canonical.contains(&canonical_rotation(values))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Vec<T>> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_fmt_float() {
        let pi = NumCast::from(PI).unwrap();

        assert_eq!("3.", fmt_float::<f32>(pi, 0));
        assert_eq!("3.1", fmt_float::<f32>(pi, 1));
        assert_eq!("3.14", fmt_float::<f32>(pi, 2));
        assert_eq!("3.142", fmt_float::<f32>(pi, 3));

        assert_eq!("3.1416", fmt_float::<f64>(PI, 4));
        assert_eq!("3.05", fmt_float::<f64>(3.05, 2));
        assert_eq!("-1.45", fmt_float::<f64>(-1.449, 2));
    }

    #[test]
    fn test_rad() {
        approx_eq!(f64, 0., rad(TAU));
        approx_eq!(f64, 3. * PI / 2., rad(-PI / 2.));
        approx_eq!(f64, PI, rad(3. * PI));
    }

    #[test]
    fn test_deg() {
        assert_eq!(90, deg(PI / 2.));
        assert_eq!(108, deg(108. * DEG2RAD + 1e-9));
    }

    #[test]
    fn test_rotate_array() {
        assert_eq!(vec![3, 4, 1, 2], rotate_array(&[1, 2, 3, 4], 2));
        assert_eq!(vec![1, 2, 3], rotate_array(&[1, 2, 3], 3));
        assert_eq!(Vec::<usize>::new(), rotate_array::<usize>(&[], 0));
    }

    #[test]
    fn test_map_to_index() {
        assert_eq!(vec![0, 0, 1, 2, 1], map_to_index(&["b", "b", "a", "c", "a"]));
    }

    #[test]
    fn test_unique_cycle_set() {
        let mut set = UniqueCycleSet::new();
        assert!(set.insert(vec![1, 2, 3]));
        assert!(!set.insert(vec![2, 3, 1]));
        assert!(!set.insert(vec![3, 1, 2]));
        assert!(set.insert(vec![3, 2, 1]));
        assert!(set.contains(&[1, 3, 2]));
        assert_eq!(vec![vec![1, 2, 3], vec![3, 2, 1]], set.into_vec());
    }
}
