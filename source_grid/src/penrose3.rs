use crate::{PointCache, SavedSourceGrid, SavedSourcePoint, SourceGrid, SourceGridKind, SourcePoint, SourcePointId, SourceSide};
use rand::{seq::SliceRandom, Rng, RngCore};
use result::{Error, Result};
use serde::{Deserialize, Serialize};
use shape::Shape;
use std::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    rc::Rc,
};

const DIMENSIONS: usize = 5;
const MAX_SIGMA_ATTEMPTS: usize = 10_000;
const MAX_DENOMINATOR: f64 = 30.;
const ANGLE_TOLERANCE: f64 = 1e-3;

// Line is the offset-th line of the index-th family of parallel lines in the pentagrid
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Line {
    pub index: usize,
    pub offset: i64,
}

impl Line {
    pub fn new(index: usize, offset: i64) -> Line {
        Line { index, offset }
    }
}

// Fraction keeps sigma exact while checking that no shift, or pair of shifts, is an integer
#[derive(Clone, Copy, Debug, PartialEq)]
struct Fraction {
    num: i64,
    den: i64,
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

impl Fraction {
    fn new(num: i64, den: i64) -> Fraction {
        let divisor = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Fraction { num: sign * num / divisor, den: sign * den / divisor }
    }

    fn add(&self, other: &Fraction) -> Fraction {
        Fraction::new(self.num * other.den + other.num * self.den, self.den * other.den)
    }

    fn neg(&self) -> Fraction {
        Fraction { num: -self.num, den: self.den }
    }

    fn is_integer(&self) -> bool {
        self.num % self.den == 0
    }

    fn value(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

// is_generic is true when no point of the pentagrid lies on three lines
fn is_generic(sigma: &[Fraction]) -> bool {
    sigma.iter().all(|s| !s.is_integer())
        && (0..sigma.len()).all(|i| (i + 1..sigma.len()).all(|j| !sigma[i].add(&sigma[j]).is_integer()))
}

// generate_sigma draws rational shifts summing to zero until a generic set is found
fn generate_sigma(rng: &mut dyn RngCore) -> Result<Vec<f64>> {
    for attempt in 1..=MAX_SIGMA_ATTEMPTS {
        let mut sigma = vec![Fraction::new(0, 1); DIMENSIONS];
        let mut sum = Fraction::new(0, 1);
        for s in sigma.iter_mut().skip(1) {
            let den = (rng.gen::<f64>() * MAX_DENOMINATOR + 1.).ceil() as i64;
            let num = ((rng.gen::<f64>() - 0.5) * 2. * den as f64).round() as i64;
            *s = Fraction::new(num, den);
            sum = sum.add(s);
        }
        sigma[0] = sum.neg();

        if is_generic(&sigma) {
            console::debug!("found pentagrid shifts after {} attempts", attempt);
            sigma.shuffle(rng);
            return Ok(sigma.iter().map(Fraction::value).collect())
        }
    }
    console::warning!("no pentagrid shifts found after {} attempts", MAX_SIGMA_ATTEMPTS);
    Err(Error::SigmaExhausted(MAX_SIGMA_ATTEMPTS))
}

// Penrose3SourceGrid is de Bruijn's pentagrid: every intersection of two lines is a rhombus
#[derive(Debug)]
pub struct Penrose3SourceGrid {
    shapes: Vec<Rc<Shape>>,
    sigma: Vec<f64>,
    angles: Vec<f64>,
    sin_diff: Vec<Vec<f64>>,
    csc_diff: Vec<Vec<f64>>,
    // shape index and starting edge for each ordered pair of line families
    shape_for_lines: Vec<Vec<Option<(usize, usize)>>>,
    cache: PointCache<(Line, Line)>,
    origin: SourcePointId,
}

impl Penrose3SourceGrid {
    pub fn new(shapes: Vec<Rc<Shape>>, rng: &mut dyn RngCore) -> Result<Penrose3SourceGrid> {
        let sigma = generate_sigma(rng)?;
        Penrose3SourceGrid::with_sigma(shapes, sigma)
    }

    pub fn with_sigma(shapes: Vec<Rc<Shape>>, sigma: Vec<f64>) -> Result<Penrose3SourceGrid> {
        if sigma.len() != DIMENSIONS {
            return Err(Error::InvalidSourcePoint(format!("expected {} shifts, found {}", DIMENSIONS, sigma.len())))
        }
        let angles: Vec<f64> = (0..DIMENSIONS).map(|i| (i as f64 + 0.1) * PI / DIMENSIONS as f64).collect();
        let sin_diff = angles.iter().map(|a| angles.iter().map(|b| (a - b).sin()).collect()).collect();
        let csc_diff = angles
            .iter()
            .map(|a| angles.iter().map(|b| if a == b { 0. } else { 1. / (a - b).sin() }).collect())
            .collect();

        let mut shape_for_lines = vec![vec![None; DIMENSIONS]; DIMENSIONS];
        for (i, a) in angles.iter().enumerate() {
            for (j, b) in angles.iter().enumerate() {
                if i == j {
                    continue
                }
                let angle = (b - a + TAU) % PI;
                shape_for_lines[i][j] = shapes.iter().enumerate().find_map(|(shape_index, shape)| {
                    (0..2)
                        .find(|edge| (shape.corner_angles[*edge] - angle).abs() < ANGLE_TOLERANCE)
                        .map(|edge| (shape_index, edge))
                });
                if shape_for_lines[i][j].is_none() {
                    return Err(Error::InvalidShape(format!("no shape has a corner of {} radians", angle)))
                }
            }
        }

        let mut grid = Penrose3SourceGrid {
            shapes,
            sigma,
            angles,
            sin_diff,
            csc_diff,
            shape_for_lines,
            cache: PointCache::new(),
            origin: SourcePointId(0),
        };
        grid.origin = grid.get_point(Line::new(0, 0), Line::new(1, 1))?;
        Ok(grid)
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    fn shape_for(&self, a: &Line, b: &Line) -> Result<(usize, usize)> {
        self.shape_for_lines
            .get(a.index)
            .and_then(|row| row.get(b.index))
            .copied()
            .flatten()
            .ok_or_else(|| Error::InvalidSourcePoint(format!("lines {:?} and {:?} do not cross", a, b)))
    }

    // intersection is where lines a and b cross in the plane of the pentagrid
    fn intersection(&self, a: &Line, b: &Line) -> (f64, f64) {
        let (ai, bi) = (a.index, b.index);
        let a_offset = a.offset as f64 - self.sigma[ai];
        let b_offset = b.offset as f64 - self.sigma[bi];
        let csc = self.csc_diff[ai][bi];
        (
            ((self.angles[ai] + FRAC_PI_2).sin() * b_offset - (self.angles[bi] + FRAC_PI_2).sin() * a_offset) * csc,
            ((self.angles[bi] + FRAC_PI_2).cos() * a_offset - (self.angles[ai] + FRAC_PI_2).cos() * b_offset) * csc,
        )
    }

    // get_point orders the lines so the lower family comes first
    fn get_point(&mut self, a: Line, b: Line) -> Result<SourcePointId> {
        let (a, b) = if a.index > b.index { (b, a) } else { (a, b) };
        let (shape_index, _) = self.shape_for(&a, &b)?;
        let shape = self.shapes[shape_index].clone();
        Ok(self.cache.get_or_insert_with((a, b), |(a, b)| {
            SourcePoint::new(format!("{} {} {} {}", a.index, a.offset, b.index, b.offset), shape)
        }))
    }

    // next_crossing finds the closest line crossing `line` after `cell`, walking in direction up
    fn next_crossing(&self, line: &Line, other: &Line, cell: (f64, f64), up: bool) -> Option<Line> {
        let mut best: Option<(f64, Line)> = None;
        for i in (0..DIMENSIONS).filter(|i| *i != line.index) {
            let offset = if i == other.index {
                if up { other.offset + 1 } else { other.offset - 1 }
            } else {
                let exact = self.sigma[i]
                    + (cell.0 * self.sin_diff[line.index][i]
                        + (self.angles[i] + FRAC_PI_2).sin() * (line.offset as f64 - self.sigma[line.index]))
                        / (self.angles[line.index] + FRAC_PI_2).sin();
                let angle_diff = (self.angles[i] - self.angles[line.index] + TAU) % TAU;
                if up == (angle_diff > PI) { exact.ceil() as i64 } else { exact.floor() as i64 }
            };
            let candidate = Line::new(i, offset);
            let (x, y) = self.intersection(line, &candidate);
            let distance = ((x - cell.0).powi(2) + (y - cell.1).powi(2)).sqrt();
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate));
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

impl SourceGrid for Penrose3SourceGrid {
    fn kind(&self) -> SourceGridKind {
        SourceGridKind::Penrose3
    }

    fn shapes(&self) -> &[Rc<Shape>] {
        &self.shapes
    }

    fn origin(&mut self) -> SourcePointId {
        self.origin
    }

    fn point(&self, id: SourcePointId) -> Option<&SourcePoint> {
        self.cache.point(id)
    }

    fn neighbor(&mut self, id: SourcePointId, side: usize) -> Result<SourceSide> {
        let (a, b) = *self.cache.coords(id)?;
        if side >= 4 {
            return Err(Error::InvalidSourcePoint(format!("rhombus has no side {}", side)))
        }
        let (_, start_edge) = self.shape_for(&a, &b)?;
        let direction = (side + 4 - start_edge) % 4;
        let (line, other) = if direction % 2 == 0 { (a, b) } else { (b, a) };
        let up = direction < 2;

        let cell = self.intersection(&a, &b);
        let crossing = self.next_crossing(&line, &other, cell, up)
            .ok_or_else(|| Error::InvalidSourcePoint(format!("no line crosses {:?}", line)))?;

        let point = self.get_point(line, crossing)?;
        let (neighbor_a, neighbor_b) = *self.cache.coords(point)?;
        let (_, neighbor_start_edge) = self.shape_for(&neighbor_a, &neighbor_b)?;
        let side = (if up { 2 } else { 0 } + if line.index == neighbor_a.index { 0 } else { 1 } + neighbor_start_edge) % 4;
        Ok(SourceSide { point, side })
    }

    fn save(&self) -> SavedSourceGrid {
        SavedSourceGrid::Penrose3 { sigma: self.sigma.clone() }
    }

    fn save_point(&self, id: SourcePointId) -> Option<SavedSourcePoint> {
        let (a, b) = *self.cache.coords(id).ok()?;
        Some(SavedSourcePoint::Penrose3 { a, b })
    }

    fn restore_point(&mut self, saved: &SavedSourcePoint) -> Result<SourcePointId> {
        match saved {
            SavedSourcePoint::Penrose3 { a, b } if a.index != b.index && a.index < DIMENSIONS && b.index < DIMENSIONS =>
                self.get_point(*a, *b),
            _ => Err(Error::InvalidSourcePoint(format!("{:?}", saved))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhelper::walk_grid;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid(seed: u64) -> Penrose3SourceGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        Penrose3SourceGrid::new(SourceGridKind::Penrose3.shapes().unwrap(), &mut rng).unwrap()
    }

    #[test]
    fn test_fraction() {
        assert_eq!(Fraction { num: 1, den: 2 }, Fraction::new(3, 6));
        assert_eq!(Fraction { num: -1, den: 3 }, Fraction::new(2, -6));
        assert!(Fraction::new(1, 3).add(&Fraction::new(2, 3)).is_integer());
        assert!(Fraction::new(0, 7).is_integer());
        assert!(!Fraction::new(5, 4).is_integer());
    }

    #[test]
    fn test_is_generic() {
        let f = |num, den| Fraction::new(num, den);
        assert!(is_generic(&[f(1, 10), f(1, 5), f(3, 10), f(9, 20), f(-21, 20)]));
        assert!(!is_generic(&[f(1, 1), f(1, 5), f(3, 10), f(-1, 5), f(-13, 10)]));
        // 1/5 + 4/5 crosses an integer
        assert!(!is_generic(&[f(1, 5), f(4, 5), f(1, 10), f(-1, 10), f(-1, 1)]));
    }

    #[test]
    fn test_sigma() {
        for seed in 0..10 {
            let grid = grid(seed);
            let sum: f64 = grid.sigma().iter().sum();
            assert!(sum.abs() < 1e-9);
            assert!(grid.sigma().iter().all(|s| (s - s.round()).abs() > 1e-9));
        }
    }

    #[test]
    fn test_with_sigma_checks_length() {
        let shapes = SourceGridKind::Penrose3.shapes().unwrap();
        assert!(Penrose3SourceGrid::with_sigma(shapes.clone(), vec![0.1; 4]).is_err());
        let wrong_shapes = SourceGridKind::SnubSquare.shapes().unwrap();
        assert!(Penrose3SourceGrid::with_sigma(wrong_shapes, vec![0.1, 0.2, 0.3, -0.2, -0.4]).is_err());
    }

    #[test]
    fn test_origin() {
        let mut grid = grid(3);
        let origin = grid.origin();
        assert_eq!(SourcePointId(0), origin);
        assert_eq!(origin, grid.origin());
        assert_eq!("0 0 1 1", grid.point(origin).unwrap().key);

        let neighbor = grid.neighbor(origin, 1).unwrap().point;
        assert_ne!(origin, neighbor);
        assert_eq!(origin, grid.origin());

        let restored = Penrose3SourceGrid::with_sigma(grid.shapes.clone(), grid.sigma.clone()).unwrap();
        assert_eq!("0 0 1 1", restored.point(SourcePointId(0)).unwrap().key);
    }

    #[test]
    fn test_shape_for_lines() {
        let grid = grid(5);
        for i in 0..DIMENSIONS {
            for j in 0..DIMENSIONS {
                if i == j {
                    assert!(grid.shape_for_lines[i][j].is_none());
                } else {
                    let (shape, _) = grid.shape_for_lines[i][j].unwrap();
                    let expected = if (i as i64 - j as i64).abs() % 5 == 1 || (i as i64 - j as i64).abs() == 4 { 1 } else { 0 };
                    assert_eq!(expected, shape);
                }
            }
        }
    }

    #[test]
    fn test_walk() {
        for (seed, expected) in [(1234_u64, vec![67, 33]), (1, vec![63, 37]), (42, vec![63, 37])].iter() {
            let mut grid = grid(*seed);
            assert_eq!(*expected, walk_grid(&mut grid, 100), "seed {}", seed);
        }
    }

    #[test]
    fn test_save_restore() {
        let mut grid = grid(11);
        let origin = grid.origin();
        let neighbor = grid.neighbor(origin, 2).unwrap().point;
        let saved_point = grid.save_point(neighbor).unwrap();
        assert_eq!(neighbor, grid.restore_point(&saved_point).unwrap());

        let mut restored = match grid.save() {
            SavedSourceGrid::Penrose3 { sigma } => Penrose3SourceGrid::with_sigma(grid.shapes.clone(), sigma).unwrap(),
            _ => panic!("expected a pentagrid"),
        };
        let id = restored.restore_point(&saved_point).unwrap();
        assert_eq!(grid.point(neighbor).unwrap().key, restored.point(id).unwrap().key);

        let bad = SavedSourcePoint::Penrose3 { a: Line::new(2, 0), b: Line::new(2, 1) };
        assert!(grid.restore_point(&bad).is_err());
        assert!(grid.restore_point(&SavedSourcePoint::SnubSquare { x: 0, y: 0, z: 0 }).is_err());
    }
}
