mod definition;
mod predefined;
mod vertex_pattern;

pub use self::definition::*;
pub use self::predefined::*;
pub use self::vertex_pattern::*;

use common::{UniqueCycleSet, DEG2RAD};
use indexmap::IndexMap;
use itertools::Itertools;
use result::{Error, Result};
use shape::Shape;
use source_grid::SourceGridKind;
use std::{cell::OnceCell, collections::BTreeSet, rc::Rc};

const MAX_ORIENTATIONS: usize = 100;

// Atlas is a set of shapes together with the vertex configurations they may form
#[derive(Debug)]
pub struct Atlas {
    pub name: String,
    pub shapes: Vec<Rc<Shape>>,
    pub patterns: Vec<VertexPattern>,
    // parallel to shapes, normalized so that the rarest shape has frequency 1
    pub shape_frequencies: Vec<f64>,
    pub source_grid: Option<SourceGridKind>,
    orientations: OnceCell<Vec<f64>>,
}

impl Atlas {
    pub fn new(
        name: &str,
        shapes: Vec<Rc<Shape>>,
        patterns: Vec<VertexPattern>,
        frequencies: Option<Vec<f64>>,
        source_grid: Option<SourceGridKind>,
    ) -> Result<Atlas> {
        if patterns.is_empty() {
            return Err(Error::EmptyAtlas(String::from(name)))
        }
        let frequencies: Vec<f64> = (0..shapes.len())
            .map(|i| frequencies.as_ref().and_then(|f| f.get(i).copied()).filter(|f| *f > 0.).unwrap_or(1.))
            .collect();
        let min = frequencies.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(Atlas {
            name: String::from(name),
            shapes,
            patterns,
            shape_frequencies: frequencies.iter().map(|f| f / min).collect(),
            source_grid,
            orientations: OnceCell::new(),
        })
    }

    pub fn from_definition(definition: &AtlasDefinition) -> Result<Atlas> {
        let mut shapes: IndexMap<String, Rc<Shape>> = IndexMap::new();
        let mut frequencies = vec![];
        for (key, shape_definition) in definition.shapes.iter() {
            let shape = Shape::new(
                shape_definition.name.as_deref().unwrap_or(""),
                &shape_definition.angles,
                shape_definition.sides.as_deref(),
                shape_definition.color_patterns.clone(),
            )?;
            if shapes.values().any(|existing| existing.equal_angles(&shape)) {
                return Err(Error::DuplicateShape(key.clone()))
            }
            shapes.insert(key.clone(), Rc::new(shape));
            frequencies.push(shape_definition.frequency.unwrap_or(1.));
        }

        let patterns = match &definition.vertices {
            Some(vertices) => vertices
                .iter()
                .map(|vertex| VertexPattern::from_str(vertex.name.clone(), &vertex.vertex, &shapes))
                .collect::<Result<Vec<VertexPattern>>>()?,
            None => compute_vertex_patterns(&shapes.values().cloned().collect::<Vec<_>>()),
        };

        Atlas::new(
            definition.name.as_deref().unwrap_or(""),
            shapes.into_iter().map(|(_, shape)| shape).collect(),
            patterns,
            Some(frequencies),
            None,
        )
    }

    pub fn from_json(json: &str) -> Result<Atlas> {
        let definition: AtlasDefinition = serde_json::from_str(json)?;
        Atlas::from_definition(&definition)
    }

    // from_source_grid builds an atlas that places tiles following the given source grid
    pub fn from_source_grid(name: &str, kind: SourceGridKind) -> Result<Atlas> {
        let shapes = kind.shapes()?;
        let patterns = compute_vertex_patterns(&shapes);
        Atlas::new(name, shapes, patterns, Some(kind.shape_frequencies()), Some(kind))
    }

    pub fn shape_index(&self, shape: &Rc<Shape>) -> Option<usize> {
        self.shapes.iter().position(|s| Rc::ptr_eq(s, shape))
    }

    pub fn shape_frequency(&self, shape: &Rc<Shape>) -> Option<f64> {
        self.shape_index(shape).map(|i| self.shape_frequencies[i])
    }

    // check_match is true if any pattern in the atlas accepts the corners
    pub fn check_match<C: VertexCorner>(&self, corners: &[C]) -> bool {
        self.patterns.iter().any(|pattern| pattern.check_match(corners))
    }

    // orientations lists every rotation, in radians, that a tile can take in this atlas
    pub fn orientations(&self) -> &[f64] {
        self.orientations.get_or_init(|| compute_orientations(&self.shapes))
    }
}

fn compute_orientations(shapes: &[Rc<Shape>]) -> Vec<f64> {
    let mut angles: BTreeSet<i64> = BTreeSet::new();
    angles.insert(0);
    while angles.len() < MAX_ORIENTATIONS {
        let count = angles.len();
        for start in angles.clone() {
            for shape in shapes.iter() {
                let mut angle = start as f64;
                for corner in shape.corner_angles.iter() {
                    let rounded = (angle.round() as i64).rem_euclid(360);
                    angles.insert(rounded);
                    angles.insert((rounded + 180) % 360);
                    angle = rounded as f64 + corner / DEG2RAD;
                }
            }
            if angles.len() > MAX_ORIENTATIONS {
                break
            }
        }
        if count == angles.len() {
            break
        }
    }
    angles.into_iter().map(|angle| angle as f64 * DEG2RAD).collect()
}

// compute_vertex_patterns finds every cyclic sequence of distinct shape corners summing to 360 degrees
fn compute_vertex_patterns(shapes: &[Rc<Shape>]) -> Vec<VertexPattern> {
    let corners: Vec<(PatternCorner, i64)> = shapes
        .iter()
        .flat_map(|shape| {
            shape.corner_types
                .iter()
                .copied()
                .unique()
                .map(move |corner_type| {
                    let corner = PatternCorner::new(shape, corner_type);
                    let degrees = (corner.corner_angle / DEG2RAD).round() as i64;
                    (corner, degrees)
                })
        })
        .collect();

    let mut combinations = UniqueCycleSet::new();
    walk_vertex_patterns(&corners, &mut vec![], 0, &mut combinations);

    combinations
        .into_vec()
        .into_iter()
        .map(|combination| VertexPattern::new(None, combination.iter().map(|i| corners[*i].0.clone()).collect()))
        .collect()
}

fn walk_vertex_patterns(
    corners: &[(PatternCorner, i64)],
    sequence: &mut Vec<usize>,
    sum: i64,
    combinations: &mut UniqueCycleSet<usize>,
) {
    for (i, (_, degrees)) in corners.iter().enumerate() {
        let total = sum + degrees;
        if total > 360 {
            continue
        }
        sequence.push(i);
        if total == 360 {
            combinations.insert(sequence.clone());
        } else {
            walk_vertex_patterns(corners, sequence, total, combinations);
        }
        sequence.pop();
    }
}
