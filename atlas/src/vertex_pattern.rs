use common::EPSILON;
use indexmap::IndexMap;
use result::{Error, Result};
use shape::Shape;
use std::rc::Rc;

// VertexCorner is one tile corner meeting at a vertex, as seen by the atlas.
pub trait VertexCorner {
    fn shape(&self) -> &Rc<Shape>;
    fn corner_type(&self) -> usize;
    // edge_angle is the angle of the tile edge leaving the vertex, in [0, 2π)
    fn edge_angle(&self) -> f64;
}

#[derive(Clone, Debug)]
pub struct PatternCorner {
    pub shape: Rc<Shape>,
    pub vertex_index: usize,
    pub corner_type: usize,
    pub corner_angle: f64,
}

impl PatternCorner {
    pub fn new(shape: &Rc<Shape>, vertex_index: usize) -> PatternCorner {
        PatternCorner {
            shape: Rc::clone(shape),
            vertex_index,
            corner_type: shape.corner_types[vertex_index],
            corner_angle: shape.corner_angles[vertex_index],
        }
    }
}

// VertexPattern lists the corners around a complete vertex in counter-clockwise order
#[derive(Clone, Debug)]
pub struct VertexPattern {
    pub name: Option<String>,
    pub corners: Vec<PatternCorner>,
}

impl VertexPattern {
    pub fn new(name: Option<String>, corners: Vec<PatternCorner>) -> VertexPattern {
        VertexPattern { name, corners }
    }

    // from_str parses a vertex such as "L0-L0-S1", where letters refer to keys of shapes
    pub fn from_str(name: Option<String>, vertex: &str, shapes: &IndexMap<String, Rc<Shape>>) -> Result<VertexPattern> {
        let corners = vertex
            .split('-')
            .map(|component| {
                let chars: Vec<char> = component.chars().collect();
                let (key, index) = match chars.as_slice() {
                    [key, index] if key.is_ascii_alphabetic() => match index.to_digit(10) {
                        Some(index) => (key.to_string(), index as usize),
                        None => return Err(Error::MalformedComponent(String::from(component))),
                    },
                    _ => return Err(Error::MalformedComponent(String::from(component))),
                };
                let shape = shapes.get(&key).ok_or_else(|| Error::UnknownShape(key.clone()))?;
                if index >= shape.num_sides() {
                    return Err(Error::MalformedComponent(String::from(component)))
                }
                Ok(PatternCorner::new(shape, index))
            })
            .collect::<Result<Vec<PatternCorner>>>()?;
        Ok(VertexPattern::new(name, corners))
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    // check_match is true if the corners, sorted by edge angle, fit somewhere in this pattern.
    // Gaps between corners are allowed as long as they are filled by unused pattern corners.
    pub fn check_match<C: VertexCorner>(&self, corners: &[C]) -> bool {
        let first = match corners.first() {
            Some(first) => first,
            None => return true,
        };
        let n = self.corners.len();
        (0..n).any(|start| {
            let mut angle = first.edge_angle();
            let mut index = 0;
            for corner in corners.iter() {
                while angle < corner.edge_angle() - EPSILON && index < n {
                    angle += self.corners[(index + start) % n].corner_angle;
                    index += 1;
                }
                if index >= n {
                    return false
                }
                let expected = &self.corners[(index + start) % n];
                if (angle - corner.edge_angle()).abs() > EPSILON
                    || !Rc::ptr_eq(corner.shape(), &expected.shape)
                    || corner.corner_type() != expected.corner_type
                {
                    return false
                }
                angle += expected.corner_angle;
                index += 1;
            }
            true
        })
    }
}
