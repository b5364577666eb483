use crate::point::Point;

// Edge is a directed segment from .0 to .1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge(pub Point, pub Point);

impl Edge {
    // angle is the direction of travel from .0 to .1
    pub fn angle(&self) -> f64 {
        (&self.1 - &self.0).arg()
    }

    pub fn length(&self) -> f64 {
        self.0.distance(&self.1)
    }

    pub fn midpoint(&self) -> Point {
        self.0.midpoint(&self.1)
    }

    pub fn reversed(&self) -> Edge {
        Edge(self.1, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_edge_angle() {
        approx_eq!(f64, 0., Edge(Point(0., 0.), Point(1., 0.)).angle());
        approx_eq!(f64, PI / 2., Edge(Point(1., 0.), Point(1., 1.)).angle());
        approx_eq!(f64, PI, Edge(Point(0., 0.), Point(1., 0.)).reversed().angle());
    }

    #[test]
    fn test_edge_length() {
        approx_eq!(f64, 5., Edge(Point(1., 1.), Point(4., 5.)).length());
        assert_eq!(Point(2.5, 3.), Edge(Point(1., 1.), Point(4., 5.)).midpoint());
    }
}
