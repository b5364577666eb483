use crate::tile::SegmentRef;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

// RuleSetKind picks the color rule a grid is played with
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleSetKind {
    MatchEdgeColors,
    DifferentEdgeColors,
}

impl RuleSetKind {
    pub fn create(&self) -> Box<dyn RuleSet> {
        match self {
            RuleSetKind::MatchEdgeColors => Box::new(MatchEdgeColors),
            RuleSetKind::DifferentEdgeColors => Box::new(DifferentEdgeColors),
        }
    }
}

// ColorConstraints lists the segments that should share a color with a given segment,
// and the segments that should not
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorConstraints {
    pub same: Vec<SegmentRef>,
    pub different: Vec<SegmentRef>,
}

pub trait RuleSet: Debug {
    fn kind(&self) -> RuleSetKind;

    // accepts is true if a segment colored proposed may touch a segment colored existing
    fn accepts(&self, existing: &str, proposed: &str) -> bool;

    fn color_constraints(&self, neighbors: Vec<SegmentRef>) -> ColorConstraints;

    // check_colors is true if colors fit a tile rotated by offset.
    // neighbor_colors[i] holds the colors of the other tiles touching edge i.
    fn check_colors(&self, neighbor_colors: &[Vec<&str>], colors: &[String], offset: usize) -> bool {
        let n = neighbor_colors.len();
        if colors.len() != n {
            return false
        }
        (0..n).all(|i| {
            neighbor_colors[(i + n - offset % n) % n]
                .iter()
                .all(|existing| self.accepts(existing, &colors[i]))
        })
    }
}

// MatchEdgeColors requires touching segments to have the same color
#[derive(Debug)]
pub struct MatchEdgeColors;

impl RuleSet for MatchEdgeColors {
    fn kind(&self) -> RuleSetKind {
        RuleSetKind::MatchEdgeColors
    }

    fn accepts(&self, existing: &str, proposed: &str) -> bool {
        existing == proposed
    }

    fn color_constraints(&self, neighbors: Vec<SegmentRef>) -> ColorConstraints {
        ColorConstraints { same: neighbors, different: vec![] }
    }
}

// DifferentEdgeColors requires touching segments to have different colors
#[derive(Debug)]
pub struct DifferentEdgeColors;

impl RuleSet for DifferentEdgeColors {
    fn kind(&self) -> RuleSetKind {
        RuleSetKind::DifferentEdgeColors
    }

    fn accepts(&self, existing: &str, proposed: &str) -> bool {
        existing != proposed
    }

    fn color_constraints(&self, neighbors: Vec<SegmentRef>) -> ColorConstraints {
        ColorConstraints { same: vec![], different: neighbors }
    }
}
