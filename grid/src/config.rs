use crate::rules::RuleSetKind;
use common::EPSILON;
use pmr_quad_tree::Config as TreeConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    // key_precision is the number of decimals kept when points are used as vertex keys
    pub key_precision: u32,
    // overlap_eps is the fraction of the smaller tile that may overlap before two tiles collide
    pub overlap_eps: f64,
    pub rules: RuleSetKind,
    pub tree: TreeConfig,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            key_precision: 3,
            overlap_eps: EPSILON,
            rules: RuleSetKind::MatchEdgeColors,
            tree: TreeConfig::default(),
        }
    }
}
