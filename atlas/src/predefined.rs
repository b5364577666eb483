use crate::Atlas;
use result::{Error, Result};
use source_grid::SourceGridKind;

const PENROSE3: &str = r#"{
    "name": "Penrose-3",
    "shapes": {
        "L": { "name": "rhombus-wide", "angles": [72, 108, 72, 108], "frequency": 5 },
        "S": { "name": "rhombus-narrow", "angles": [36, 144, 36, 144], "frequency": 3 }
    },
    "vertices": [
        { "name": "kite", "vertex": "L1-S1-L1" },
        { "name": "deuce", "vertex": "S1-L0-S1" },
        { "name": "jack", "vertex": "L0-L0-L0-S1" },
        { "name": "ace", "vertex": "L1-S0-L0-S0-L1" },
        { "name": "king", "vertex": "L0-L0-S0-S0-L0-L0" },
        { "name": "queen", "vertex": "L0-S0-S0-L0-S0-S0-L0" },
        { "name": "sun/star", "vertex": "L0-L0-L0-L0-L0" }
    ]
}"#;

const PENROSE3_FREE: &str = r#"{
    "name": "Penrose-3-free",
    "shapes": {
        "L": { "name": "rhombus-wide", "angles": [72, 108, 72, 108], "frequency": 5 },
        "S": { "name": "rhombus-narrow", "angles": [36, 144, 36, 144], "frequency": 3 }
    }
}"#;

const SQUARES: &str = r#"{
    "name": "Square",
    "shapes": {
        "S": { "name": "square", "angles": [90, 90, 90, 90] }
    },
    "vertices": [{ "name": "square", "vertex": "S0-S0-S0-S0" }]
}"#;

const TRIANGLES: &str = r#"{
    "name": "Triangle",
    "shapes": {
        "T": {
            "name": "triangle",
            "angles": [60, 60, 60],
            "colorPatterns": [[[0, 1, 2]], [[0, 1, 1]], [[0, 0, 0]]]
        }
    },
    "vertices": [{ "name": "triangle", "vertex": "T0-T0-T0-T0-T0-T0" }]
}"#;

const RHOMBUS: &str = r#"{
    "name": "Rhombus-60-120",
    "shapes": {
        "L": { "name": "rhombus", "angles": [60, 120, 60, 120] }
    },
    "vertices": [
        { "name": "a", "vertex": "L0-L0-L0-L0-L0-L0" },
        { "name": "b", "vertex": "L1-L0-L0-L0-L0" },
        { "name": "c", "vertex": "L1-L1-L0-L0" },
        { "name": "d", "vertex": "L1-L0-L1-L0" },
        { "name": "e", "vertex": "L1-L1-L1" }
    ]
}"#;

const HEXAGONS: &str = r#"{
    "name": "Hexagon",
    "shapes": {
        "H": { "name": "hexagon", "angles": [120, 120, 120, 120, 120, 120] }
    }
}"#;

// the first side is 2 * sqrt(2) * cos(75deg) = sqrt(3) - 1
const CAIRO: &str = r#"{
    "name": "Cairo5",
    "shapes": {
        "P": {
            "name": "pentagon",
            "angles": [120, 120, 90, 120, 90],
            "sides": [0.7320508075688772, 1, 1, 1, 1],
            "colorPatterns": [[[0, 1, 2, 3, 4]], [[0, 1, 1, 2, 2]], [[0, 0, 0, 0, 0]]]
        }
    },
    "vertices": [
        { "name": "a", "vertex": "P0-P3-P1" },
        { "name": "b", "vertex": "P2-P2-P2-P2" },
        { "name": "c", "vertex": "P4-P4-P4-P4" }
    ]
}"#;

// short sides are 1 / sqrt(3)
const DELTO_TRIHEX: &str = r#"{
    "name": "Deltoidal-Trihexagonal",
    "shapes": {
        "P": {
            "name": "kite",
            "angles": [120, 90, 60, 90],
            "sides": [0.5773502691896258, 1, 1, 0.5773502691896258],
            "colorPatterns": [[[0, 1, 2, 3]], [[0, 1, 2, 0]], [[0, 0, 1, 1]], [[0, 1, 1, 0]], [[0, 0, 0, 0]]]
        }
    },
    "vertices": [
        { "name": "a", "vertex": "P0-P0-P0" },
        { "name": "b", "vertex": "P1-P3-P1-P3" },
        { "name": "c", "vertex": "P2-P2-P2-P2-P2-P2" }
    ]
}"#;

const SNUB_SQUARE: &str = r#"{
    "name": "Snub-Square",
    "shapes": {
        "S": {
            "name": "square",
            "angles": [90, 90, 90, 90],
            "frequency": 1,
            "colorPatterns": [[[0, 1, 2, 3]], [[0, 0, 1, 1], [0, 1, 1, 0]], [[0, 0, 0, 0]]]
        },
        "T": {
            "name": "triangle",
            "angles": [60, 60, 60],
            "frequency": 2,
            "colorPatterns": [[[0, 1, 2]], [[0, 0, 1], [0, 1, 0], [1, 0, 0]], [[0, 0, 0]]]
        }
    },
    "vertices": [{ "name": "a", "vertex": "S0-T0-S0-T0-T0" }]
}"#;

const SNUB_SQUARE_FREE: &str = r#"{
    "name": "Snub-Square-free",
    "shapes": {
        "S": {
            "name": "square",
            "angles": [90, 90, 90, 90],
            "frequency": 1,
            "colorPatterns": [[[0, 1, 2, 3]], [[0, 0, 1, 1], [0, 1, 1, 0]], [[0, 0, 0, 0]]]
        },
        "T": {
            "name": "triangle",
            "angles": [60, 60, 60],
            "frequency": 2,
            "colorPatterns": [[[0, 1, 2]], [[0, 0, 1], [0, 1, 0], [1, 0, 0]], [[0, 0, 0]]]
        }
    }
}"#;

const AMMANN_BEENKER: &str = r#"{
    "name": "Ammann-Beenker",
    "shapes": {
        "S": {
            "name": "square",
            "angles": [90, 90, 90, 90],
            "frequency": 1,
            "colorPatterns": [[[0, 1, 2, 3]], [[0, 0, 1, 1], [0, 1, 1, 0]], [[0, 0, 0, 0]]]
        },
        "R": {
            "name": "rhombus",
            "angles": [45, 135, 45, 135],
            "frequency": 1,
            "colorPatterns": [[[0, 1, 2, 3]], [[0, 0, 1, 1], [0, 1, 1, 0]], [[0, 0, 0, 0]]]
        }
    }
}"#;

pub const PREDEFINED_ATLASES: &[&str] = &[
    "Penrose-3",
    "Penrose-3-free",
    "Square",
    "Triangle",
    "Rhombus-60-120",
    "Hexagon",
    "Cairo5",
    "Deltoidal-Trihexagonal",
    "Snub-Square",
    "Snub-Square-free",
    "Ammann-Beenker",
    "Penrose-3 grid",
    "Snub square grid",
];

pub fn penrose3() -> Result<Atlas> {
    Atlas::from_json(PENROSE3)
}

pub fn penrose3_free() -> Result<Atlas> {
    Atlas::from_json(PENROSE3_FREE)
}

pub fn squares() -> Result<Atlas> {
    Atlas::from_json(SQUARES)
}

pub fn triangles() -> Result<Atlas> {
    Atlas::from_json(TRIANGLES)
}

pub fn rhombus() -> Result<Atlas> {
    Atlas::from_json(RHOMBUS)
}

pub fn hexagons() -> Result<Atlas> {
    Atlas::from_json(HEXAGONS)
}

pub fn cairo() -> Result<Atlas> {
    Atlas::from_json(CAIRO)
}

pub fn delto_trihex() -> Result<Atlas> {
    Atlas::from_json(DELTO_TRIHEX)
}

pub fn snub_square() -> Result<Atlas> {
    Atlas::from_json(SNUB_SQUARE)
}

pub fn snub_square_free() -> Result<Atlas> {
    Atlas::from_json(SNUB_SQUARE_FREE)
}

pub fn ammann_beenker() -> Result<Atlas> {
    Atlas::from_json(AMMANN_BEENKER)
}

pub fn penrose3_grid() -> Result<Atlas> {
    Atlas::from_source_grid("Penrose-3 grid", SourceGridKind::Penrose3)
}

pub fn snub_square_grid() -> Result<Atlas> {
    Atlas::from_source_grid("Snub square grid", SourceGridKind::SnubSquare)
}

// predefined builds one of PREDEFINED_ATLASES by name
pub fn predefined(name: &str) -> Result<Atlas> {
    match name {
        "Penrose-3" => penrose3(),
        "Penrose-3-free" => penrose3_free(),
        "Square" => squares(),
        "Triangle" => triangles(),
        "Rhombus-60-120" => rhombus(),
        "Hexagon" => hexagons(),
        "Cairo5" => cairo(),
        "Deltoidal-Trihexagonal" => delto_trihex(),
        "Snub-Square" => snub_square(),
        "Snub-Square-free" => snub_square_free(),
        "Ammann-Beenker" => ammann_beenker(),
        "Penrose-3 grid" => penrose3_grid(),
        "Snub square grid" => snub_square_grid(),
        _ => Err(Error::EmptyAtlas(String::from(name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_atlases_build() {
        for name in PREDEFINED_ATLASES.iter() {
            let atlas = predefined(name).unwrap();
            assert_eq!(*name, atlas.name);
            assert!(!atlas.patterns.is_empty());
            assert!(!atlas.orientations().is_empty());
        }
        assert!(predefined("Unknown").is_err());
    }

    #[test]
    fn test_predefined_penrose3() {
        let atlas = penrose3().unwrap();
        assert_eq!(7, atlas.patterns.len());
        assert_eq!(Some(String::from("kite")), atlas.patterns[0].name);
        assert_eq!(vec!["rhombus-wide", "rhombus-narrow"], atlas.shapes.iter().map(|s| s.name.as_str()).collect::<Vec<_>>());
        assert_eq!(vec![5. / 3., 1.], atlas.shape_frequencies);
    }

    #[test]
    fn test_predefined_shapes() {
        let cairo = cairo().unwrap();
        assert_eq!(vec![0, 1, 2, 3, 4], cairo.shapes[0].corner_types);
        assert_eq!(3, cairo.shapes[0].color_patterns.len());

        let kite = delto_trihex().unwrap();
        assert_eq!(5, kite.shapes[0].color_patterns.len());

        let ammann = ammann_beenker().unwrap();
        assert_eq!("square", ammann.shapes[0].name);
        assert_eq!("rhombus", ammann.shapes[1].name);
        assert!(ammann.patterns.iter().any(|pattern| pattern.len() == 8));

        let free = penrose3_free().unwrap();
        assert!(free.patterns.len() > 7);
        assert_eq!(None, free.source_grid);

        assert_eq!(Some(SourceGridKind::Penrose3), penrose3_grid().unwrap().source_grid);
        assert_eq!(Some(SourceGridKind::SnubSquare), snub_square_grid().unwrap().source_grid);
    }
}
