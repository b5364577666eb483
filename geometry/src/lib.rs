mod bounds;
mod edge;
mod point;
mod polygon;

pub use self::bounds::*;
pub use self::edge::*;
pub use self::point::*;
pub use self::polygon::*;
