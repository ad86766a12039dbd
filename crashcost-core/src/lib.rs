pub mod fusion;
pub mod geometry;
pub mod labels;
pub mod severity;
pub mod thresholds;

pub use fusion::{fuse, FusedDetection, RawDetection, INTACT};
pub use geometry::BoundingBox;
pub use labels::{canonicalize, map_damage_type, map_part};
pub use severity::{parse_override, score, Severity};
