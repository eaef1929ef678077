//! Newtype identifiers. Kept distinct so a material id can never be passed
//! where an agent id is expected, the same habit the teacher applies to
//! single-field wrapper components (`DesiredVelocity(Vec2)`, `Owner(Entity)`).

use std::fmt;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id!(MaterialId);
string_id!(AgentId);
string_id!(ShapeId);
string_id!(WallId);

/// Index of a segment within a wall polyline: segment `k` runs from corner
/// `k` to corner `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentIndex(pub usize);
