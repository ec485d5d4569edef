pub mod effect;
pub mod theme;
pub mod types;

pub use effect::{Effect, NodeGroup, ScrollBehavior, Target, TimerKind};
pub use theme::Theme;
pub use types::{Point, Rect, Size};
