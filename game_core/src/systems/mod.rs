pub mod collision;
pub mod input;
pub mod launch;
pub mod movement;
pub mod scoring;

pub use collision::*;
pub use input::*;
pub use launch::*;
pub use movement::*;
pub use scoring::*;
