//! galaxy-world: the client-side simulation of a shared room.
//!
//! One [`Simulation::tick`] per frame turns held keys into movement,
//! resolves collisions against static footprints, folds in remote updates,
//! and produces a depth-ordered list of draw commands.

pub mod animation;
pub mod collision;
pub mod input;
pub mod render;
pub mod scenery;
pub mod sim;
pub mod world;

pub use animation::Animator;
pub use input::{InputState, Key};
pub use render::{AssetCatalog, DrawCommand};
pub use scenery::SceneObject;
pub use sim::{Simulation, TickOutput};
pub use world::{Avatar, WorldState};
