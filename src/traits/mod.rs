pub mod controls;
pub mod engine;
pub mod scene;
pub mod scheduler;
pub mod surface;

pub use controls::*;
pub use engine::*;
pub use scene::*;
pub use scheduler::*;
pub use surface::*;
