pub mod headless;
pub mod input_adapter;
pub mod orbit;
pub mod render_loop;
pub mod resources;
pub mod scene;

pub use headless::{EngineEvent, HeadlessEngine, ManualScheduler};
pub use input_adapter::PointerInput;
pub use orbit::OrbitControls;
pub use render_loop::{LoopState, RenderLoop};
pub use resources::{Prop, ResourceSet, ResourceSlot};
pub use scene::Scene;
