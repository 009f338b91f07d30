pub mod controller;
pub mod machine;
pub mod simulated;
pub mod surface;
pub mod traits;
pub use controller::{GalleryCommand, GalleryController, GalleryHandle};
pub use machine::{PlayerState, SideEffect, StateMachine};
pub use simulated::{SimulatedFullscreenHost, SimulatedSurface};
pub use surface::SurfaceAdapter;
pub use traits::{FullscreenHost, PlaybackSurface, SurfaceEvent};
