pub mod app;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod host;
pub mod input;
pub mod loaders;
pub mod render;
pub mod scene;
pub mod settings;
pub mod update;

pub use host::{dispatch, FrameScheduler, HostSignal, Viewport};
pub use scene::{HeroScene, SceneParams};
pub use update::Backdrop;
