pub mod canvas;
pub mod events;
pub mod layer;
pub mod path;
pub mod session;

pub use canvas::{CanvasBlock, WeavingCanvas};
pub use events::{WeavingEvent, WeavingEvents};
pub use layer::WeavingLayer;
pub use path::{LinearPath, PathGenerator, SelectivePath, SerpentinePath};
pub use session::WeavingSession;
