pub mod controller;
pub mod model;

pub use controller::{AnchorSwing, MotionStatus, MoveTask, ThreadMotionController, ThreadState};
pub use model::{ChainRope, RopeModel};
