pub mod queue;
pub mod time;
