mod handler;
pub mod keystrokes;

pub use handler::{translate, HostActuator, InputHandler};
