pub mod renderer;

pub use renderer::{MenuView, Renderer};
