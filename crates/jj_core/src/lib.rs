pub mod animation;
pub mod coords;
pub mod draw;
pub mod input;
pub mod time;
