pub mod animation;
pub mod input;
pub mod surface;
pub mod time;
