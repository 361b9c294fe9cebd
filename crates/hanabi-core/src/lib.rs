pub mod game;
pub mod inference;
pub mod knowledge;
pub mod model;
