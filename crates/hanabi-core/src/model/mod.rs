pub mod action;
pub mod card;
pub mod colour;
pub mod deck;
pub mod fireworks;
pub mod state;
