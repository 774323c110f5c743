pub mod prelude;

pub mod battle;
pub mod competition;
pub mod competition_stage;
pub mod competitor;
pub mod judge;
pub mod score;
