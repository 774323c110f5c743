pub use super::battle::Entity as Battle;
pub use super::competition::Entity as Competition;
pub use super::competition_stage::Entity as CompetitionStage;
pub use super::competitor::Entity as Competitor;
pub use super::judge::Entity as Judge;
pub use super::score::Entity as Score;
