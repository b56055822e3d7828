// Skill bookkeeping: confidence arithmetic, CV/GitHub import planning, source comparison.
// The planners are pure; handlers do the loading and writing through the repository.

pub mod comparison;
pub mod confidence;
pub mod handlers;
pub mod import;
