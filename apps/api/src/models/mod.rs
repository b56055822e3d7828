pub mod role;
pub mod skill;
