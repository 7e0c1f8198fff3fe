pub mod auth;
pub mod dashboard;
pub mod preview;
pub mod project;
pub mod settings;
pub mod skill;
