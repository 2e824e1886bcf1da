pub mod delivery;
pub mod email;
pub mod form;
pub mod payload;
pub mod profile;
pub mod submission;
pub mod validation;
