pub mod classify_types;
pub mod intake_types;
