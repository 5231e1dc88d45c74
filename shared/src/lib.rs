pub mod constants;
pub mod selection;
pub mod validation;
pub mod wheel;
