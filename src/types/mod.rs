mod models;
mod profile;

pub use models::*;
pub use profile::*;
