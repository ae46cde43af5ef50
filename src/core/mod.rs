pub mod hostname;
pub mod provider;
pub mod record;
