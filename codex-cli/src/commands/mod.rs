pub(crate) mod compile;
pub(crate) mod config;
pub(crate) mod factions;
