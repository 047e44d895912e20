pub mod banner;
pub mod commands;
pub mod complaints;
pub mod config;
pub mod consts;
pub mod dashboard;
pub mod logging;
pub mod outbreak;
pub mod predict;
pub mod spinner;
pub mod state;
pub mod store;
pub mod theme;
pub mod workflow;
