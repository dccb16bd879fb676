pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod indicators;
pub mod pager;
pub mod scheduler;
pub mod tasks {
    pub mod carousel;
    pub mod commands;
    pub mod simulate;
}
