pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod level;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
