mod config;
mod hotkey;
