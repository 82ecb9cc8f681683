mod config;
mod suffix;
