//! gallery-tui library: product gallery screen, its REST client and runtime support.

pub mod api;
pub mod app_core;
pub mod config;
pub mod demo;
pub mod fit;
pub mod matcher;
pub mod model;
pub mod runtime;
pub mod theme;
pub mod ui;
