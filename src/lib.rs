pub mod app;
pub mod buffer;
pub mod config;
pub mod error;
pub mod fs_utils;
pub mod headless;
pub mod image_utils;
pub mod inpaint;
pub mod logging;
pub mod selection;
pub mod session;
pub mod ui;
