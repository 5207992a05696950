//! Terminal implementation of the guinputs [`Toolkit`](guinputs::toolkit::Toolkit).
//!
//! Windows are stacked popups; a bar at the top lists the open windows and
//! F2 switches between them. The file chooser is a path prompt.

pub mod config;
pub mod dialog;
pub mod popup;
pub mod render;
pub mod toolkit;
pub mod window;

pub use config::TerminalConfig;
pub use toolkit::{restore, TerminalToolkit};
