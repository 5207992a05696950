//! Window handlers.
//!
//! - `main_form`   : handler of the compiled main form
//! - `list_editor` : auto-growing list editor sub-window
//! - `file_picker` : file chooser bridge for path parameters
pub mod file_picker;
pub mod list_editor;
pub mod main_form;

pub use list_editor::ListEditor;
pub use main_form::MainForm;
