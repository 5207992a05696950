//! Signature-driven input forms.
//!
//! A callable is registered together with its [`Signature`]; the signature is
//! compiled into a form (one widget row per parameter) that a [`Toolkit`]
//! renders. [`App::run`] then drives the window loop: numeric fields are
//! filtered on every keystroke, list parameters get their own editor window,
//! path parameters use the toolkit's file chooser. When the form is
//! submitted the collected values are converted back to typed [`Value`]s and
//! the callable is invoked with them.
//!
//! ```
//! use guinputs::prelude::*;
//! use guinputs::testing::ScriptedToolkit;
//!
//! let signature = Signature::new("greet")
//!     .param(Param::of::<String>("name").positional())
//!     .param(Param::of::<i64>("times").default(1));
//!
//! let mut app = App::new();
//! app.register(None, &signature, |args: Arguments| {
//!     assert_eq!(args.positional::<String>(0)?, "Ann");
//!     assert_eq!(args.named::<i64>("times")?, 3);
//!     Ok(())
//! })
//! .unwrap();
//!
//! let mut toolkit = ScriptedToolkit::new();
//! let main = WindowId(0);
//! toolkit
//!     .type_text(main, "-name-STR-", "Ann")
//!     .set_text(main, "-times-INT-", "3")
//!     .press(main, SUBMIT_KEY);
//! assert_eq!(app.run(&mut toolkit).unwrap(), RunOutcome::Invoked);
//! ```

pub mod app;
pub mod errors;
pub mod form;
pub mod invoke;
pub mod layout;
pub mod router;
pub mod signature;
pub mod store;
pub mod testing;
pub mod toolkit;
pub mod types;
pub mod validate;
pub mod value;
pub mod windows;

pub use app::{App, Callable, RunOutcome};
pub use errors::{ConversionError, FormError};
pub use form::{compile, CompiledForm, FieldKey, SUBMIT_KEY};
pub use invoke::Arguments;
pub use signature::{Param, ParamType, Signature};
pub use toolkit::{Toolkit, WindowId};
pub use value::{FromValue, Value};

pub mod prelude {
    pub use crate::app::{App, RunOutcome};
    pub use crate::form::SUBMIT_KEY;
    pub use crate::invoke::Arguments;
    pub use crate::signature::{Param, ParamType, Signature};
    pub use crate::toolkit::{Toolkit, WindowId};
    pub use crate::value::{FromValue, Value};
}
