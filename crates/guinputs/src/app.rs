use std::rc::Rc;

use anyhow::Result;
use tracing::{info, instrument};

use crate::errors::FormError;
use crate::form::{compile, CompiledForm};
use crate::invoke::{assemble, Arguments};
use crate::router::{Session, WindowRouter};
use crate::signature::Signature;
use crate::toolkit::Toolkit;
use crate::windows::MainForm;

/// The registered callable. Its error is returned from [`App::run`] unchanged.
pub type Callable = Box<dyn FnMut(Arguments) -> Result<()>>;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The form was submitted and the callable ran.
    Invoked,
    /// The main window was closed without a submission.
    Dismissed,
}

struct Registration {
    form: Rc<CompiledForm>,
    callable: Callable,
}

/// Binds one callable to its compiled form and runs the window loop for it.
#[derive(Default)]
pub struct App {
    registration: Option<Registration>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `signature` and bind `func` to the resulting form.
    ///
    /// Fails before any window exists when a parameter cannot be mapped.
    /// Registering again replaces the previous registration.
    pub fn register<F>(
        &mut self,
        display_name: Option<&str>,
        signature: &Signature,
        func: F,
    ) -> Result<&CompiledForm, FormError>
    where
        F: FnMut(Arguments) -> Result<()> + 'static,
    {
        let form = Rc::new(compile(signature, display_name)?);
        info!(form = %form.title, callable = %signature.name, "registered");
        let registration = self.registration.insert(Registration {
            form,
            callable: Box::new(func),
        });
        Ok(registration.form.as_ref())
    }

    pub fn form(&self) -> Option<&CompiledForm> {
        self.registration.as_ref().map(|r| r.form.as_ref())
    }

    /// Open the main window and process events until every window is closed.
    ///
    /// The callable runs at most once, after the loop has ended, and only if
    /// the main form was submitted.
    #[instrument(skip_all)]
    pub fn run(&mut self, toolkit: &mut dyn Toolkit) -> Result<RunOutcome> {
        let registration = self.registration.as_mut().ok_or(FormError::NotRegistered)?;
        let form = Rc::clone(&registration.form);

        let main = toolkit.create(&form.layout)?;
        info!(form = %form.title, window = %main, "main window opened");

        let mut session = Session::default();
        let mut router = WindowRouter::new(main, Box::new(MainForm::new(Rc::clone(&form))));
        router.run(toolkit, &mut session)?;

        let Some(values) = session.submission.take() else {
            info!("run ended without submission");
            return Ok(RunOutcome::Dismissed);
        };

        let arguments = assemble(&form, &values, &session.store)?;
        info!(
            args = arguments.args.len(),
            kwargs = arguments.kwargs.len(),
            "invoking callable"
        );
        (registration.callable)(arguments)?;
        Ok(RunOutcome::Invoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Param, ParamType};
    use crate::testing::ScriptedToolkit;

    #[test]
    fn run_without_registration_fails() {
        let mut toolkit = ScriptedToolkit::new();
        let err = App::new().run(&mut toolkit).unwrap_err();
        assert_eq!(err.downcast_ref::<FormError>(), Some(&FormError::NotRegistered));
        assert_eq!(toolkit.created(), 0);
    }

    #[test]
    fn unsupported_signature_opens_no_window() {
        let mut app = App::new();
        let sig = Signature::new("f").param(Param::new("x", ParamType::Other("set".into())));
        assert!(app.register(None, &sig, |_| Ok(())).is_err());
        assert!(app.form().is_none());
    }

    #[test]
    fn register_exposes_the_form() {
        let mut app = App::new();
        let sig = Signature::new("greet").param(Param::of::<String>("name"));
        let form = app.register(Some("Greeter"), &sig, |_| Ok(())).unwrap();
        assert_eq!(form.title, "Greeter");
        assert_eq!(app.form().map(CompiledForm::len), Some(1));
    }
}
