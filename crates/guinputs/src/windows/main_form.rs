//! Handler of the main form window.
//!
//! Events are dispatched by the type tag of their key:
//!
//! - `INT` / `FLOAT` changes run the live numeric filter
//! - `LIST` presses open a list editor for that field
//! - `PATH` presses run the file chooser
//! - the submit button, and anything else, attempt a submission
//!
//! A submission only goes through when every field resolves. Otherwise the
//! offending widgets are highlighted and the window stays open.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::form::{CompiledForm, FieldBinding, FieldKey};
use crate::invoke::resolve;
use crate::router::{Flow, HandlerContext, WindowHandler};
use crate::toolkit::{Event, FieldValue, Values, WindowEvent, WindowId};
use crate::types::{Converter, FieldTag, NumericKind};
use crate::validate::{filter, Filtered};
use crate::value::Value;
use crate::windows::file_picker::choose_file;
use crate::windows::list_editor::ListEditor;

pub struct MainForm {
    form: Rc<CompiledForm>,
    /// Keys currently highlighted as invalid.
    flagged: BTreeSet<String>,
    /// List editor window per list field.
    editors: BTreeMap<FieldKey, WindowId>,
}

impl MainForm {
    pub fn new(form: Rc<CompiledForm>) -> Self {
        Self {
            form,
            flagged: BTreeSet::new(),
            editors: BTreeMap::new(),
        }
    }

    fn on_close(&self, cx: &HandlerContext<'_>) -> Flow {
        let remaining = cx.open_windows().saturating_sub(1);
        info!(remaining, "main window closed without submission");
        Flow::Stop
    }

    fn filter_input(
        &mut self,
        cx: &mut HandlerContext<'_>,
        window: WindowId,
        key: &str,
        kind: NumericKind,
        values: &Values,
    ) -> Result<()> {
        let text = values.text(key).unwrap_or_default();
        if let Filtered::Revert(kept) = filter(kind, text) {
            cx.toolkit.update(window, key, FieldValue::Text(kept))?;
        }
        self.unflag(cx, window, key)
    }

    fn open_list_editor(&mut self, cx: &mut HandlerContext<'_>, binding: &FieldBinding) -> Result<()> {
        let Converter::List(element) = binding.converter else {
            return Ok(());
        };
        if let Some(&open) = self.editors.get(&binding.key) {
            if cx.is_open(open) {
                debug!(field = %binding.key, window = %open, "list editor already open");
                return Ok(());
            }
        }
        let slot = cx.store().ensure(&binding.key, || {
            binding.fallback().unwrap_or(Value::List(Vec::new()))
        });
        let editor = ListEditor::new(binding.key.clone(), &binding.param.name, element, slot);
        let layout = editor.layout();
        let window = cx.open_window(&layout, Box::new(editor))?;
        self.editors.insert(binding.key.clone(), window);
        Ok(())
    }

    fn choose_path(
        &mut self,
        cx: &mut HandlerContext<'_>,
        window: WindowId,
        key: &FieldKey,
    ) -> Result<()> {
        if choose_file(cx, window, key)?.is_some() {
            self.unflag(cx, window, key.as_str())?;
        }
        Ok(())
    }

    fn submit(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow> {
        let problems: Vec<(String, String)> = self
            .form
            .bindings
            .values()
            .filter_map(|binding| {
                resolve(binding, &event.values, &cx.session.store)
                    .err()
                    .map(|err| (binding.key.to_string(), err.to_string()))
            })
            .collect();

        let fixed: Vec<String> = self
            .flagged
            .iter()
            .filter(|key| !problems.iter().any(|(k, _)| k == *key))
            .cloned()
            .collect();
        for key in fixed {
            self.unflag(cx, event.window, &key)?;
        }

        if problems.is_empty() {
            info!(form = %self.form.title, "form submitted");
            cx.submit(event.values.clone());
            return Ok(Flow::Stop);
        }

        warn!(invalid = problems.len(), "submission rejected");
        for (key, message) in problems {
            cx.toolkit.highlight(event.window, &key, Some(&message))?;
            self.flagged.insert(key);
        }
        Ok(Flow::Continue)
    }

    fn unflag(&mut self, cx: &mut HandlerContext<'_>, window: WindowId, key: &str) -> Result<()> {
        if self.flagged.remove(key) {
            cx.toolkit.highlight(window, key, None)?;
        }
        Ok(())
    }
}

impl WindowHandler for MainForm {
    fn name(&self) -> &str {
        "main form"
    }

    fn handle(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow> {
        let key = match &event.event {
            Event::Closed => return Ok(self.on_close(cx)),
            Event::Changed(key) | Event::Pressed(key) => key,
        };

        let form = Rc::clone(&self.form);
        let Some(binding) = FieldKey::parse(key).and_then(|k| form.binding(k.as_str())) else {
            return self.submit(cx, event);
        };

        match (binding.key.tag(), &event.event) {
            (FieldTag::Int | FieldTag::Float, Event::Changed(_)) => {
                if let Some(kind) = binding.converter.numeric() {
                    self.filter_input(cx, event.window, key, kind, &event.values)?;
                }
                Ok(Flow::Continue)
            }
            (FieldTag::List, Event::Pressed(_)) => {
                self.open_list_editor(cx, binding)?;
                Ok(Flow::Continue)
            }
            (FieldTag::Path, Event::Pressed(_)) => {
                self.choose_path(cx, event.window, &binding.key)?;
                Ok(Flow::Continue)
            }
            _ => self.submit(cx, event),
        }
    }
}
