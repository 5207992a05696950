//! Toolkit-neutral layout description.
//!
//! A layout is an ordered list of rows; a row is a left-to-right list of
//! widgets. Named containers group rows that can later be extended through
//! [`crate::toolkit::Toolkit::extend`].

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Static caption.
    Label(String),
    /// Read-only text that handlers can update (e.g. the chosen path).
    Text { key: String, text: String },
    /// Single-line input; `events` makes every change emit `Event::Changed`.
    Input {
        key: String,
        text: String,
        events: bool,
    },
    Checkbox { key: String, checked: bool },
    Button { key: String, label: String },
}

impl Widget {
    pub fn key(&self) -> Option<&str> {
        match self {
            Widget::Label(_) => None,
            Widget::Text { key, .. }
            | Widget::Input { key, .. }
            | Widget::Checkbox { key, .. }
            | Widget::Button { key, .. } => Some(key),
        }
    }
}

pub type Row = Vec<Widget>;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Row(Row),
    Container { key: String, rows: Vec<Row> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub elements: Vec<Element>,
}

impl Layout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    pub fn row(mut self, row: Row) -> Self {
        self.elements.push(Element::Row(row));
        self
    }

    pub fn container(mut self, key: impl Into<String>, rows: Vec<Row>) -> Self {
        self.elements.push(Element::Container {
            key: key.into(),
            rows,
        });
        self
    }

    /// All widgets in reading order, containers flattened in place.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.elements.iter().flat_map(|element| {
            let rows: &[Row] = match element {
                Element::Row(row) => std::slice::from_ref(row),
                Element::Container { rows, .. } => rows,
            };
            rows.iter().flatten()
        })
    }

    pub fn find(&self, key: &str) -> Option<&Widget> {
        self.widgets().find(|w| w.key() == Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widgets_flatten_containers_in_order() {
        let layout = Layout::new("t")
            .row(vec![Widget::Label("a".into())])
            .container(
                "-ROWS-",
                vec![vec![Widget::Input {
                    key: "-ROW-0-".into(),
                    text: String::new(),
                    events: true,
                }]],
            )
            .row(vec![Widget::Button {
                key: "-SUBMIT-".into(),
                label: "Submit".into(),
            }]);
        let keys: Vec<_> = layout.widgets().filter_map(Widget::key).collect();
        assert_eq!(keys, ["-ROW-0-", "-SUBMIT-"]);
        assert!(layout.find("-ROW-0-").is_some());
        assert!(layout.find("-ROW-1-").is_none());
    }
}
