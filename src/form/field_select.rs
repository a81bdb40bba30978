use serde::Serialize;

use super::element::{ElementSelect, Selected};
use super::field::Field;

/// A field whose control is a select list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSelect {
    field: Field<ElementSelect>,
}

impl Default for FieldSelect {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSelect {
    pub fn new() -> Self {
        Self {
            field: Field::new(ElementSelect::new()),
        }
    }

    pub fn field(&self) -> &Field<ElementSelect> {
        &self.field
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.field.set_label(label);
        self
    }

    /// Sets the control's `name`, the key its value is submitted under
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name: String = name.into();
        self.field.control_mut().element_mut().set_attribute("name", name);
        self
    }

    /// See [`ElementSelect::add_select_options`]
    pub fn add_select_options<I, K, V>(
        &mut self,
        options: I,
        selected: Option<Selected>,
        associative: Option<bool>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<String>,
    {
        self.field
            .control_mut()
            .add_select_options(options, selected, associative);
        self
    }
}
