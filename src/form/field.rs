use serde::Serialize;

use super::element::Element;

/// A labelled form control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field<C = Element> {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    control: C,
}

impl<C> Field<C> {
    pub fn new(control: C) -> Self {
        Self { label: None, control }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn get_control(&self) -> &C {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    pub fn set_control(&mut self, control: C) -> &mut Self {
        self.control = control;
        self
    }
}
