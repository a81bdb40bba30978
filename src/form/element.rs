use serde::Serialize;
use std::collections::BTreeMap;

/// Attribute value: boolean attributes (`selected`, `disabled`) are flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attribute {
    Flag(bool),
    Text(String),
}

impl From<bool> for Attribute {
    fn from(v: bool) -> Self {
        Attribute::Flag(v)
    }
}

impl From<&str> for Attribute {
    fn from(v: &str) -> Self {
        Attribute::Text(v.to_string())
    }
}

impl From<String> for Attribute {
    fn from(v: String) -> Self {
        Attribute::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Attribute>,
    ) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn add_element(&mut self, child: Element) -> &mut Self {
        self.children.push(child);
        self
    }
}

/// Value(s) to pre-select in a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    One(String),
    Many(Vec<String>),
}

impl Selected {
    fn contains(&self, value: &str) -> bool {
        match self {
            Selected::One(v) => v == value,
            Selected::Many(vs) => vs.iter().any(|v| v == value),
        }
    }
}

impl From<&str> for Selected {
    fn from(v: &str) -> Self {
        Selected::One(v.to_string())
    }
}

impl From<Vec<String>> for Selected {
    fn from(vs: Vec<String>) -> Self {
        Selected::Many(vs)
    }
}

/// A `<select>` control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ElementSelect {
    element: Element,
}

impl Default for ElementSelect {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementSelect {
    pub fn new() -> Self {
        Self {
            element: Element::new("select"),
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    /// Append one `<option>` per `(key, label)` pair.
    ///
    /// With `associative` unset, the options count as a plain list when the
    /// keys run `0, 1, 2, ...` in order. A plain list uses each label as its
    /// own value; otherwise the key is the value.
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
        let options: Vec<(String, String)> = options
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into()))
            .collect();

        let associative = associative.unwrap_or_else(|| !is_sequential(&options));

        for (key, label) in options {
            let value = if associative { key } else { label.clone() };

            let mut option = Element::new("option");
            option.set_attribute("value", value.as_str());
            if selected.as_ref().is_some_and(|s| s.contains(&value)) {
                option.set_attribute("selected", true);
            }
            option.set_text(label);

            self.element.add_element(option);
        }

        self
    }
}

fn is_sequential(options: &[(String, String)]) -> bool {
    options
        .iter()
        .enumerate()
        .all(|(i, (key, _))| *key == i.to_string())
}
