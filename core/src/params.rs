use core::fmt::{self, Write};

use compact_str::{CompactString, format_compact};
use hashbrown::HashMap;
use joinery_types::{Dialect, Value};

/// Styles of named parameter placeholders.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// At-sign style placeholders (@param)
    #[default]
    AtSign,
    /// Colon style placeholders (:param)
    Colon,
}

/// Extension trait for dialect-specific placeholder rendering
pub trait DialectExt {
    fn placeholder_style(&self) -> PlaceholderStyle;

    /// Writes the placeholder for parameter `name`.
    fn write_placeholder(&self, name: &str, buf: &mut String) {
        let _ = Placeholder::with_style(name, self.placeholder_style()).write(buf);
    }
}

impl DialectExt for Dialect {
    #[inline]
    fn placeholder_style(&self) -> PlaceholderStyle {
        match self.param_prefix() {
            ':' => PlaceholderStyle::Colon,
            _ => PlaceholderStyle::AtSign,
        }
    }
}

/// A named SQL parameter placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub style: PlaceholderStyle,
}

impl<'a> Placeholder<'a> {
    pub const fn with_style(name: &'a str, style: PlaceholderStyle) -> Self {
        Placeholder { name, style }
    }

    /// Creates a new at-sign-style placeholder.
    pub const fn at(name: &'a str) -> Self {
        Self::with_style(name, PlaceholderStyle::AtSign)
    }

    /// Creates a new colon-style placeholder.
    pub const fn colon(name: &'a str) -> Self {
        Self::with_style(name, PlaceholderStyle::Colon)
    }

    fn write(&self, buf: &mut impl Write) -> fmt::Result {
        match self.style {
            PlaceholderStyle::AtSign => buf.write_char('@')?,
            PlaceholderStyle::Colon => buf.write_char(':')?,
        }
        buf.write_str(self.name)
    }
}

impl fmt::Display for Placeholder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

/// A named value bound to a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: CompactString,
    pub value: Value,
}

/// Uniquely named parameters of one statement or join definition.
///
/// Names are `<column><counter>`. The counter is shared by every column, so
/// sub-expressions merged into one statement never collide:
///
/// ```
/// use joinery_core::ParameterSet;
///
/// let mut params = ParameterSet::new();
/// assert_eq!(params.allocate("Age", 18.into()), "Age0");
/// assert_eq!(params.allocate("Country", "US".into()), "Country1");
/// assert_eq!(params.allocate("Country", "CA".into()), "Country2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    params: Vec<Parameter>,
    index: HashMap<CompactString, usize>,
    counter: usize,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under a fresh name derived from `column`.
    ///
    /// When the textual name is already taken (column `A1` with counter 0
    /// against column `A` with counter 10), the counter advances until the
    /// name is unique.
    pub fn allocate(&mut self, column: &str, value: Value) -> CompactString {
        let name = loop {
            let candidate = format_compact!("{column}{}", self.counter);
            self.counter += 1;
            if !self.index.contains_key(&candidate) {
                break candidate;
            }
        };
        self.index.insert(name.clone(), self.params.len());
        self.params.push(Parameter {
            name: name.clone(),
            value,
        });
        name
    }

    /// Binds `value` under exactly `name`, replacing an earlier value of the
    /// same name. Used where names are chosen by the caller, e.g. procedure
    /// arguments.
    pub fn bind(&mut self, name: &str, value: Value) {
        match self.index.get(name) {
            Some(&i) => self.params[i].value = value,
            None => {
                let name = CompactString::from(name);
                self.index.insert(name.clone(), self.params.len());
                self.params.push(Parameter { name, value });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.params[i].value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Parameters in allocation order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Next counter value to be handed out.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn into_vec(self) -> Vec<Parameter> {
        self.params
    }
}

impl PartialEq for ParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = core::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_follows_dialect() {
        let mut buf = String::new();
        Dialect::Postgres.write_placeholder("Age0", &mut buf);
        buf.push(' ');
        Dialect::Oracle.write_placeholder("Age0", &mut buf);
        assert_eq!(buf, "@Age0 :Age0");
        assert_eq!(Placeholder::colon("x").to_string(), ":x");
    }

    #[test]
    fn clashing_names_advance_the_counter() {
        let mut params = ParameterSet::new();
        for _ in 0..10 {
            params.allocate("B", Value::Null);
        }
        // counter is now 10; "A1" + "0" would be "A10", then "A" + "11"
        assert_eq!(params.allocate("A1", 1.into()), "A110");
        assert_eq!(params.allocate("A", 2.into()), "A11");

        let mut params = ParameterSet::new();
        assert_eq!(params.allocate("A1", 1.into()), "A10");
        for _ in 1..10 {
            params.allocate("B", Value::Null);
        }
        assert_eq!(params.counter(), 10);
        assert_eq!(params.allocate("A", 2.into()), "A11");
        assert_eq!(params.len(), 11);
    }

    #[test]
    fn lookup_by_name() {
        let mut params = ParameterSet::new();
        let name = params.allocate("Total", 100.0.into());
        assert_eq!(params.get(&name), Some(&Value::Double(100.0)));
        assert!(params.get("Total1").is_none());
    }
}
