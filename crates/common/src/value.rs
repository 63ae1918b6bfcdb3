//! Runtime value representation for the Socratic VM.
//!
//! Values are what live on the operand stack, in variable bindings and in
//! the two registers.
//!
//! # List aliasing
//!
//! [`Value::List`] holds a shared handle ([`ListRef`]). Cloning the value
//! clones the handle, so a list loaded onto the stack and the variable it
//! came from are the same sequence: `APPEND`/`STORE_INDEX` through one name
//! is visible through every other copy. Programs written for the language
//! rely on this, so it is kept as-is.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::number::format_number;

/// Rendering of `Bool(true)`.
pub const TRUE_WORD: &str = "Verdadeiro";
/// Rendering of `Bool(false)`.
pub const FALSE_WORD: &str = "Falso";
/// Rendering of `Nil`.
pub const NIL_WORD: &str = "Nulo";
/// Text values equal to one of these words are falsy.
pub const FALSY_WORDS: [&str; 2] = [FALSE_WORD, "Nao"];
/// Console answers read as `Bool(true)` by `INPUT`.
pub const AFFIRMATIVE_WORDS: [&str; 2] = [TRUE_WORD, "Sim"];
/// Console answers read as `Bool(false)` by `INPUT`.
pub const NEGATIVE_WORDS: [&str; 2] = FALSY_WORDS;

/// Shared, growable list storage.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// A dynamically tagged runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Nil,
    /// Boolean value.
    Bool(bool),
    /// IEEE 754 double.
    Number(f64),
    /// Character sequence.
    Text(String),
    /// Ordered, mutable-in-place sequence. See the module docs on aliasing.
    List(ListRef),
}

/// The kind of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Number,
    Text,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::Text => "text",
            ValueKind::List => "list",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Build a `Number`.
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Build a `Text`.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Build a `List` with a fresh handle.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// An empty list with a fresh handle.
    pub fn empty_list() -> Self {
        Self::list(Vec::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// The list handle, if this value is a list.
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness rule used by `JUMP_IF_FALSE`, `AND` and `OR`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty() && !FALSY_WORDS.contains(&s.as_str()),
            Value::List(items) => !items.borrow().is_empty(),
        }
    }

    /// Whether two values share the same underlying list storage.
    pub fn same_list(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        open: &mut Vec<*const RefCell<Vec<Value>>>,
    ) -> fmt::Result {
        match self {
            Value::Nil => f.write_str(NIL_WORD),
            Value::Bool(true) => f.write_str(TRUE_WORD),
            Value::Bool(false) => f.write_str(FALSE_WORD),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                let ptr = Rc::as_ptr(items);
                // A list stored inside itself renders once.
                if open.contains(&ptr) {
                    return f.write_str("[...]");
                }
                open.push(ptr);
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.render(f, open)?;
                }
                open.pop();
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Vec::new())
    }
}

// Structural equality. Numbers compare with `==` (so NaN != NaN); lists
// compare element-wise, and two handles to the same storage are equal
// without being walked.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}
