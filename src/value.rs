//////////////////////////////////////////////////////////////////
/// value.rs
///
/// The tagged value held on every stack in the engine: numbers,
/// booleans, strings, regexes, the two JS-flavored "nothing" values,
/// arrays, opaque host objects, dictionary-entry references, compiled
/// locations, and host-facing callables.
///
use crate::dictionary::DictionaryEntry;
use crate::error::ForthError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type Array = Rc<RefCell<Vec<Value>>>;
pub type HostObject = Rc<RefCell<HashMap<String, Value>>>;
pub type HostFn = Rc<dyn Fn(&[Value]) -> Result<Option<Value>, ForthError>>;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Str(Rc<str>),
    Regex(Rc<regex::Regex>),
    Null,
    Undefined,
    Array(Array),
    Object(HostObject),
    DictEntry(Rc<DictionaryEntry>),
    CompiledCell(Rc<DictionaryEntry>, usize),
    Callable(HostFn),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(Rc::from(s.into()))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object() -> Value {
        Value::Object(Rc::new(RefCell::new(HashMap::new())))
    }

    /// is_truthy follows JS rules: false, 0, NaN, "", null and undefined are
    /// falsy; everything else (including an empty array/object) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Boolean(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Null | Value::Undefined => false,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Str(_) => "string",
            Value::Regex(_) => "regex",
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::DictEntry(_) => "word",
            Value::CompiledCell(..) => "cell",
            Value::Callable(_) => "callable",
        }
    }

    /// strict_eq mirrors JS `===`: no coercion, and reference identity for
    /// the aggregate/reference-bearing variants.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::DictEntry(a), Value::DictEntry(b)) => Rc::ptr_eq(a, b),
            (Value::CompiledCell(da, ia), Value::CompiledCell(db, ib)) => {
                Rc::ptr_eq(da, db) && ia == ib
            }
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            (Value::Regex(a), Value::Regex(b)) => Rc::ptr_eq(a, b) || a.as_str() == b.as_str(),
            _ => false,
        }
    }

    /// loose_eq mirrors JS `==`: numbers and strings coerce towards a
    /// number, null and undefined are equal only to each other and
    /// themselves, everything else falls back to strict equality.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Undefined) | (Undefined, Null) => true,
            (Number(_), Str(_)) | (Str(_), Number(_)) | (Boolean(_), _) | (_, Boolean(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => self.strict_eq(other),
                }
            }
            _ => self.strict_eq(other),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => {
                if s.trim().is_empty() {
                    Some(0.0)
                } else {
                    s.trim().parse::<f64>().ok()
                }
            }
            Value::Null => Some(0.0),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Regex(r) => write!(f, "/{}/", r.as_str()),
            Value::Null => write!(f, "null"),
            Value::Undefined => write!(f, "undefined"),
            Value::Array(a) => write!(f, "{:?}", a.borrow()),
            Value::Object(_) => write!(f, "<object>"),
            Value::DictEntry(e) => write!(f, "<word {}>", e.name.as_deref().unwrap_or("anonymous")),
            Value::CompiledCell(e, i) => {
                write!(f, "<cell {}@{}>", e.name.as_deref().unwrap_or("anonymous"), i)
            }
            Value::Callable(_) => write!(f, "<callable>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
    }

    #[test]
    fn truthy_values() {
        assert!(Value::Number(1.0).is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn loose_eq_coerces_like_js() {
        assert!(Value::Number(1.0).loose_eq(&Value::str("1")));
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Number(1.0).strict_eq(&Value::str("1")));
    }

    #[test]
    fn strict_eq_array_is_identity() {
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = Value::array(vec![Value::Number(1.0)]);
        assert!(!a.strict_eq(&b));
        let c = a.clone();
        assert!(a.strict_eq(&c));
    }
}
