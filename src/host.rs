//! The reflective hook the core uses to talk to whatever embeds it: dynamic
//! property access, function application, and object construction. A real
//! embedding (a DOM, a TUI, a test harness) supplies its own `HostBridge`;
//! `PlainObjectHost` is a minimal one good enough to drive the crate's own
//! tests and a bare CLI session.

use crate::error::ForthError;
use crate::value::Value;

pub trait HostBridge {
    fn get_property(&self, target: &Value, name: &str) -> Result<Value, ForthError>;
    fn set_property(&self, target: &Value, name: &str, value: Value) -> Result<(), ForthError>;
    fn apply(&self, func: &Value, args: &[Value]) -> Result<Value, ForthError>;
    fn make_object(&self) -> Value;
    fn global(&self) -> Value;
}

/// Backs property access with the `Value::Object` map directly: `get`/`set`
/// read and write the map, `apply` invokes a `Value::Callable`, and the
/// "global" object is just another empty object a session can stash things
/// on.
pub struct PlainObjectHost {
    global: Value,
}

impl PlainObjectHost {
    pub fn new() -> PlainObjectHost {
        PlainObjectHost {
            global: Value::object(),
        }
    }
}

impl Default for PlainObjectHost {
    fn default() -> Self {
        PlainObjectHost::new()
    }
}

impl HostBridge for PlainObjectHost {
    fn get_property(&self, target: &Value, name: &str) -> Result<Value, ForthError> {
        match target {
            Value::Object(map) => Ok(map.borrow().get(name).cloned().unwrap_or(Value::Undefined)),
            _ => Err(ForthError::Host(format!(
                "cannot read property {:?} of {}",
                name,
                target.type_name()
            ))),
        }
    }

    fn set_property(&self, target: &Value, name: &str, value: Value) -> Result<(), ForthError> {
        match target {
            Value::Object(map) => {
                map.borrow_mut().insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(ForthError::Host(format!(
                "cannot set property {:?} of {}",
                name,
                target.type_name()
            ))),
        }
    }

    fn apply(&self, func: &Value, args: &[Value]) -> Result<Value, ForthError> {
        match func {
            Value::Callable(f) => Ok(f(args)?.unwrap_or(Value::Undefined)),
            _ => Err(ForthError::Host(format!("{} is not callable", func.type_name()))),
        }
    }

    fn make_object(&self) -> Value {
        Value::object()
    }

    fn global(&self) -> Value {
        self.global.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let host = PlainObjectHost::new();
        let obj = host.make_object();
        host.set_property(&obj, "x", Value::Number(5.0)).unwrap();
        match host.get_property(&obj, "x").unwrap() {
            Value::Number(n) => assert_eq!(n, 5.0),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn get_on_non_object_errors() {
        let host = PlainObjectHost::new();
        assert!(host.get_property(&Value::Number(1.0), "x").is_err());
    }
}
