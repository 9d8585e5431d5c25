use std::fmt;

/// Static type of a bound expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Value a variable of this type reads as before anything was stored.
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Bool => Value::Bool(false),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Bool => write!(f, "bool"),
        }
    }
}

/// Runtime value. Equality is variant-sensitive: `Int(1) != Float(1.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
        }
    }

    /// Double-precision view used by every arithmetic operator.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => f64::from(*n),
            Value::Float(n) => *n,
            Value::Bool(b) => f64::from(u8::from(*b)),
        }
    }

    /// Single-precision view used by the relational operators.
    pub fn as_f32(&self) -> f32 {
        match self {
            Value::Int(n) => *n as f32,
            Value::Float(n) => *n as f32,
            Value::Bool(b) => f32::from(u8::from(*b)),
        }
    }

    /// Integer view used by for-loop bounds; floats truncate toward zero.
    pub fn as_i32(&self) -> i32 {
        match self {
            Value::Int(n) => *n,
            Value::Float(n) => *n as i32,
            Value::Bool(b) => i32::from(*b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                // Always show at least one decimal place for floats
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}
