use std::fmt;

/// Number of boxes a constraint kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range { min: usize, max: Option<usize> },
    Any,
}

impl Arity {
    pub const fn at_least(min: usize) -> Self {
        Arity::Range { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range { min, max } => count >= min && max.is_none_or(|max| count <= max),
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::Range { min, max: None } => write!(f, "at least {min}"),
            Arity::Range {
                min,
                max: Some(max),
            } => write!(f, "between {min} and {max}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}
