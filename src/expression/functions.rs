//! Built-in functions of the expression language.

use std::fmt;

use crate::error::EvalError;

/// Functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Sqrt,
    Exp,
    /// Natural logarithm
    Log,
    Log10,
    Max,
    Min,
}

/// Number of arguments a built-in accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    /// Whether `count` arguments are acceptable.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl Builtin {
    /// Look up a built-in by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "sinh" => Some(Self::Sinh),
            "cosh" => Some(Self::Cosh),
            "sqrt" => Some(Self::Sqrt),
            "exp" => Some(Self::Exp),
            "log" => Some(Self::Log),
            "log10" => Some(Self::Log10),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }

    /// Lowercase name as written in expressions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Max | Self::Min => Arity::AtLeast(2),
            _ => Arity::Exactly(1),
        }
    }

    /// Check the argument count against [`Builtin::arity`].
    pub fn check_arity(&self, found: usize, column: usize) -> Result<(), EvalError> {
        let arity = self.arity();
        if arity.accepts(found) {
            Ok(())
        } else {
            Err(EvalError::Arity {
                function: self.name().to_string(),
                expected: arity.to_string(),
                found,
                column,
            })
        }
    }

    /// Apply the function after checking the argument count.
    pub fn call(&self, args: &[f64], column: usize) -> Result<f64, EvalError> {
        self.check_arity(args.len(), column)?;
        Ok(self.apply(args))
    }

    fn apply(&self, args: &[f64]) -> f64 {
        match self {
            Self::Sin => args[0].sin(),
            Self::Cos => args[0].cos(),
            Self::Tan => args[0].tan(),
            Self::Sinh => args[0].sinh(),
            Self::Cosh => args[0].cosh(),
            Self::Sqrt => args[0].sqrt(),
            Self::Exp => args[0].exp(),
            Self::Log => args[0].ln(),
            Self::Log10 => args[0].log10(),
            Self::Max => args[1..]
                .iter()
                .fold(args[0], |r, &a| if a > r { a } else { r }),
            Self::Min => args[1..]
                .iter()
                .fold(args[0], |r, &a| if a < r { a } else { r }),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::from_name("log10"), Some(Builtin::Log10));
        assert_eq!(Builtin::from_name("pow"), None);
        assert_eq!(Builtin::Sqrt.arity(), Arity::Exactly(1));
        assert_eq!(Builtin::Max.arity(), Arity::AtLeast(2));
    }

    #[test]
    fn test_arity_check() {
        assert_eq!(Builtin::Sqrt.call(&[4.0], 1), Ok(2.0));
        assert_eq!(
            Builtin::Sqrt.call(&[4.0, 5.0], 1),
            Err(EvalError::Arity {
                function: "sqrt".into(),
                expected: "exactly 1".into(),
                found: 2,
                column: 1,
            })
        );
        assert!(Builtin::Min.call(&[1.0], 3).is_err());
    }

    #[test]
    fn test_fold_order() {
        assert_eq!(Builtin::Max.apply(&[1.0, 5.0, 3.0]), 5.0);
        assert_eq!(Builtin::Min.apply(&[1.0, 5.0, 3.0]), 1.0);
        // NaN never compares greater, so the running value is kept
        assert_eq!(Builtin::Max.apply(&[2.0, f64::NAN]), 2.0);
    }

    #[test]
    fn test_math() {
        assert_relative_eq!(Builtin::Exp.apply(&[1.0]), std::f64::consts::E);
        assert_relative_eq!(Builtin::Log.apply(&[std::f64::consts::E]), 1.0);
        assert_relative_eq!(Builtin::Log10.apply(&[1000.0]), 3.0);
        assert_relative_eq!(Builtin::Cosh.apply(&[0.0]), 1.0);
    }
}
