//! String-typed references between derived input types

/// Defines basic string conversion functionality for a string wrapper.
macro_rules! def_string_conversions {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> $ty {
                $ty(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> $ty {
                $ty(value)
            }
        }
    };
}

/// The type of an input field as written in SDL, e.g. `[StringFilter]!`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputValueType(String);

def_string_conversions!(InputValueType);

impl InputValueType {
    #[must_use]
    pub fn list(self) -> InputValueType {
        InputValueType(format!("[{}]", self.0))
    }

    #[must_use]
    pub fn non_null(self) -> InputValueType {
        InputValueType(format!("{}!", self.0))
    }

    /// The named type inside the NonNull and List wrappers.
    pub fn named_type(&self) -> &str {
        named_type_from_type_str(&self.0)
    }

    pub fn is_non_null(&self) -> bool {
        self.0.ends_with('!')
    }
}

fn named_type_from_type_str(meta: &str) -> &str {
    if let Some(nested) = meta.strip_suffix('!') {
        return named_type_from_type_str(nested);
    }

    match meta.strip_prefix('[').and_then(|nested| nested.strip_suffix(']')) {
        Some(nested) => named_type_from_type_str(nested),
        None => meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_type() {
        let named = |s: &str| InputValueType::from(s).named_type().to_string();
        assert_eq!(named("String"), "String");
        assert_eq!(named("String!"), "String");
        assert_eq!(named("[String]!"), "String");
        assert_eq!(named("[String!]"), "String");
        assert_eq!(named("[[ObjectFilterType!]]!"), "ObjectFilterType");
    }

    #[test]
    fn test_wrapping() {
        let ty = InputValueType::from("Int").non_null().list().non_null();
        assert_eq!(ty.as_str(), "[Int!]!");
        assert!(ty.is_non_null());
        assert!(!InputValueType::from("[Int!]").is_non_null());
    }
}
