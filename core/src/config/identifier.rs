//! Part identifiers with their sentinel values decoded

use super::Value;

/// A part identifier as stored in a configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// A specific part.
    Explicit(String),
    /// Let the application choose.
    Auto,
    /// Nothing is attached.
    None,
    /// Inherit from the next layer.
    Default,
}

impl Identifier {
    const AUTO: &'static str = "auto";
    const NONE: &'static str = "none";
    const DEFAULT: &'static str = "default";

    pub fn parse(s: &str) -> Self {
        match s {
            Self::AUTO => Identifier::Auto,
            Self::NONE => Identifier::None,
            Self::DEFAULT => Identifier::Default,
            other => Identifier::Explicit(other.to_string()),
        }
    }

    /// Decode a stored value. Non-string values carry no identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(Identifier::parse)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Explicit(id) => id,
            Identifier::Auto => Self::AUTO,
            Identifier::None => Self::NONE,
            Identifier::Default => Self::DEFAULT,
        }
    }

    pub fn explicit(&self) -> Option<&str> {
        match self {
            Identifier::Explicit(id) => Some(id),
            _ => None,
        }
    }
}

impl From<&Identifier> for Value {
    fn from(identifier: &Identifier) -> Self {
        Value::String(identifier.as_str().to_string())
    }
}

impl From<Identifier> for Value {
    fn from(identifier: Identifier) -> Self {
        Value::from(&identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::Identifier;

    #[test]
    fn sentinels_decode() {
        assert_eq!(Identifier::parse("auto"), Identifier::Auto);
        assert_eq!(Identifier::parse("none"), Identifier::None);
        assert_eq!(Identifier::parse("default"), Identifier::Default);
        assert_eq!(
            Identifier::parse("1541"),
            Identifier::Explicit("1541".to_string())
        );
    }

    #[test]
    fn sentinels_encode() {
        for s in ["auto", "none", "default", "Competition Pro"] {
            assert_eq!(Identifier::parse(s).as_str(), s);
        }
    }
}
