use serde::{Serialize, Serializer};

/// One value read from a tool's output.
///
/// `Absent` means the source did not report it (or it was unparsable).
/// `Restricted` means the source could not be read for lack of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    Known(T),
    Absent,
    Restricted,
}

impl<T> Field<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Field::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Field::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Known(v) => Field::Known(v),
            Field::Absent => Field::Absent,
            Field::Restricted => Field::Restricted,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Known(v) => Field::Known(f(v)),
            Field::Absent => Field::Absent,
            Field::Restricted => Field::Restricted,
        }
    }

    /// Like `map`, but a `None` from `f` demotes the value to `Absent`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Field<U> {
        match self {
            Field::Known(v) => f(v).map_or(Field::Absent, Field::Known),
            Field::Absent => Field::Absent,
            Field::Restricted => Field::Restricted,
        }
    }

    /// Try `other` when this field is `Absent`. `Restricted` is kept.
    pub fn or_else(self, other: impl FnOnce() -> Field<T>) -> Field<T> {
        match self {
            Field::Absent => other(),
            f => f,
        }
    }

    /// Replace an unknown value with a weaker source's value, if it has one.
    pub fn or_fallback(self, fallback: Option<T>) -> Field<T> {
        match (self, fallback) {
            (Field::Known(v), _) => Field::Known(v),
            (_, Some(v)) => Field::Known(v),
            (f, None) => f,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Field::Absent, Field::Known)
    }
}

/// Known values serialize as themselves, `Absent` as null, `Restricted` as
/// the string "restricted".
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Known(v) => v.serialize(s),
            Field::Absent => s.serialize_none(),
            Field::Restricted => s.serialize_str("restricted"),
        }
    }
}
