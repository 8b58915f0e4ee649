use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An occam data type: a scalar name with zero or more array dimensions.
/// `Array` nests, so `[][]BYTE` is `Array(Array(Scalar("BYTE")))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DataType {
    Scalar(String),
    Array(Box<DataType>),
}

impl DataType {
    pub fn scalar(name: impl Into<String>) -> Self {
        DataType::Scalar(name.into())
    }

    /// Adds one dimension over `element`. The element is moved in, never
    /// rewritten, so composing arrays always produces a fresh type.
    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    /// Parses declaration text such as `[][]INT`: surrounding whitespace is
    /// trimmed, then one `[]` is peeled per dimension.
    pub fn from_decl(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.strip_prefix("[]") {
            Some(rest) => DataType::array(DataType::from_decl(rest)),
            None => DataType::Scalar(trimmed.to_string()),
        }
    }

    /// Canonical name, one `[]` prefix per dimension.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn element(&self) -> Option<&DataType> {
        match self {
            DataType::Array(element) => Some(element),
            DataType::Scalar(_) => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Scalar(name) => write!(f, "{name}"),
            DataType::Array(element) => write!(f, "[]{element}"),
        }
    }
}

impl From<DataType> for String {
    fn from(ty: DataType) -> String {
        ty.name()
    }
}

impl From<String> for DataType {
    fn from(name: String) -> DataType {
        DataType::from_decl(&name)
    }
}
