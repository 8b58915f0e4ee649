use crate::datatype::DataType;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Read,
    Write,
    Unknown,
}

impl Direction {
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Read => "?",
            Direction::Write => "!",
            Direction::Unknown => "",
        }
    }
}

/// One formal parameter of a procedure. `ChannelEnd::owner` is the name of
/// the procedure the end belongs to, kept purely as a lookup handle back to
/// the containing signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Param {
    Value {
        name: String,
        #[serde(rename = "type")]
        ty: DataType,
    },
    ChannelEnd {
        name: String,
        #[serde(rename = "type")]
        ty: DataType,
        direction: Direction,
        owner: String,
    },
}

impl Param {
    pub fn name(&self) -> &str {
        match self {
            Param::Value { name, .. } | Param::ChannelEnd { name, .. } => name,
        }
    }

    pub fn ty(&self) -> &DataType {
        match self {
            Param::Value { ty, .. } | Param::ChannelEnd { ty, .. } => ty,
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Value { name, ty } => write!(f, "VAL {ty} {name}"),
            Param::ChannelEnd {
                name,
                ty,
                direction,
                ..
            } => write!(f, "CHAN {ty} {name}{}", direction.glyph()),
        }
    }
}

/// Parameter order is declaration order; it is positional call order and
/// must be preserved exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<Param>,
}

impl Display for Procedure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (n, param) in self.params.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub module_name: String,
    pub procedures: Vec<Procedure>,
}
