//! ARIA relationship attributes
//!
//! The id-reference attributes kept in sync across shadow boundaries.

use std::fmt;
use std::str::FromStr;

use crate::{A11yError, Result};

/// ARIA relationship kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRelation {
    LabelledBy,
    DescribedBy,
    Controls,
    Details,
    ActiveDescendant,
}

impl AriaRelation {
    pub const ALL: [AriaRelation; 5] = [
        Self::LabelledBy,
        Self::DescribedBy,
        Self::Controls,
        Self::Details,
        Self::ActiveDescendant,
    ];

    /// Parse an attribute name such as `aria-labelledby`
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|relation| relation.attribute_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| A11yError::UnsupportedAttribute {
                attribute: name.to_string(),
                valid: Self::ALL.map(Self::attribute_name).join(", "),
            })
    }

    pub fn attribute_name(self) -> &'static str {
        match self {
            Self::LabelledBy => "aria-labelledby",
            Self::DescribedBy => "aria-describedby",
            Self::Controls => "aria-controls",
            Self::Details => "aria-details",
            Self::ActiveDescendant => "aria-activedescendant",
        }
    }

    /// Reflects to a single element rather than an element list
    pub fn is_single_element(self) -> bool {
        self == Self::ActiveDescendant
    }
}

impl FromStr for AriaRelation {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AriaRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}
