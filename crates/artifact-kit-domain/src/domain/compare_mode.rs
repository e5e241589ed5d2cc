use std::fmt;
use std::str::FromStr;

/// How an actual JSON document is compared with an expected fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompareMode {
    /// Both documents carry the same keys with equal values.
    #[default]
    Exact,
    /// Every expected key is present with an equal value; the actual
    /// document may carry extra keys.
    Lenient,
}

impl CompareMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareMode::Exact => "exact",
            CompareMode::Lenient => "lenient",
        }
    }

    pub fn allows_extra_keys(self) -> bool {
        matches!(self, CompareMode::Lenient)
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" | "strict" | "non_extensible" => Ok(CompareMode::Exact),
            "lenient" => Ok(CompareMode::Lenient),
            other => Err(format!("unknown compare mode '{other}'")),
        }
    }
}
