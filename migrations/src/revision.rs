use core::fmt;

/// Identifier of one historical version of a script.
///
/// Only its string form matters: it is appended to file names and passed to
/// the source-control client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Revision {
    Number(u64),
    Label(String),
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Number(n) => write!(f, "{n}"),
            Revision::Label(label) => f.write_str(label),
        }
    }
}

impl From<u64> for Revision {
    fn from(n: u64) -> Self {
        Revision::Number(n)
    }
}

impl From<u32> for Revision {
    fn from(n: u32) -> Self {
        Revision::Number(n.into())
    }
}

impl From<&str> for Revision {
    fn from(label: &str) -> Self {
        Revision::Label(label.to_string())
    }
}

impl From<String> for Revision {
    fn from(label: String) -> Self {
        Revision::Label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_labels_stringify_verbatim() {
        assert_eq!(Revision::from(1042u64).to_string(), "1042");
        assert_eq!(Revision::from(7u32).to_string(), "7");
        assert_eq!(Revision::from("HEAD").to_string(), "HEAD");
    }
}
