/// Fixed set of expense tags a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ExpenseCategory {
    #[default]
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Health,
    Education,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive; anything unrecognised lands in `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "food" => Self::Food,
            "transport" | "transportation" => Self::Transport,
            "utilities" | "utility" => Self::Utilities,
            "entertainment" => Self::Entertainment,
            "shopping" => Self::Shopping,
            "health" => Self::Health,
            "education" => Self::Education,
            _ => Self::Other,
        }
    }

    /// Strict lookup for user input, where a typo should be reported rather
    /// than silently filed under `Other`.
    pub fn lookup(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Food,
            Self::Transport,
            Self::Utilities,
            Self::Entertainment,
            Self::Shopping,
            Self::Health,
            Self::Education,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
