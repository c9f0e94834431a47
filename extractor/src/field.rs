/// Raw outcome of reading one field from a review page.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// No node for the field was rendered.
    Missing,
    /// A node was present but its text did not parse; holds the text.
    Malformed(String),
    Value(T),
}

impl<T> Field<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// A value, or non-blank text that failed to parse. An empty node does
    /// not count.
    pub fn has_reading(&self) -> bool {
        match self {
            Self::Value(_) => true,
            Self::Malformed(text) => !text.trim().is_empty(),
            Self::Missing => false,
        }
    }

    /// Try a fallback source when this one produced no value.
    ///
    /// A `Malformed` reading is kept over a later `Missing` so the bad text
    /// still reaches the diagnostics.
    pub fn or_else(self, fallback: impl FnOnce() -> Field<T>) -> Field<T> {
        if self.is_value() {
            return self;
        }
        let next = fallback();
        match (&self, &next) {
            (_, Field::Value(_)) => next,
            (Field::Malformed(_), _) => self,
            _ => next,
        }
    }

    /// Parse trimmed node text, mapping parse failure to `Malformed`.
    pub fn parse_text(text: Option<String>, parse: impl FnOnce(&str) -> Option<T>) -> Field<T> {
        match text {
            None => Field::Missing,
            Some(raw) => {
                let trimmed = raw.trim();
                match parse(trimmed) {
                    Some(v) => Field::Value(v),
                    None => Field::Malformed(trimmed.to_string()),
                }
            }
        }
    }
}
