/// Configuration options for reading and rendering presentations.
///
/// Use [`ParserConfig::builder()`] to create a configuration instance.
/// This allows you to customize only the desired fields while falling back to sensible defaults for the rest.
///
/// # Configuration Options
///
/// | Parameter | Type | Default | Description |
/// |-----------|------|---------|-------------|
/// | `include_notes` | `bool` | `true` | Whether speaker notes are read and appended to each slide |
/// | `max_group_depth` | `usize` | `32` | How many levels of nested group shapes are descended into |
///
/// # Example
///
/// ```
/// use slides_to_md::ParserConfig;
///
/// let config = ParserConfig::builder()
///     .include_notes(false)
///     .max_group_depth(8)
///     .build();
///
/// assert!(!config.include_notes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub include_notes: bool,
    pub max_group_depth: usize,
}

pub(crate) const DEFAULT_MAX_GROUP_DEPTH: usize = 32;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_notes: true,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }
}

/// Builder for [`ParserConfig`].
///
/// Allows setting individual configuration fields while falling back to defaults for any unspecified values
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    include_notes: Option<bool>,
    max_group_depth: Option<usize>,
}

impl ParserConfigBuilder {
    /// Sets whether speaker notes are read from the package and rendered.
    pub fn include_notes(mut self, value: bool) -> Self {
        self.include_notes = Some(value);
        self
    }

    /// Sets the deepest level of group nesting that is still traversed.
    pub fn max_group_depth(mut self, value: usize) -> Self {
        self.max_group_depth = Some(value);
        self
    }

    /// Builds the final [`ParserConfig`] instance, applying default values for any fields that were not set.
    pub fn build(self) -> ParserConfig {
        ParserConfig {
            include_notes: self.include_notes.unwrap_or(true),
            max_group_depth: self.max_group_depth.unwrap_or(DEFAULT_MAX_GROUP_DEPTH),
        }
    }
}
