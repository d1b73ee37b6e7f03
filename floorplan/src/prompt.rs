//! Prompt rendering for extraction and update requests.

/// A prompt to send to the model, before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// Extract a floor plan from a description.
    Extraction {
        /// Free-text description of the layout.
        description: &'a str,
    },

    /// Revise an existing floor plan with an additional description.
    Update {
        /// Serialized form of the current floor plan.
        existing: &'a str,
        /// Additional free-text description.
        description: &'a str,
    },
}

impl Prompt<'_> {
    /// Short name used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Prompt::Extraction { .. } => "extraction",
            Prompt::Update { .. } => "update",
        }
    }

    /// Renders the full prompt text around the given format instructions.
    ///
    /// # Examples
    ///
    /// ```
    /// use floorplan::prompt::Prompt;
    ///
    /// let text = Prompt::Extraction { description: "One bedroom." }.render("<schema>");
    /// assert!(text.contains("text: One bedroom."));
    /// assert!(text.ends_with("Please provide the JSON content only.\n"));
    /// ```
    pub fn render(&self, format_instructions: &str) -> String {
        match self {
            Prompt::Extraction { description } => format!(
                "For the following text, identify and extract information about each room \
                 in the floor plan. Output using the following format:\n\
                 \n\
                 text: {description}\n\
                 \n\
                 {format_instructions}\n\
                 \n\
                 Please provide the JSON content only.\n"
            ),
            Prompt::Update {
                existing,
                description,
            } => format!(
                "Given the existing floor plan and the following additional description, \
                 update the floor plan accordingly. Output using the following format:\n\
                 \n\
                 Existing floor plan:\n\
                 {existing}\n\
                 \n\
                 Additional description:\n\
                 {description}\n\
                 \n\
                 {format_instructions}\n\
                 \n\
                 Ensure the updated floor plan maintains all previous details unless \
                 explicitly modified by the new description. \
                 Please provide the JSON content only.\n"
            ),
        }
    }
}
