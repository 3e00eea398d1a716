use std::fmt;

/// A reason why an axiom is not a sound definition.
/// Variables are reported by name, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionError {
    /// The root of the axiom is not one of the equality connectives.
    /// No other check runs after this one.
    NotEquality,

    /// An axiom between the defined symbol and its definition already uses the symbol.
    ForwardUse { statement: String },

    /// Parameters of the definiendum that are required to be distinct.
    DistinctParameters { variables: Vec<String> },

    /// Dummy variables without the distinct variable conditions they need.
    /// Each group is one "$d" statement that would fix it.
    MissingDistinct { groups: Vec<Vec<String>> },

    /// A dummy variable that isn't a set variable, when there was no justification theorem.
    /// No other dummy is checked after this one.
    NonSetDummy { variable: String },

    /// Dummy variables that could not be shown to be bound in the definiens.
    UnboundDummies { variables: Vec<String> },
}

impl DefinitionError {
    pub fn code(&self) -> &'static str {
        match self {
            DefinitionError::NotEquality => "I-PA-0201",
            DefinitionError::ForwardUse { .. } => "I-PA-0202",
            DefinitionError::DistinctParameters { .. } => "I-PA-0203",
            DefinitionError::MissingDistinct { .. } => "I-PA-0204",
            DefinitionError::NonSetDummy { .. } => "I-PA-0205",
            DefinitionError::UnboundDummies { .. } => "I-PA-0206",
        }
    }

    /// The full message for the definition with this label.
    pub fn message(&self, label: &str) -> String {
        format!(
            "{} Axiom {} has failed the definitional soundness check. {}",
            self.code(),
            label,
            self
        )
    }
}

/// Renders a group as a "$d" statement.
pub fn distinct_statement(group: &[String]) -> String {
    format!("$d {} $.", group.join(" "))
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DefinitionError::NotEquality => {
                write!(f, "The root symbol is not an equality or a biconditional.")
            }
            DefinitionError::ForwardUse { statement } => write!(
                f,
                "The previous axiom {} uses the symbol being defined in this axiom.",
                statement
            ),
            DefinitionError::DistinctParameters { variables } => write!(
                f,
                "Variables [{}] in the definiendum are required NOT to be distinct.",
                variables.join(", ")
            ),
            DefinitionError::MissingDistinct { groups } => {
                write!(
                    f,
                    "All dummy variables in the definiens are required to be distinct from each \
                     other and from variables in the definiendum. \
                     The following DJ conditions need to be added:"
                )?;
                for group in groups {
                    write!(f, "\n  {}", distinct_statement(group))?;
                }
                Ok(())
            }
            DefinitionError::NonSetDummy { variable } => write!(
                f,
                "Non-set dummy variable {} found, and no justification theorem is available.",
                variable
            ),
            DefinitionError::UnboundDummies { variables } => write!(
                f,
                "Dummy variables [{}] are possibly free in the definiens, \
                 and no justification is available.",
                variables.join(", ")
            ),
        }
    }
}
