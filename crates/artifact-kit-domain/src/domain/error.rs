use thiserror::Error;

/// Misuse of the binding protocol. Always fatal to the current test.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(
        "suite value cannot be blank - provide a non-blank value or remove the suite declaration to use the default suite name ({class})"
    )]
    BlankSuite { class: String },
    #[error(
        "fixed clock must be enabled at the class level - it cannot be used solely on the method level ({class})"
    )]
    MethodOnlyFixedClock { class: String },
    #[error("invalid fixed clock instant '{value}': {reason}")]
    InvalidInstant { value: String, reason: String },
    #[error("fixed clock requested but no freezable clock is bound")]
    MissingClock,
    #[error("expected exactly one fixture binding target, found {found}")]
    AmbiguousBindingTarget { found: usize },
    #[error("expected exactly one mock server, found {found}")]
    AmbiguousMockServer { found: usize },
    #[error("expected exactly one {component} in the container, found {found}")]
    AmbiguousComponent {
        component: &'static str,
        found: usize,
    },
    #[error("type descriptor has been constructed without actual type info ({raw})")]
    RawTypeDescriptor { raw: String },
    #[error("invalid type descriptor '{text}': {reason}")]
    InvalidTypeDescriptor { text: String, reason: String },
    #[error(
        "enqueued response on '{method}' must specify either a type or an artifact name (when both are defined, the artifact name is ignored)"
    )]
    InvalidEnqueue { method: String },
    #[error("lifecycle step '{step}' is not allowed in state {state}")]
    InvalidLifecycle {
        step: &'static str,
        state: &'static str,
    },
}

impl ConfigurationError {
    pub fn suggestion(&self) -> String {
        match self {
            ConfigurationError::BlankSuite { class } => format!(
                "Give the suite a non-blank prefix, or drop it so the suite defaults to '{class}'."
            ),
            ConfigurationError::MethodOnlyFixedClock { .. } => {
                "Declare a fixed clock on the class; methods may only override its instant."
                    .to_string()
            }
            ConfigurationError::InvalidInstant { .. } => {
                "Use an RFC 3339 instant such as 2025-01-10T12:30:15.123Z.".to_string()
            }
            ConfigurationError::MissingClock => {
                "Register a freezable clock in the container or the direct bindings.".to_string()
            }
            ConfigurationError::AmbiguousBindingTarget { found: 0 } => {
                "Register the test's fixtures with DirectBindings::builder().fixtures(..)."
                    .to_string()
            }
            ConfigurationError::AmbiguousBindingTarget { .. } => {
                "Direct binding supports a single fixtures instance; use a container for several."
                    .to_string()
            }
            ConfigurationError::AmbiguousMockServer { .. } => {
                "Register exactly one mock server for tests that use one.".to_string()
            }
            ConfigurationError::AmbiguousComponent { component, .. } => {
                format!("Register exactly one {component} in the container.")
            }
            ConfigurationError::RawTypeDescriptor { .. } => {
                "Supply the generic arguments, or use TypeDescriptor::plain for non-generic types."
                    .to_string()
            }
            ConfigurationError::InvalidTypeDescriptor { .. } => {
                "Check the type text for balanced '<' '>' and valid identifiers.".to_string()
            }
            ConfigurationError::InvalidEnqueue { .. } => {
                "Set either a response type or an artifact name on the enqueued response."
                    .to_string()
            }
            ConfigurationError::InvalidLifecycle { .. } => {
                "Call post_process_instance once, then before_each/after_each around every test."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_suite_message_names_class() {
        let err = ConfigurationError::BlankSuite {
            class: "InvalidUsageTest".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("cannot be blank"));
        assert!(message.ends_with("(InvalidUsageTest)"));
        assert!(err.suggestion().contains("InvalidUsageTest"));
    }

    #[test]
    fn test_binding_target_suggestion_depends_on_count() {
        let none = ConfigurationError::AmbiguousBindingTarget { found: 0 };
        let many = ConfigurationError::AmbiguousBindingTarget { found: 2 };
        assert_ne!(none.suggestion(), many.suggestion());
        assert_eq!(
            many.to_string(),
            "expected exactly one fixture binding target, found 2"
        );
    }
}
