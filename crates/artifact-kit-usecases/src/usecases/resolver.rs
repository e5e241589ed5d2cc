//! Suite and test-case resolution from class and method metadata.

use crate::domain::ClassMetadata;
use crate::domain::ConfigurationError;
use crate::domain::MethodMetadata;
use crate::domain::Suite;

/// Without a suite declaration the suite is the class name. With one, the
/// prefix is used as is or joined with the class name.
pub fn resolve_suite(class: &ClassMetadata) -> Result<String, ConfigurationError> {
    let Some(spec) = &class.suite else {
        return Ok(class.name.clone());
    };
    if spec.value.trim().is_empty() {
        return Err(ConfigurationError::BlankSuite {
            class: class.name.clone(),
        });
    }
    let suite = if spec.append_class_name {
        Suite::nested(&spec.value, &class.name)
    } else {
        Suite::new(spec.value.as_str()).ok_or_else(|| ConfigurationError::BlankSuite {
            class: class.name.clone(),
        })?
    };
    Ok(suite.into_inner())
}

/// Explicit test-case override verbatim, else the method name.
pub fn resolve_test_case(method: &MethodMetadata) -> String {
    method
        .test_case
        .clone()
        .unwrap_or_else(|| method.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SuiteSpec;
    use proptest::prelude::*;

    #[test]
    fn test_default_suite_is_class_name() {
        let class = ClassMetadata::new("SampleTest");
        assert_eq!(resolve_suite(&class).unwrap(), "SampleTest");
    }

    #[test]
    fn test_prefix_joined_with_class_name() {
        let class = ClassMetadata::new("SampleTest").suite(SuiteSpec::new("plain"));
        assert_eq!(resolve_suite(&class).unwrap(), "plain/SampleTest");
    }

    #[test]
    fn test_prefix_used_alone() {
        let class = ClassMetadata::new("SampleTest")
            .suite(SuiteSpec::new("service/impl").append_class_name(false));
        assert_eq!(resolve_suite(&class).unwrap(), "service/impl");
    }

    #[test]
    fn test_blank_prefix_is_configuration_error() {
        let class = ClassMetadata::new("InvalidUsageTest").suite(SuiteSpec::new("  "));
        let err = resolve_suite(&class).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::BlankSuite {
                class: "InvalidUsageTest".to_string()
            }
        );
        assert!(err.to_string().contains("cannot be blank"));
    }

    #[test]
    fn test_test_case_override_is_verbatim() {
        let method = MethodMetadata::test("shouldReadInput").test_case("custom case");
        assert_eq!(resolve_test_case(&method), "custom case");
        assert_eq!(
            resolve_test_case(&MethodMetadata::test("shouldReadInput")),
            "shouldReadInput"
        );
    }

    proptest! {
        #[test]
        fn prop_suite_ends_with_class_when_appended(
            prefix in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
            class in "[A-Z][A-Za-z]{0,12}",
        ) {
            let metadata = ClassMetadata::new(class.clone()).suite(SuiteSpec::new(prefix.clone()));
            let suite = resolve_suite(&metadata).unwrap();
            prop_assert_eq!(suite, format!("{prefix}/{class}"));
        }
    }
}
