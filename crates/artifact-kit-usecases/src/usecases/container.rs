//! Type-keyed component registry used for container-mode binding.

use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::common::rwlock_read_or_recover;
use crate::common::rwlock_write_or_recover;
use crate::domain::ConfigurationError;

type Components = HashMap<TypeId, Vec<Box<dyn Any + Send + Sync>>>;

/// Components are keyed by the `Arc<T>` they were registered as, so a
/// fixtures instance is found as `dyn SuiteBinding` only when registered
/// under that trait object type.
#[derive(Default)]
pub struct Container {
    components: RwLock<Components>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: ?Sized + Send + Sync + 'static>(&self, component: Arc<T>) {
        rwlock_write_or_recover(&self.components)
            .entry(TypeId::of::<Arc<T>>())
            .or_default()
            .push(Box::new(component));
    }

    pub fn with<T: ?Sized + Send + Sync + 'static>(self, component: Arc<T>) -> Self {
        self.register(component);
        self
    }

    /// Every component registered as `T`, in registration order.
    pub fn lookup_all<T: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<T>> {
        rwlock_read_or_recover(&self.components)
            .get(&TypeId::of::<Arc<T>>())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.downcast_ref::<Arc<T>>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn lookup_one<T: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Arc<T>, ConfigurationError> {
        match <[Arc<T>; 1]>::try_from(self.lookup_all::<T>()) {
            Ok([component]) => Ok(component),
            Err(found) => Err(ConfigurationError::AmbiguousComponent {
                component: type_name::<T>(),
                found: found.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        rwlock_read_or_recover(&self.components)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct French;

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    #[test]
    fn test_lookup_all_preserves_registration_order() {
        let container = Container::new()
            .with::<dyn Greeter>(Arc::new(English))
            .with::<dyn Greeter>(Arc::new(French));

        let greetings: Vec<String> = container
            .lookup_all::<dyn Greeter>()
            .iter()
            .map(|greeter| greeter.greet())
            .collect();

        assert_eq!(greetings, vec!["hello", "bonjour"]);
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_concrete_and_trait_registrations_are_distinct() {
        let container = Container::new().with(Arc::new(English));
        assert_eq!(container.lookup_all::<English>().len(), 1);
        assert!(container.lookup_all::<dyn Greeter>().is_empty());
    }

    #[test]
    fn test_lookup_one_requires_exactly_one() {
        let container = Container::new();
        assert_eq!(
            container.lookup_one::<dyn Greeter>().err(),
            Some(ConfigurationError::AmbiguousComponent {
                component: type_name::<dyn Greeter>(),
                found: 0
            })
        );

        container.register::<dyn Greeter>(Arc::new(English));
        assert_eq!(
            container.lookup_one::<dyn Greeter>().unwrap().greet(),
            "hello"
        );

        container.register::<dyn Greeter>(Arc::new(French));
        assert!(matches!(
            container.lookup_one::<dyn Greeter>(),
            Err(ConfigurationError::AmbiguousComponent { found: 2, .. })
        ));
    }
}
