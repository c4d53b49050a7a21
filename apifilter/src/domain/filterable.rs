//! Backend target wrapper

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Opaque wrapper around the value filters are applied to
///
/// Backends recognize the wrapped type through [`Filterable::is`] and read it
/// with [`Filterable::downcast_ref`]. Applying a filter never touches the
/// wrapped value; backends build a new `Filterable` instead.
#[derive(Clone)]
pub struct Filterable {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Filterable {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Clone the wrapped value out, if it is a `T`
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Runtime type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both wrappers share the same wrapped instance
    pub fn ptr_eq(&self, other: &Filterable) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Filterable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filterable")
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let filterable = Filterable::new("SELECT * FROM t".to_string());
        assert!(filterable.is::<String>());
        assert!(!filterable.is::<Vec<u8>>());
        assert_eq!(
            filterable.downcast_ref::<String>().map(String::as_str),
            Some("SELECT * FROM t")
        );
        assert_eq!(filterable.cloned::<u32>(), None);
    }

    #[test]
    fn test_type_name() {
        let filterable = Filterable::new(42_i32);
        assert_eq!(filterable.type_name(), "i32");
    }

    #[test]
    fn test_clone_shares_instance() {
        let filterable = Filterable::new(vec![1, 2, 3]);
        let clone = filterable.clone();
        assert!(filterable.ptr_eq(&clone));
        assert!(!filterable.ptr_eq(&Filterable::new(vec![1, 2, 3])));
    }
}
