use std::any::TypeId;

/// Boxed error for suppliers that have no error type of their own
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Proxies may be handed to other threads and live for the rest of the program,
/// so anything that is resolved needs to be Send + Sync + 'static
pub trait Shared: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Shared for T {}

/// Type Name and Type Id
///
/// Used to label resolvers and proxies in logs and panic messages
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Same type, with a caller chosen name
    pub fn named(self, type_name: &'static str) -> TypeInfo {
        TypeInfo { type_name, ..self }
    }
}
