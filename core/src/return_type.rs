//! Return type resolution.
//!
//! # Design
//! A method declares the shape of what it returns as a [`TypeShape`] tree:
//! a concrete element type, or a named generic wrapping other shapes
//! (`RestResponse<List<Widget>>`). The payload decoded from a response body is
//! always the innermost element type; lists are recognised from the body
//! itself, not from the declaration. Resolution walks single-argument
//! generics downwards and gives up with [`ElementType::Unknown`] on anything
//! with zero or several arguments.

use std::any::{type_name, TypeId};

use serde_json::Value;
use tracing::warn;

/// Deepest generic nesting the resolver will walk.
pub const MAX_DEPTH: usize = 8;

/// Declared return type of an api method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Scalar(ElementType),
    Generic {
        name: &'static str,
        args: Vec<TypeShape>,
    },
}

impl TypeShape {
    pub fn of<T: 'static>() -> Self {
        TypeShape::Scalar(ElementType::of::<T>())
    }

    pub fn list_of(inner: TypeShape) -> Self {
        TypeShape::Generic {
            name: "List",
            args: vec![inner],
        }
    }

    pub fn wrapper(name: &'static str, inner: TypeShape) -> Self {
        TypeShape::Generic {
            name,
            args: vec![inner],
        }
    }

    pub fn generic(name: &'static str, args: Vec<TypeShape>) -> Self {
        TypeShape::Generic { name, args }
    }
}

/// The concrete type a response body decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Named { name: &'static str, id: TypeId },
    /// Resolution gave up; payloads decode as untyped JSON.
    Unknown,
}

impl ElementType {
    pub fn of<T: 'static>() -> Self {
        ElementType::Named {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Named { name, .. } => *name,
            ElementType::Unknown => "unknown",
        }
    }

    /// Whether a payload of this element type may be decoded as `T`.
    ///
    /// Untyped JSON is always accepted.
    pub fn accepts<T: 'static>(&self) -> bool {
        let requested = TypeId::of::<T>();
        if requested == TypeId::of::<Value>() {
            return true;
        }
        matches!(self, ElementType::Named { id, .. } if *id == requested)
    }
}

/// Resolve the element type of a declared return shape.
pub fn resolve_element_type(shape: &TypeShape) -> ElementType {
    let mut current = shape;
    for _ in 0..=MAX_DEPTH {
        match current {
            TypeShape::Scalar(element) => return *element,
            TypeShape::Generic { args, .. } if args.len() == 1 => current = &args[0],
            TypeShape::Generic { .. } => return ElementType::Unknown,
        }
    }
    warn!(max_depth = MAX_DEPTH, "return type nests too deeply, treating as unknown");
    ElementType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget;

    #[test]
    fn scalar_resolves_to_itself() {
        assert_eq!(resolve_element_type(&TypeShape::of::<Widget>()), ElementType::of::<Widget>());
    }

    #[test]
    fn list_resolves_to_element() {
        let shape = TypeShape::list_of(TypeShape::of::<Widget>());
        assert_eq!(resolve_element_type(&shape), ElementType::of::<Widget>());
    }

    #[test]
    fn wrapper_resolves_to_element() {
        let shape = TypeShape::wrapper("Wrapper", TypeShape::of::<Widget>());
        assert_eq!(resolve_element_type(&shape), ElementType::of::<Widget>());
    }

    #[test]
    fn nested_wrapping_unwraps_recursively() {
        let shape = TypeShape::wrapper(
            "RestResponse",
            TypeShape::list_of(TypeShape::of::<Widget>()),
        );
        assert_eq!(resolve_element_type(&shape), ElementType::of::<Widget>());
    }

    #[test]
    fn multi_argument_generic_is_unknown() {
        let shape = TypeShape::generic("Map", vec![TypeShape::of::<String>(), TypeShape::of::<Widget>()]);
        assert_eq!(resolve_element_type(&shape), ElementType::Unknown);
    }

    #[test]
    fn zero_argument_generic_is_unknown() {
        let shape = TypeShape::wrapper("RestResponse", TypeShape::generic("Raw", Vec::new()));
        assert_eq!(resolve_element_type(&shape), ElementType::Unknown);
    }

    #[test]
    fn excessive_nesting_is_unknown() {
        let mut shape = TypeShape::of::<Widget>();
        for _ in 0..=MAX_DEPTH {
            shape = TypeShape::list_of(shape);
        }
        assert_eq!(resolve_element_type(&shape), ElementType::Unknown);

        let mut shape = TypeShape::of::<Widget>();
        for _ in 0..MAX_DEPTH {
            shape = TypeShape::list_of(shape);
        }
        assert_eq!(resolve_element_type(&shape), ElementType::of::<Widget>());
    }

    #[test]
    fn accepts_matching_type_and_untyped_json() {
        let element = ElementType::of::<Widget>();
        assert!(element.accepts::<Widget>());
        assert!(element.accepts::<Value>());
        assert!(!element.accepts::<String>());
        assert!(ElementType::Unknown.accepts::<Value>());
        assert!(!ElementType::Unknown.accepts::<Widget>());
    }
}
