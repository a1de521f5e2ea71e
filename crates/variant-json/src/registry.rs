//! Process-wide registry from `@type` names to constructors.
//!
//! Rust has no runtime type lookup, so every mapped type that may appear behind
//! a type hint is registered once, usually at startup. A registration records
//! which targets the type can be decoded into: itself, plus any base declared
//! with [`register_as`] (typically a `Box<dyn Trait>`).

use std::any::{Any, TypeId};
use std::sync::{Arc, LazyLock};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::decoder::decode_members;
use crate::error::DecodeError;
use crate::member::Mapped;
use crate::variant::Variant;

type Constructor<B> = Arc<dyn Fn(&Variant) -> Result<B, DecodeError> + Send + Sync>;

struct TypeEntry {
    type_id: TypeId,
    rust_type: &'static str,
    /// `Constructor<B>` per target `B`, type-erased.
    targets: AHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

static REGISTRY: LazyLock<RwLock<AHashMap<&'static str, TypeEntry>>> =
    LazyLock::new(|| RwLock::new(AHashMap::new()));

/// Make `T` resolvable from its [`TYPE_NAME`](Mapped::TYPE_NAME).
pub fn register<T: Mapped>() {
    let constructor: Constructor<T> = Arc::new(decode_members::<T>);
    insert::<T, T>(constructor);
}

/// Make `T` resolvable from its type name and decodable into the base `B`.
///
/// ```
/// use variant_json::{decode_polymorphic, field, load, object_codec, register_as, Mapped, Member};
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Default)]
/// struct Square {
///     side: f64,
/// }
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.side * self.side
///     }
/// }
///
/// impl Mapped for Square {
///     const TYPE_NAME: &'static str = "shapes.Square";
///     fn members() -> &'static [Member<Self>] {
///         const MEMBERS: &[Member<Square>] = &[field!(Square, side)];
///         MEMBERS
///     }
/// }
/// object_codec!(Square);
///
/// register_as::<Box<dyn Shape>, Square>(|square| Box::new(square) as Box<dyn Shape>);
///
/// let variant = load(r#"{"@type":"shapes.Square","side":3}"#).unwrap();
/// let shape: Box<dyn Shape> = decode_polymorphic(&variant, "Shape").unwrap();
/// assert_eq!(shape.area(), 9.0);
/// ```
pub fn register_as<B: 'static, T: Mapped>(upcast: fn(T) -> B) {
    register::<T>();
    let constructor: Constructor<B> =
        Arc::new(move |variant: &Variant| decode_members::<T>(variant).map(upcast));
    insert::<B, T>(constructor);
}

/// Whether a type has been registered under `name`.
pub fn is_registered(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// The Rust type that owns `name`, if any.
pub fn registered_type(name: &str) -> Option<&'static str> {
    REGISTRY.read().get(name).map(|entry| entry.rust_type)
}

fn insert<B: 'static, T: Mapped>(constructor: Constructor<B>) {
    let mut registry = REGISTRY.write();
    let entry = registry.entry(T::TYPE_NAME).or_insert_with(|| {
        debug!(type_name = T::TYPE_NAME, "registered type");
        TypeEntry {
            type_id: TypeId::of::<T>(),
            rust_type: std::any::type_name::<T>(),
            targets: AHashMap::new(),
        }
    });

    if entry.type_id != TypeId::of::<T>() {
        warn!(
            type_name = T::TYPE_NAME,
            rust_type = std::any::type_name::<T>(),
            kept = entry.rust_type,
            "type name already registered by another type, keeping the first"
        );
        return;
    }

    entry
        .targets
        .entry(TypeId::of::<B>())
        .or_insert_with(|| Arc::new(constructor) as Arc<dyn Any + Send + Sync>);
}

/// Decode `variant` as the type registered under `hint`, converted into `B`.
pub(crate) fn construct<B: 'static>(
    hint: &str,
    variant: &Variant,
    target: &'static str,
) -> Result<B, DecodeError> {
    let constructor = {
        let registry = REGISTRY.read();
        let entry = registry.get(hint).ok_or_else(|| DecodeError::UnknownTypeHint {
            hint: hint.to_string(),
        })?;
        entry
            .targets
            .get(&TypeId::of::<B>())
            .and_then(|erased| erased.downcast_ref::<Constructor<B>>())
            .cloned()
            .ok_or_else(|| DecodeError::TypeHintNotAssignable {
                hint: hint.to_string(),
                target,
            })?
    };

    debug!(hint, target, "resolved type hint");
    constructor(variant)
}
