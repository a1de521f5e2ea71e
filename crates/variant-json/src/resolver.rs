//! Member resolution: which members of a mapped type take part in a call, and
//! under which key.
//!
//! [`resolve_members`] is a pure function of the member table and the options.
//! [`resolve`] memoizes it per `(type, resolution-relevant option bits, direction)`
//! in a process-wide cache, so repeated encodes of the same type skip the walk.

use std::any::TypeId;
use std::sync::{Arc, LazyLock};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::member::{Mapped, Member, MemberKind, Modifier, Visibility};
use crate::options::EncodeOptions;

/// Which half of the mapping engine a resolution is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encode,
    Decode,
}

/// The resolved view of one member for a given configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodableMember {
    /// Declared member name.
    pub name: &'static str,
    /// Object key: the first `Alias`, or the name.
    pub key: &'static str,
    pub kind: MemberKind,
    pub readable: bool,
    pub writable: bool,
    pub force_type_hint: bool,
    pub included: bool,
    /// Position in the type's member table.
    pub(crate) slot: usize,
}

type CacheKey = (TypeId, u8, Direction);

static CACHE: LazyLock<RwLock<AHashMap<CacheKey, Arc<[EncodableMember]>>>> =
    LazyLock::new(|| RwLock::new(AHashMap::new()));

/// Resolve the members of `T`, consulting the process-wide cache first.
pub fn resolve<T: Mapped>(options: EncodeOptions, direction: Direction) -> Arc<[EncodableMember]> {
    let key = (
        TypeId::of::<T>(),
        options.bits() & EncodeOptions::RESOLUTION_MASK,
        direction,
    );

    if let Some(cached) = CACHE.read().get(&key) {
        return Arc::clone(cached);
    }

    trace!(type_name = T::TYPE_NAME, ?options, ?direction, "resolving members");
    let resolved: Arc<[EncodableMember]> = resolve_members(T::members(), options, direction).into();

    // Another thread may have won the race; keep whichever landed first.
    let mut cache = CACHE.write();
    Arc::clone(cache.entry(key).or_insert(resolved))
}

/// Resolve a member table without touching the cache.
///
/// Fields come first, then properties, each in declaration order.
pub fn resolve_members<T>(
    members: &[Member<T>],
    options: EncodeOptions,
    direction: Direction,
) -> Vec<EncodableMember> {
    let fields = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.kind == MemberKind::Field);
    let properties = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.kind == MemberKind::Property);

    fields
        .chain(properties)
        .map(|(slot, member)| resolve_one(slot, member, options, direction))
        .collect()
}

fn resolve_one<T>(
    slot: usize,
    member: &Member<T>,
    options: EncodeOptions,
    direction: Direction,
) -> EncodableMember {
    let public = member.visibility == Visibility::Public;
    let readable = member.readable();
    let writable = member.writable();

    let evaluate_modifiers = match direction {
        Direction::Encode => !options.ignore_modifiers(),
        Direction::Decode => true,
    };

    let mut decision: Option<bool> = None;
    let mut alias: Option<&'static str> = None;
    let mut force_type_hint = false;

    if evaluate_modifiers {
        for modifier in member.modifiers {
            match modifier {
                Modifier::Exclude => {
                    decision = Some(false);
                    break;
                }
                Modifier::Include => decision = Some(true),
                Modifier::Alias(name) => {
                    if alias.is_none() {
                        alias = Some(*name);
                    }
                }
                Modifier::ForceTypeHint => force_type_hint = true,
            }
        }
    }

    let included = match (direction, member.kind) {
        (Direction::Encode, MemberKind::Field) => {
            readable && decision.unwrap_or(public || options.encode_private())
        }
        (Direction::Encode, MemberKind::Property) => {
            evaluate_modifiers
                && readable
                && decision.unwrap_or(public && options.include_public_properties())
        }
        (Direction::Decode, MemberKind::Field) => writable && decision.unwrap_or(public),
        (Direction::Decode, MemberKind::Property) => writable && decision == Some(true),
    };

    EncodableMember {
        name: member.name,
        key: alias.unwrap_or(member.name),
        kind: member.kind,
        readable,
        writable,
        force_type_hint,
        included,
        slot,
    }
}
