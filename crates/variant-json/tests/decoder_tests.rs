/// Decoder contract tests: coercions, null defaults, containers, enums,
/// member modifiers, properties, hooks, type hints and error context.
mod common;

use std::collections::{BTreeSet, HashMap, VecDeque};

use variant_json::{
    can_be_multi_rank_array, decode, field, from_str, load, object_codec, AfterDecode,
    DecodeError, Error, Mapped, Member, MultiArray, Variant,
};

use common::{register_animals, Account, Animal, Color, Person, Settings, Team};

fn parse(text: &str) -> Variant {
    load(text).unwrap()
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_integers_from_numbers() {
    assert_eq!(decode::<i32>(&parse("42")).unwrap(), 42);
    assert_eq!(decode::<i64>(&parse("-7")).unwrap(), -7);
    assert_eq!(decode::<u64>(&parse("18446744073709551615")).unwrap(), u64::MAX);
}

#[test]
fn decode_integers_round_half_to_even() {
    assert_eq!(decode::<i32>(&parse("2.5")).unwrap(), 2);
    assert_eq!(decode::<i32>(&parse("3.5")).unwrap(), 4);
    assert_eq!(decode::<i32>(&parse("-1.5")).unwrap(), -2);
}

#[test]
fn decode_integers_from_strings_and_booleans() {
    assert_eq!(decode::<i32>(&Variant::from("42")).unwrap(), 42);
    assert_eq!(decode::<u8>(&Variant::from(true)).unwrap(), 1);
}

#[test]
fn decode_integer_out_of_range_fails() {
    let err = decode::<u8>(&parse("300")).unwrap_err();
    assert!(matches!(err, DecodeError::Conversion { target: "u8", .. }));

    let err = decode::<u32>(&parse("-1")).unwrap_err();
    assert!(matches!(err, DecodeError::Conversion { target: "u32", .. }));
}

#[test]
fn decode_floats() {
    assert_eq!(decode::<f64>(&parse("3.14")).unwrap(), 3.14);
    assert_eq!(decode::<f64>(&parse("1e-30")).unwrap(), 1e-30);
    assert_eq!(decode::<f32>(&Variant::from("2.5")).unwrap(), 2.5);
}

#[test]
fn decode_booleans() {
    assert!(decode::<bool>(&parse("true")).unwrap());
    assert!(decode::<bool>(&parse("1")).unwrap());
    assert!(!decode::<bool>(&Variant::from("False")).unwrap());
    assert!(decode::<bool>(&Variant::from("maybe")).is_err());
}

#[test]
fn decode_strings_from_leaves() {
    assert_eq!(decode::<String>(&parse(r#""hi""#)).unwrap(), "hi");
    assert_eq!(decode::<String>(&parse("12")).unwrap(), "12");
    assert_eq!(decode::<String>(&parse("true")).unwrap(), "true");
    assert!(decode::<String>(&parse("[]")).is_err());
}

#[test]
fn decode_char() {
    assert_eq!(decode::<char>(&Variant::from("x")).unwrap(), 'x');
    assert!(decode::<char>(&Variant::from("xy")).is_err());
}

// ============================================================================
// Null handling
// ============================================================================

#[test]
fn decode_null_yields_defaults() {
    assert_eq!(decode::<i32>(&Variant::Null).unwrap(), 0);
    assert_eq!(decode::<String>(&Variant::Null).unwrap(), "");
    assert_eq!(decode::<Option<i32>>(&Variant::Null).unwrap(), None);
    assert_eq!(decode::<Vec<i32>>(&Variant::Null).unwrap(), Vec::<i32>::new());
    assert_eq!(decode::<Person>(&Variant::Null).unwrap(), Person::default());
    assert_eq!(decode::<Color>(&Variant::Null).unwrap(), Color::Red);
}

#[test]
fn decode_null_member_resets_to_default() {
    let person: Person = from_str(r#"{"name":null,"age":4}"#).unwrap();
    assert_eq!(person, Person::new("", 4));
}

#[test]
fn decode_null_without_default_fails() {
    let result = decode::<Box<dyn Animal>>(&Variant::Null);
    assert!(matches!(result, Err(DecodeError::UnexpectedNull { .. })));
}

// ============================================================================
// Lists, sets and maps
// ============================================================================

#[test]
fn decode_lists() {
    assert_eq!(decode::<Vec<i32>>(&parse("[1,2,3]")).unwrap(), vec![1, 2, 3]);
    assert_eq!(
        decode::<VecDeque<String>>(&parse(r#"["a","b"]"#)).unwrap(),
        VecDeque::from(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn decode_sets() {
    let set: BTreeSet<i32> = decode(&parse("[3,1,3,2]")).unwrap();
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn decode_fixed_length_array() {
    assert_eq!(decode::<[i32; 3]>(&parse("[1,2,3]")).unwrap(), [1, 2, 3]);

    let err = decode::<[i32; 3]>(&parse("[1,2]")).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::LengthMismatch { expected: 3, found: 2, .. }
    ));
}

#[test]
fn decode_list_from_non_array_fails() {
    let err = decode::<Vec<i32>>(&parse(r#""x""#)).unwrap_err();
    assert!(matches!(err, DecodeError::ExpectedArray { found: "string", .. }));
}

#[test]
fn decode_maps_with_converted_keys() {
    let by_id: HashMap<u32, String> = decode(&parse(r#"{"1":"one","20":"twenty"}"#)).unwrap();
    assert_eq!(by_id[&20], "twenty");

    let by_color: HashMap<Color, i32> = decode(&parse(r#"{"Red":1,"Blue":3}"#)).unwrap();
    assert_eq!(by_color[&Color::Blue], 3);
}

#[test]
fn decode_map_with_bad_key_fails() {
    let err = decode::<HashMap<u32, i32>>(&parse(r#"{"x":1}"#)).unwrap_err();
    assert!(matches!(err.root_cause(), DecodeError::Conversion { target: "u32", .. }));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn decode_enum_by_name_or_ordinal() {
    assert_eq!(decode::<Color>(&Variant::from("Blue")).unwrap(), Color::Blue);
    assert_eq!(decode::<Color>(&parse("2")).unwrap(), Color::Blue);
    assert_eq!(decode::<Color>(&Variant::from("1")).unwrap(), Color::Green);
}

#[test]
fn decode_unknown_enum_value_fails() {
    let err = decode::<Color>(&Variant::from("Purple")).unwrap_err();
    match err {
        DecodeError::InvalidEnumValue { target, value } => {
            assert_eq!(target, "tests.Color");
            assert_eq!(value, "Purple");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(decode::<Color>(&parse("7")).is_err());
}

// ============================================================================
// Mapped objects
// ============================================================================

#[test]
fn decode_object() {
    let person: Person = from_str(r#"{"name":"Ann","age":30}"#).unwrap();
    assert_eq!(person, Person::new("Ann", 30));
}

#[test]
fn decode_object_with_own_type_hint() {
    let person: Person = from_str(r#"{"@type":"tests.Person","name":"Ann","age":30}"#).unwrap();
    assert_eq!(person, Person::new("Ann", 30));
}

#[test]
fn decode_object_ignores_unknown_keys() {
    let person: Person = from_str(r#"{"name":"Ann","nickname":"A","age":30}"#).unwrap();
    assert_eq!(person, Person::new("Ann", 30));
}

#[test]
fn decode_object_missing_keys_keep_defaults() {
    let person: Person = from_str(r#"{"name":"Ann"}"#).unwrap();
    assert_eq!(person, Person::new("Ann", 0));
}

#[test]
fn decode_object_from_non_object_fails() {
    let err = decode::<Person>(&Variant::from(5)).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::ExpectedObject { target: "tests.Person", found: "number" }
    ));
}

#[test]
fn decode_nested_objects() {
    let team: Team =
        from_str(r#"{"name":"A","members":[{"name":"Jenny","age":12},{"@index":1,"name":"Frank","age":32}]}"#)
            .unwrap();
    assert_eq!(team.members, vec![Person::new("Jenny", 12), Person::new("Frank", 32)]);
}

#[test]
fn decode_respects_member_modifiers() {
    let settings: Settings = from_str(
        r#"{"visible":1,"hidden":2,"excluded":3,"forced":4,"display_name":"r","renamed":"ignored","both":5,"owner":{"@type":"tests.Person","name":"Ann","age":30}}"#,
    )
    .unwrap();

    assert_eq!(
        settings,
        Settings {
            visible: 1,
            hidden: 0,
            excluded: 0,
            forced: 4,
            renamed: "r".to_string(),
            both: 0,
            owner: Some(Person::new("Ann", 30)),
        }
    );
}

#[test]
fn decode_writable_included_properties_only() {
    let account: Account =
        from_str(r#"{"owner":"Bo","cents":1,"dollars":12.5,"summary":"ignored"}"#).unwrap();
    assert_eq!(account.owner, "Bo");
    assert_eq!(account.cents, 1250);
}

// ============================================================================
// Error context
// ============================================================================

#[test]
fn decode_member_error_names_type_and_key() {
    let err = decode::<Person>(&parse(r#"{"name":"Ann","age":"old"}"#)).unwrap_err();
    match &err {
        DecodeError::Member { target, key, .. } => {
            assert_eq!(*target, "tests.Person");
            assert_eq!(key, "age");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root_cause(), DecodeError::Conversion { target: "i32", .. }));
    assert!(err.to_string().contains("`age`"));
}

#[test]
fn decode_element_error_names_position() {
    let err = decode::<Vec<i32>>(&parse(r#"[1,"x",3]"#)).unwrap_err();
    assert!(matches!(err, DecodeError::Element { index: 1, .. }));
}

#[test]
fn decode_nested_error_keeps_full_context() {
    let err = decode::<Team>(&parse(r#"{"name":"A","members":[{"name":"B","age":[]}]}"#)).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("`members`"));
    assert!(text.contains("element 0"));
    assert!(text.contains("`age`"));
}

#[test]
fn from_str_reports_parse_errors_separately() {
    let err = from_str::<Person>("{not json").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));

    let err = from_str::<Person>("[]").unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::ExpectedObject { .. })));
}

// ============================================================================
// Type hints
// ============================================================================

#[test]
fn decode_unknown_type_hint_fails() {
    let err = decode::<Person>(&parse(r#"{"@type":"tests.Nobody","name":"Ann"}"#)).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownTypeHint { ref hint } if hint == "tests.Nobody"));
}

#[test]
fn decode_unassignable_type_hint_fails() {
    register_animals();
    let err = decode::<Person>(&parse(r#"{"@type":"tests.Dog","name":"Rex"}"#)).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeHintNotAssignable { target: "tests.Person", .. }
    ));
}

// ============================================================================
// Hooks
// ============================================================================

#[derive(Debug, Default)]
struct Hooked {
    value: i32,
    doubled: i32,
    seen_keys: usize,
    log: Vec<&'static str>,
}

impl Hooked {
    fn double(&mut self) {
        self.doubled = self.value * 2;
        self.log.push("double");
    }

    fn count_keys(&mut self, source: &Variant) {
        self.seen_keys = source.as_object().map_or(0, |map| map.len());
        self.log.push("count_keys");
    }
}

impl Mapped for Hooked {
    const TYPE_NAME: &'static str = "tests.Hooked";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Hooked>] = &[field!(Hooked, value)];
        MEMBERS
    }

    fn after_decode_hooks() -> &'static [AfterDecode<Self>] {
        const HOOKS: &[AfterDecode<Hooked>] = &[
            AfterDecode::Plain(Hooked::double),
            AfterDecode::WithSource(Hooked::count_keys),
        ];
        HOOKS
    }
}
object_codec!(Hooked);

#[test]
fn decode_runs_hooks_in_order_after_members() {
    let hooked: Hooked = from_str(r#"{"value":21,"extra":true}"#).unwrap();
    assert_eq!(hooked.doubled, 42);
    assert_eq!(hooked.seen_keys, 2);
    assert_eq!(hooked.log, vec!["double", "count_keys"]);
}

#[test]
fn decode_failure_skips_hooks() {
    let err = decode::<Hooked>(&parse(r#"{"value":"nope"}"#)).unwrap_err();
    assert!(matches!(err, DecodeError::Member { .. }));
}

// ============================================================================
// Fixed-rank arrays
// ============================================================================

#[test]
fn decode_rank_two_array() {
    let grid: MultiArray<i32, 2> = decode(&parse("[[1,2,3],[4,5,6]]")).unwrap();
    assert_eq!(grid.dims(), [2, 3]);
    assert_eq!(grid[[0, 0]], 1);
    assert_eq!(grid[[1, 2]], 6);
    assert_eq!(grid.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn decode_rank_three_array() {
    let cube: MultiArray<i32, 3> = decode(&parse("[[[0,1],[2,3]],[[4,5],[6,7]]]")).unwrap();
    assert_eq!(cube.dims(), [2, 2, 2]);
    assert_eq!(cube[[1, 0, 1]], 5);
}

#[test]
fn decode_jagged_array_fails() {
    let err = decode::<MultiArray<i32, 2>>(&parse("[[1,2,3],[4,5]]")).unwrap_err();
    assert!(matches!(err, DecodeError::MultiRankShapeMismatch { rank: 2, .. }));
}

#[test]
fn decode_too_shallow_array_fails() {
    let err = decode::<MultiArray<i32, 2>>(&parse("[1,2,3]")).unwrap_err();
    assert!(matches!(err, DecodeError::MultiRankShapeMismatch { rank: 2, .. }));
}

#[test]
fn decode_shaped_requires_exact_dimensions() {
    let variant = parse("[[1,2,3],[4,5,6]]");
    assert!(MultiArray::<i32, 2>::decode_shaped(&variant, [2, 3]).is_ok());

    let err = MultiArray::<i32, 2>::decode_shaped(&variant, [2, 2]).unwrap_err();
    assert!(matches!(err, DecodeError::MultiRankShapeMismatch { .. }));
}

#[test]
fn multi_rank_check_reports_dimensions() {
    let mut dims = [0; 3];
    assert!(can_be_multi_rank_array(&parse("[[[1],[2]],[[3],[4]],[[5],[6]]]"), &mut dims));
    assert_eq!(dims, [3, 2, 1]);

    let mut dims = [9; 2];
    assert!(can_be_multi_rank_array(&parse("[]"), &mut dims));
    assert_eq!(dims, [0, 0]);

    let mut dims = [0; 2];
    assert!(!can_be_multi_rank_array(&parse("[[1],2]"), &mut dims));
}

// ============================================================================
// Variant targets
// ============================================================================

#[test]
fn decode_into_variant_clones_the_tree() {
    let variant = parse(r#"{"a":[1,{"b":null}]}"#);
    let copy: Variant = decode(&variant).unwrap();
    assert_eq!(copy, variant);
}

#[test]
fn make_decodes_from_a_variant() {
    let variant = parse(r#"{"name":"Ann","age":30}"#);
    assert_eq!(variant.make::<Person>().unwrap(), Person::new("Ann", 30));
    assert_eq!(variant["age"].make::<u8>().unwrap(), 30);
}
