//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use variant_json::{
    decode_polymorphic, enum_codec, field, object_codec, property, register_as, Decode,
    DecodeError, Encode, Mapped, MappedEnum, Member, Modifier, Variant,
};

#[cfg(windows)]
pub const NL: &str = "\r\n";
#[cfg(not(windows))]
pub const NL: &str = "\n";

/// Expected pretty output written with `\n`, adjusted to the platform newline.
pub fn lines(text: &str) -> String {
    text.replace('\n', NL)
}

// ============================================================================
// Plain records
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
}

impl Person {
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl Mapped for Person {
    const TYPE_NAME: &'static str = "tests.Person";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Person>] = &[field!(Person, name), field!(Person, age)];
        MEMBERS
    }
}
object_codec!(Person);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub members: Vec<Person>,
}

impl Mapped for Team {
    const TYPE_NAME: &'static str = "tests.Team";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Team>] = &[field!(Team, name), field!(Team, members)];
        MEMBERS
    }
}
object_codec!(Team);

// ============================================================================
// Modifiers
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Settings {
    pub visible: i32,
    pub hidden: i32,
    pub excluded: i32,
    pub forced: i32,
    pub renamed: String,
    pub both: i32,
    pub owner: Option<Person>,
}

impl Settings {
    pub fn sample() -> Self {
        Self {
            visible: 1,
            hidden: 2,
            excluded: 3,
            forced: 4,
            renamed: "r".to_string(),
            both: 5,
            owner: Some(Person::new("Ann", 30)),
        }
    }
}

impl Mapped for Settings {
    const TYPE_NAME: &'static str = "tests.Settings";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Settings>] = &[
            field!(Settings, visible),
            field!(Settings, hidden).private(),
            field!(Settings, excluded).with(&[Modifier::Exclude]),
            field!(Settings, forced).private().with(&[Modifier::Include]),
            field!(Settings, renamed).with(&[Modifier::Alias("display_name")]),
            field!(Settings, both).with(&[Modifier::Exclude, Modifier::Include]),
            field!(Settings, owner).with(&[Modifier::ForceTypeHint]),
        ];
        MEMBERS
    }
}
object_codec!(Settings);

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
    pub list: Option<Vec<i32>>,
}

impl Vector {
    fn p1(&self) -> i32 {
        1
    }

    fn p2(&self) -> i32 {
        2
    }

    fn p3(&self) -> i32 {
        3
    }
}

impl Mapped for Vector {
    const TYPE_NAME: &'static str = "tests.Vector";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Vector>] = &[
            property!(Vector, "p1", get = Vector::p1),
            field!(Vector, x),
            property!(Vector, "p2", get = Vector::p2),
            field!(Vector, y),
            property!(Vector, "p3", get = Vector::p3),
            field!(Vector, list),
        ];
        MEMBERS
    }
}
object_codec!(Vector);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Account {
    pub owner: String,
    pub cents: i64,
}

impl Account {
    fn dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    fn set_dollars(&mut self, value: f64) {
        self.cents = (value * 100.0).round() as i64;
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.owner, self.cents)
    }
}

impl Mapped for Account {
    const TYPE_NAME: &'static str = "tests.Account";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Account>] = &[
            field!(Account, owner),
            field!(Account, cents).with(&[Modifier::Exclude]),
            property!(Account, "dollars", get = Account::dollars, set = Account::set_dollars)
                .with(&[Modifier::Include]),
            property!(Account, "summary", get = Account::summary).with(&[Modifier::Include]),
        ];
        MEMBERS
    }
}
object_codec!(Account);

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl MappedEnum for Color {
    const TYPE_NAME: &'static str = "tests.Color";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Red", Color::Red),
        ("Green", Color::Green),
        ("Blue", Color::Blue),
    ];

    fn ordinal(self) -> i64 {
        self as i64
    }
}
enum_codec!(Color);

// ============================================================================
// Polymorphism
// ============================================================================

pub trait Animal: Encode {
    fn name(&self) -> &str;
    fn sound(&self) -> &'static str;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dog {
    pub name: String,
    pub good_boy: bool,
}

impl Animal for Dog {
    fn name(&self) -> &str {
        &self.name
    }

    fn sound(&self) -> &'static str {
        "woof"
    }
}

impl Mapped for Dog {
    const TYPE_NAME: &'static str = "tests.Dog";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Dog>] = &[field!(Dog, name), field!(Dog, good_boy)];
        MEMBERS
    }
}
object_codec!(Dog);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cat {
    pub name: String,
    pub lives: u8,
}

impl Animal for Cat {
    fn name(&self) -> &str {
        &self.name
    }

    fn sound(&self) -> &'static str {
        "meow"
    }
}

impl Mapped for Cat {
    const TYPE_NAME: &'static str = "tests.Cat";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Cat>] = &[field!(Cat, name), field!(Cat, lives)];
        MEMBERS
    }
}
object_codec!(Cat);

impl Decode for Box<dyn Animal> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_polymorphic(variant, "Animal")
    }
}

#[derive(Default)]
pub struct Zoo {
    pub keeper: String,
    pub animals: Vec<Box<dyn Animal>>,
}

impl Mapped for Zoo {
    const TYPE_NAME: &'static str = "tests.Zoo";

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Zoo>] = &[field!(Zoo, keeper), field!(Zoo, animals)];
        MEMBERS
    }
}
object_codec!(Zoo);

/// Register the animal types; safe to call from every test.
pub fn register_animals() {
    register_as::<Box<dyn Animal>, Dog>(|dog| Box::new(dog) as Box<dyn Animal>);
    register_as::<Box<dyn Animal>, Cat>(|cat| Box::new(cat) as Box<dyn Animal>);
}
