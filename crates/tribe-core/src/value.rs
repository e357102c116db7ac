use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector used for positions and headings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A value stored on a [`Blackboard`](crate::Blackboard).
///
/// Equality is structural: two lists or maps compare equal when their contents do.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BbValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Vec2(Vec2),
    List(Vec<BbValue>),
    Map(BTreeMap<String, BbValue>),
}

impl BbValue {
    pub fn kind(&self) -> &'static str {
        match self {
            BbValue::Number(_) => "number",
            BbValue::Text(_) => "text",
            BbValue::Bool(_) => "bool",
            BbValue::Vec2(_) => "vec2",
            BbValue::List(_) => "list",
            BbValue::Map(_) => "map",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            BbValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BbValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BbValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            BbValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[BbValue]> {
        match self {
            BbValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, BbValue>> {
        match self {
            BbValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Non-negative integral number, as used for entity ids.
    ///
    /// Numbers above 2^53 - 1 are rejected: they may already have been rounded.
    pub fn as_id(&self) -> Option<u64> {
        let n = self.as_number()?;
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_EXACT_ID as f64 {
            Some(n as u64)
        } else {
            None
        }
    }
}

/// Largest id an `f64` holds exactly (2^53 - 1).
const MAX_EXACT_ID: u64 = (1 << 53) - 1;

impl From<f64> for BbValue {
    fn from(value: f64) -> Self {
        BbValue::Number(value)
    }
}

impl From<f32> for BbValue {
    fn from(value: f32) -> Self {
        BbValue::Number(value as f64)
    }
}

impl From<i32> for BbValue {
    fn from(value: i32) -> Self {
        BbValue::Number(value as f64)
    }
}

impl From<u32> for BbValue {
    fn from(value: u32) -> Self {
        BbValue::Number(value as f64)
    }
}

impl From<u64> for BbValue {
    fn from(value: u64) -> Self {
        BbValue::Number(value as f64)
    }
}

impl From<usize> for BbValue {
    fn from(value: usize) -> Self {
        BbValue::Number(value as f64)
    }
}

impl From<bool> for BbValue {
    fn from(value: bool) -> Self {
        BbValue::Bool(value)
    }
}

impl From<String> for BbValue {
    fn from(value: String) -> Self {
        BbValue::Text(value)
    }
}

impl From<&str> for BbValue {
    fn from(value: &str) -> Self {
        BbValue::Text(value.to_string())
    }
}

impl From<Vec2> for BbValue {
    fn from(value: Vec2) -> Self {
        BbValue::Vec2(value)
    }
}

impl From<Vec<BbValue>> for BbValue {
    fn from(value: Vec<BbValue>) -> Self {
        BbValue::List(value)
    }
}

impl From<BTreeMap<String, BbValue>> for BbValue {
    fn from(value: BTreeMap<String, BbValue>) -> Self {
        BbValue::Map(value)
    }
}

/// Typed view of a [`BbValue`], used by [`Blackboard::get_as`](crate::Blackboard::get_as).
pub trait FromBbValue: Sized {
    /// Shape name reported in type-mismatch errors.
    const EXPECTED: &'static str;

    fn from_bb(value: &BbValue) -> Option<Self>;
}

impl FromBbValue for BbValue {
    const EXPECTED: &'static str = "any";

    fn from_bb(value: &BbValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromBbValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_number()
    }
}

impl FromBbValue for u64 {
    const EXPECTED: &'static str = "non-negative integer";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_id()
    }
}

impl FromBbValue for usize {
    const EXPECTED: &'static str = "non-negative integer";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_id().and_then(|n| usize::try_from(n).ok())
    }
}

impl FromBbValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromBbValue for String {
    const EXPECTED: &'static str = "text";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromBbValue for Vec2 {
    const EXPECTED: &'static str = "vec2";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_vec2()
    }
}

impl FromBbValue for Vec<BbValue> {
    const EXPECTED: &'static str = "list";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_list().map(<[BbValue]>::to_vec)
    }
}

impl FromBbValue for BTreeMap<String, BbValue> {
    const EXPECTED: &'static str = "map";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_map().cloned()
    }
}
