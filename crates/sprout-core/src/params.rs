//! Parameters embedded in node names.
//!
//! A name such as `Title??content=title&style.color=red&ellipsis` carries a
//! parameter block after the slot delimiter. Pairs are separated by the pair
//! delimiter, keys and values by the key/value delimiter, and dotted keys
//! build nested maps. Malformed blocks yield no parameters.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use nom::{
    bytes::complete::tag,
    combinator::{all_consuming, opt, verify},
    multi::separated_list1,
    sequence::{pair, preceded},
    IResult,
};

use crate::options::ParamDelimiters;

/// A parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Key present without a value (`??ellipsis`)
    Flag,
    /// Key with a value (`??content=title`)
    Value(String),
    /// Dotted keys grouped under their first segment (`??style.color=red`)
    Nested(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// Get the value string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Parameters parsed from a node name, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Parse the parameter block of `name`.
    pub fn parse(name: &str, delimiters: &ParamDelimiters) -> Self {
        let Some(index) = name.find(delimiters.slot.as_str()) else {
            return Self::default();
        };
        let block = &name[index + delimiters.slot.len()..];

        match all_consuming(param_list(delimiters))(block) {
            Ok((_, entries)) => {
                let mut params = IndexMap::new();
                for (key, value) in entries {
                    let value = value.map_or(ParamValue::Flag, |v| ParamValue::Value(v.to_string()));
                    let path: Vec<&str> = key.split(delimiters.nested.as_str()).collect();
                    insert_path(&mut params, &path, value);
                }
                Self(params)
            }
            Err(_) => Self::default(),
        }
    }

    /// Get a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Check if a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get the string value of a key. Flags and nested maps have none.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Get the nested map under a key.
    pub fn nested(&self, key: &str) -> Option<&IndexMap<String, ParamValue>> {
        match self.get(key) {
            Some(ParamValue::Nested(map)) => Some(map),
            _ => None,
        }
    }

    /// Iterate parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no parameters were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn insert_path(map: &mut IndexMap<String, ParamValue>, path: &[&str], value: ParamValue) {
    match path {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| ParamValue::Nested(IndexMap::new()));
            if !matches!(entry, ParamValue::Nested(_)) {
                *entry = ParamValue::Nested(IndexMap::new());
            }
            if let ParamValue::Nested(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

/// Consume input up to the earliest of `terminators`, or to the end.
fn until_any<'a>(terminators: [&'a str; 2]) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let end = terminators
            .iter()
            .filter(|t| !t.is_empty())
            .filter_map(|t| input.find(*t))
            .min()
            .unwrap_or(input.len());
        Ok((&input[end..], &input[..end]))
    }
}

type Entry<'a> = (&'a str, Option<&'a str>);

fn param_list<'a>(
    delimiters: &'a ParamDelimiters,
) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<Entry<'a>>> {
    let pair_sep = delimiters.pair.as_str();
    let key_value = delimiters.key_value.as_str();

    let key = verify(until_any([pair_sep, key_value]), |k: &str| !k.is_empty());
    let value = opt(preceded(tag(key_value), until_any([pair_sep, ""])));

    separated_list1(tag(pair_sep), pair(key, value))
}

fn strip_non_word(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Normalized component name: the prefix before the slot delimiter with
/// non-identifier characters removed (`#Card??x=1` becomes `Card`).
pub fn component_name(name: &str, delimiters: &ParamDelimiters) -> String {
    let prefix = match name.find(delimiters.slot.as_str()) {
        Some(index) => &name[..index],
        None => name,
    };
    strip_non_word(prefix)
}

/// Exported instance identifier for a component (`Card` + `Generated`).
pub fn component_instance(name: &str, suffix: &str) -> String {
    format!("{name}{suffix}")
}

/// Source file stem for a component (`CardHeader` becomes `card-header`).
pub fn file_name(component_name: &str) -> String {
    strip_non_word(component_name).to_case(Case::Kebab)
}
