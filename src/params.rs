//! Immutable, hierarchical parameter objects.
//!
//! A [`Params`] is a cheaply clonable handle to a read-only table. Designing
//! sibling instances in parallel shares the same tree without copying it.
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{config_err, Result};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(ArcStr),
    List(Vec<Param>),
    Table(Params),
}

impl Param {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&ArcStr> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Param]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Params> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Table(_) => "table",
        }
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<ArcStr> for Param {
    fn from(value: ArcStr) -> Self {
        Self::Str(value)
    }
}

impl From<Params> for Param {
    fn from(value: Params) -> Self {
        Self::Table(value)
    }
}

impl<T: Into<Param>> From<Vec<T>> for Param {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// A read-only table of named parameters.
///
/// Keys set to `null` in a JSON carrier are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Arc<IndexMap<ArcStr, Param>>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a TOML or JSON parameter file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Ok(toml::from_str(&contents)?),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArcStr> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArcStr, &Param)> {
        self.0.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.get(key)
    }

    fn require(&self, key: &str) -> Result<&Param> {
        self.get(key)
            .ok_or_else(|| config_err!("missing required parameter `{key}`"))
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        want: &str,
        f: impl FnOnce(&'a Param) -> Option<T>,
    ) -> Result<T> {
        let value = self.require(key)?;
        f(value).ok_or_else(|| {
            config_err!(
                "parameter `{key}` should be a {want}, found a {}",
                value.kind()
            )
        })
    }

    pub fn bool(&self, key: &str) -> Result<bool> {
        self.typed(key, "bool", Param::as_bool)
    }

    pub fn int(&self, key: &str) -> Result<i64> {
        self.typed(key, "integer", Param::as_int)
    }

    pub fn float(&self, key: &str) -> Result<f64> {
        self.typed(key, "float", Param::as_float)
    }

    pub fn str(&self, key: &str) -> Result<&ArcStr> {
        self.typed(key, "string", Param::as_str)
    }

    pub fn list(&self, key: &str) -> Result<&[Param]> {
        self.typed(key, "list", Param::as_list)
    }

    /// The nested parameter object stored under `key`.
    pub fn table(&self, key: &str) -> Result<&Params> {
        self.typed(key, "table", Param::as_table)
    }

    /// Like [`Params::table`], but a missing key is `None`.
    pub fn opt_table(&self, key: &str) -> Result<Option<&Params>> {
        match self.get(key) {
            None => Ok(None),
            Some(_) => self.table(key).map(Some),
        }
    }

    /// A list of strings.
    pub fn str_list(&self, key: &str) -> Result<Vec<ArcStr>> {
        self.list(key)?
            .iter()
            .map(|p| {
                p.as_str()
                    .cloned()
                    .ok_or_else(|| config_err!("`{key}` should only contain strings"))
            })
            .collect()
    }

    /// An ordered list of `[a, b]` string pairs, such as `(terminal, net)`
    /// reconnections or `(old, new)` renames.
    pub fn pairs(&self, key: &str) -> Result<Vec<(ArcStr, ArcStr)>> {
        self.list(key)?
            .iter()
            .map(|p| match p.as_list() {
                Some([Param::Str(a), Param::Str(b)]) => Ok((a.clone(), b.clone())),
                _ => Err(config_err!("`{key}` should only contain [string, string] pairs")),
            })
            .collect()
    }

    /// A table whose values are all strings, in declared order.
    pub fn str_map(&self, key: &str) -> Result<Vec<(ArcStr, ArcStr)>> {
        self.table(key)?
            .iter()
            .map(|(k, v)| {
                v.as_str()
                    .map(|v| (k.clone(), v.clone()))
                    .ok_or_else(|| config_err!("`{key}.{k}` should be a string"))
            })
            .collect()
    }

    /// Returns a copy of these parameters with `key` set to `value`.
    ///
    /// The receiver is left untouched.
    pub fn with(&self, key: impl Into<ArcStr>, value: impl Into<Param>) -> Self {
        let mut map = (*self.0).clone();
        map.insert(key.into(), value.into());
        Self(Arc::new(map))
    }

    /// Fills in every key of `defaults` that is absent here.
    pub fn with_defaults(&self, defaults: &Params) -> Self {
        if defaults.keys().all(|k| self.contains(k)) {
            return self.clone();
        }
        let mut map = (*self.0).clone();
        for (k, v) in defaults.iter() {
            if !map.contains_key(k) {
                map.insert(k.clone(), v.clone());
            }
        }
        Self(Arc::new(map))
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = IndexMap::<ArcStr, Option<Param>>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }
}

impl<K: Into<ArcStr>, V: Into<Param>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(Arc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

/// Builds a [`Params`] from `key => value` pairs.
#[macro_export]
macro_rules! params {
    () => { $crate::params::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        <$crate::params::Params as ::std::iter::FromIterator<(&str, $crate::params::Param)>>::from_iter([
            $(($key, $crate::params::Param::from($value))),+
        ])
    };
}
