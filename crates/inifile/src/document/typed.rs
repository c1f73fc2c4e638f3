//! Typed access on top of the string store.
//!
//! Every value in a document is stored as a string; this module layers
//! parsing and formatting over [`Document::get`] and [`Document::set`] so
//! callers can read and write `i64`, `f64`, `bool`, and friends directly.
//!
//! Booleans accept the literal tokens `true`/`1`/`yes`/`on` and
//! `false`/`0`/`no`/`off`, case-sensitively. Numbers use the standard
//! `FromStr` grammar of their type.

use crate::document::Document;
use crate::error::IniError;

/// A type that can be stored in and read back from a document.
///
/// Implemented for `String`, the common integer and float widths, and
/// `bool`. Downstream types can implement it to participate in
/// [`Document::get_as`] / [`Document::set_as`].
pub trait IniValue: Sized {
    /// Name used in conversion error messages, e.g. `"i64"`.
    const TYPE_NAME: &'static str;

    /// Parses the stored string. `None` signals a conversion failure.
    fn from_ini(raw: &str) -> Option<Self>;

    /// Formats the value for storage.
    fn to_ini(&self) -> String;
}

impl IniValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_ini(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }

    fn to_ini(&self) -> String {
        self.clone()
    }
}

macro_rules! ini_value_via_fromstr {
    ($($ty:ty),+) => {
        $(
            impl IniValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_ini(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }

                fn to_ini(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

ini_value_via_fromstr!(i32, i64, u32, u64, f32, f64);

impl IniValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_ini(raw: &str) -> Option<Self> {
        match raw {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn to_ini(&self) -> String {
        if *self { "true" } else { "false" }.to_owned()
    }
}

impl Document {
    /// Reads `(section, key)` and parses it as `T`.
    ///
    /// # Errors
    ///
    /// The lookup errors of [`Document::get`], plus [`IniError::Convert`]
    /// when the stored string does not parse as `T`.
    pub fn get_as<T: IniValue>(&self, section: &str, key: &str) -> Result<T, IniError> {
        let raw = self.get(section, key)?;
        T::from_ini(&raw).ok_or_else(|| IniError::Convert {
            section: section.to_owned(),
            key: key.to_owned(),
            value: raw,
            target: T::TYPE_NAME,
        })
    }

    /// Like [`Document::get_as`], but falls back to `default` whenever the
    /// lookup misses or the stored string does not parse as `T`. Only lock
    /// poisoning still propagates.
    pub fn get_or<T: IniValue>(
        &self,
        section: &str,
        key: &str,
        default: T,
    ) -> Result<T, IniError> {
        match self.get(section, key) {
            Ok(raw) => Ok(T::from_ini(&raw).unwrap_or(default)),
            Err(IniError::LockPoisoned) => Err(IniError::LockPoisoned),
            Err(_) => Ok(default),
        }
    }

    /// Formats `value` and stores it under `(section, key)`.
    pub fn set_as<T: IniValue>(&self, section: &str, key: &str, value: &T) -> Result<(), IniError> {
        self.set(section, key, &value.to_ini())
    }

    /// Reads `(section, key)` as a signed integer.
    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, IniError> {
        self.get_as(section, key)
    }

    /// Reads `(section, key)` as a float.
    pub fn get_float(&self, section: &str, key: &str) -> Result<f64, IniError> {
        self.get_as(section, key)
    }

    /// Reads `(section, key)` as a boolean.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, IniError> {
        self.get_as(section, key)
    }

    /// Reads an integer, falling back to `default` when absent.
    pub fn get_or_int(&self, section: &str, key: &str, default: i64) -> Result<i64, IniError> {
        self.get_or(section, key, default)
    }

    /// Reads a float, falling back to `default` when absent.
    pub fn get_or_float(&self, section: &str, key: &str, default: f64) -> Result<f64, IniError> {
        self.get_or(section, key, default)
    }

    /// Reads a boolean, falling back to `default` when absent.
    pub fn get_or_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, IniError> {
        self.get_or(section, key, default)
    }

    /// Stores a signed integer.
    pub fn set_int(&self, section: &str, key: &str, value: i64) -> Result<(), IniError> {
        self.set_as(section, key, &value)
    }

    /// Stores a float.
    pub fn set_float(&self, section: &str, key: &str, value: f64) -> Result<(), IniError> {
        self.set_as(section, key, &value)
    }

    /// Stores a boolean as `true`/`false`.
    pub fn set_bool(&self, section: &str, key: &str, value: bool) -> Result<(), IniError> {
        self.set_as(section, key, &value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
