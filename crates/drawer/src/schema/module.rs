//! Polymorphic name registry.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// Default key holding a polymorphic value's concrete type name.
pub const CLASS_DISCRIMINATOR: &str = "type";

lazy_static! {
    /// Process-wide defaults that every per-call module is layered over.
    pub static ref DEFAULT_MODULE: SerializersModule = SerializersModule::new();
}

/// Registered serial names for the variants of sum types, plus the key the
/// tree codec stores them under.
///
/// A module is built once and only read afterwards. Per-call composition
/// produces a new module with [`overwritten_by`](Self::overwritten_by).
///
/// ```rust
/// use drawer::SerializersModule;
///
/// let module = SerializersModule::new()
///     .polymorphic("Message", "Int", "int_message")
///     .polymorphic("Message", "Str", "string_message");
/// assert_eq!(module.serial_name_of("Message", "Int"), "int_message");
/// assert_eq!(module.variant_of("Message", "string_message"), "Str");
/// assert_eq!(module.serial_name_of("Message", "Other"), "Other");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializersModule {
    class_discriminator: Option<String>,
    serial_names: FxHashMap<String, FxHashMap<String, String>>,
    variants: FxHashMap<String, FxHashMap<String, String>>,
}

impl SerializersModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discriminator key.
    pub fn with_class_discriminator(mut self, key: impl Into<String>) -> Self {
        self.class_discriminator = Some(key.into());
        self
    }

    /// Registers `serial_name` for variant `variant` of the sum type `base`.
    pub fn polymorphic(mut self, base: &str, variant: &str, serial_name: &str) -> Self {
        if let Some(previous) = self
            .serial_names
            .entry(base.to_owned())
            .or_default()
            .insert(variant.to_owned(), serial_name.to_owned())
        {
            if let Some(reverse) = self.variants.get_mut(base) {
                reverse.remove(&previous);
            }
        }
        self.variants
            .entry(base.to_owned())
            .or_default()
            .insert(serial_name.to_owned(), variant.to_owned());
        self
    }

    /// Returns a module holding this module's registrations with `other`'s
    /// layered on top.
    pub fn overwritten_by(&self, other: &SerializersModule) -> SerializersModule {
        let mut merged = self.clone();
        if let Some(key) = &other.class_discriminator {
            merged.class_discriminator = Some(key.clone());
        }
        for (base, names) in &other.serial_names {
            for (variant, serial_name) in names {
                merged = merged.polymorphic(base, variant, serial_name);
            }
        }
        merged
    }

    pub fn class_discriminator(&self) -> &str {
        self.class_discriminator
            .as_deref()
            .unwrap_or(CLASS_DISCRIMINATOR)
    }

    /// Registered serial name of a variant, or the variant name itself.
    pub fn serial_name_of<'a>(&'a self, base: &str, variant: &'a str) -> &'a str {
        self.serial_names
            .get(base)
            .and_then(|names| names.get(variant))
            .map_or(variant, String::as_str)
    }

    /// Variant registered under a serial name, or the serial name itself.
    pub fn variant_of<'a>(&'a self, base: &str, serial_name: &'a str) -> &'a str {
        self.variants
            .get(base)
            .and_then(|variants| variants.get(serial_name))
            .map_or(serial_name, String::as_str)
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.class_discriminator.is_none() && self.serial_names.is_empty()
    }
}
