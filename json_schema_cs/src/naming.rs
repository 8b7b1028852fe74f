//! C# identifier construction for types, properties, and enum members.

use heck::ToUpperCamelCase;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix an identifier with `_` when it starts with a digit; use `fallback` when empty.
fn sanitize_identifier(candidate: String, fallback: &str) -> String {
    if candidate.is_empty() {
        fallback.to_string()
    } else if candidate.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{candidate}")
    } else {
        candidate
    }
}

/// Convert a title or key into a C# type name (`PascalCase`).
/// Examples: `"The Widget_Settings Schema"` -> `"TheWidgetSettingsSchema"`, `"widget-settings"` -> `"WidgetSettings"`
pub fn to_type_name(s: &str) -> String {
    sanitize_identifier(s.trim().to_upper_camel_case(), "Anonymous")
}

/// Convert a JSON property key into a C# property name (`PascalCase`).
pub fn to_property_name(key: &str) -> String {
    sanitize_identifier(key.to_upper_camel_case(), "Property")
}

/// Type name from an optional `title`, falling back to a hint derived from the property key.
pub fn type_name_from_title(title: Option<&str>, hint: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => to_type_name(t),
        _ => to_type_name(hint),
    }
}

/// Convert a JSON enum string into a C# enum member identifier (`PascalCase`).
/// First char uppercase, rest lowercase per word. Prefixes with `E` (short for Enum)
/// if result is empty or starts with a digit.
pub fn to_enum_member_name(s: &str) -> String {
    let base: String = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars: std::str::Chars<'_> = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect();
    if base.is_empty() || base.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("E{base}")
    } else {
        base
    }
}

/// Enum member identifier for an integer enum value.
pub fn to_integer_member_name(value: i64) -> String {
    if value < 0 {
        format!("ValueMinus{}", value.unsigned_abs())
    } else {
        format!("Value{value}")
    }
}

/// Give colliding base names a positional `_N` suffix; unique names are kept as-is.
/// Input order is preserved.
pub fn disambiguate(base_names: &[String]) -> Vec<String> {
    let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for base in base_names {
        *name_counts.entry(base.as_str()).or_insert(0) += 1;
    }

    let mut name_indices: BTreeMap<&str, usize> = BTreeMap::new();
    base_names
        .iter()
        .map(|base| {
            if name_counts.get(base.as_str()).copied().unwrap_or(0) > 1 {
                let idx: &mut usize = name_indices.entry(base.as_str()).or_insert(0);
                let name: String = format!("{base}_{idx}");
                *idx += 1;
                name
            } else {
                base.clone()
            }
        })
        .collect()
}

/// Hands out identifiers that are unique within one scope by appending `2`, `3`, ...
#[derive(Debug, Default)]
pub struct NameScope {
    taken: BTreeSet<String>,
}

impl NameScope {
    /// Reserve `base`, or the first free numbered variant of it.
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n: usize = 2;
        loop {
            let candidate: String = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_type_name_sanitizes_spaces_and_underscores() {
        assert_eq!(to_type_name("The Foo_Bar Schema"), "TheFooBarSchema");
    }

    #[test]
    fn to_type_name_with_hyphens() {
        assert_eq!(to_type_name("foo-bar-baz"), "FooBarBaz");
    }

    #[test]
    fn to_type_name_keeps_pascal_case() {
        assert_eq!(to_type_name("NestedInfo"), "NestedInfo");
    }

    #[test]
    fn to_type_name_leading_digit_gets_underscore() {
        assert_eq!(to_type_name("3d"), "_3d");
    }

    #[test]
    fn to_type_name_empty_uses_fallback() {
        assert_eq!(to_type_name("  "), "Anonymous");
    }

    #[test]
    fn to_property_name_from_snake_and_kebab_keys() {
        assert_eq!(to_property_name("first_name"), "FirstName");
        assert_eq!(to_property_name("last-name"), "LastName");
        assert_eq!(to_property_name("zipCode"), "ZipCode");
    }

    #[test]
    fn to_property_name_symbol_only_key_uses_fallback() {
        assert_eq!(to_property_name("$"), "Property");
    }

    #[test]
    fn type_name_from_title_prefers_title() {
        assert_eq!(type_name_from_title(Some("Postal Address"), "address"), "PostalAddress");
        assert_eq!(type_name_from_title(Some("   "), "address"), "Address");
        assert_eq!(type_name_from_title(None, "address"), "Address");
    }

    #[test]
    fn to_enum_member_name_hyphenated() {
        assert_eq!(to_enum_member_name("blackjack-a"), "BlackjackA");
    }

    #[test]
    fn to_enum_member_name_uppercase_is_lowered() {
        assert_eq!(to_enum_member_name("PENDING"), "Pending");
    }

    #[test]
    fn to_enum_member_name_numeric_prefix_gets_e_prefix() {
        assert_eq!(to_enum_member_name("123"), "E123");
        assert_eq!(to_enum_member_name(""), "E");
    }

    #[test]
    fn to_integer_member_name_handles_sign() {
        assert_eq!(to_integer_member_name(4), "Value4");
        assert_eq!(to_integer_member_name(-1), "ValueMinus1");
        assert_eq!(to_integer_member_name(i64::MIN), "ValueMinus9223372036854775808");
    }

    #[test]
    fn disambiguate_suffixes_only_collisions() {
        let input: Vec<String> = ["Pending", "Done", "Pending", "Pending"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let expected: Vec<String> = ["Pending_0", "Done", "Pending_1", "Pending_2"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(disambiguate(&input), expected);
    }

    #[test]
    fn name_scope_numbers_repeats() {
        let mut scope = NameScope::default();
        assert_eq!(scope.claim("Item"), "Item");
        assert_eq!(scope.claim("Item"), "Item2");
        assert_eq!(scope.claim("Item2"), "Item22");
        assert_eq!(scope.claim("Item"), "Item3");
    }
}
