//! Type categories and the labels rendered for them.

use serde::Serialize;

/// Type names documented as scalars.
pub const NATIVE_TYPES: &[&str] = &[
    "boolean", "Boolean", "string", "String", "number", "Number", "Date", "any",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Native,
    NativeArray,
    Object,
    ObjectArray,
    Enum,
}

impl Category {
    /// Categories whose properties get expanded.
    pub fn is_object(self) -> bool {
        matches!(self, Category::Object | Category::ObjectArray)
    }
}

/// How scalar labels are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LabelStyle {
    /// `string[]` becomes `String[]`.
    #[default]
    Capitalized,
    /// Type text is kept as written.
    Raw,
}

pub fn is_native(text: &str) -> bool {
    NATIVE_TYPES.contains(&text)
}

pub fn is_native_array(text: &str) -> bool {
    text.strip_suffix("[]").is_some_and(is_native)
}

pub fn classify(text: &str, is_enum: bool) -> Category {
    if is_enum {
        Category::Enum
    } else if is_native(text) {
        Category::Native
    } else if is_native_array(text) {
        Category::NativeArray
    } else if text.contains("[]") {
        Category::ObjectArray
    } else {
        Category::Object
    }
}

pub fn label(category: Category, text: &str, style: LabelStyle) -> String {
    match category {
        Category::ObjectArray => "Object[]".to_string(),
        Category::Object => "Object".to_string(),
        Category::Enum => "Enum".to_string(),
        Category::Native | Category::NativeArray => match style {
            LabelStyle::Capitalized => capitalize(text),
            LabelStyle::Raw => text.to_string(),
        },
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes() {
        assert_eq!(capitalize("string"), "String");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn native_types() {
        assert!(is_native("string"));
        assert!(is_native("Date"));
        assert!(!is_native("CustomString"));
        assert!(is_native_array("string[]"));
        assert!(!is_native_array("CustomString[]"));
        assert!(!is_native_array("string[][]"));
    }

    #[test]
    fn classification_priority() {
        assert_eq!(classify("string[]", false), Category::NativeArray);
        assert_eq!(classify("CustomInterface[]", false), Category::ObjectArray);
        assert_eq!(classify("CustomInterface", false), Category::Object);
        assert_eq!(classify("CustomInterface", true), Category::Enum);
        assert_eq!(classify("number", false), Category::Native);
        // Enum wins even over native-looking text.
        assert_eq!(classify("string", true), Category::Enum);
    }

    #[test]
    fn labels() {
        let cap = LabelStyle::Capitalized;
        assert_eq!(label(Category::NativeArray, "string[]", cap), "String[]");
        assert_eq!(label(Category::ObjectArray, "AString[]", cap), "Object[]");
        assert_eq!(label(Category::Object, "AString", cap), "Object");
        assert_eq!(label(Category::Enum, "AString", cap), "Enum");
        assert_eq!(label(Category::Native, "string", cap), "String");
        assert_eq!(label(Category::Native, "string", LabelStyle::Raw), "string");
        assert_eq!(label(Category::NativeArray, "number[]", LabelStyle::Raw), "number[]");
    }
}
