//! # Name Conversion
//!
//! Table and column names are derived from Rust type and field names.
//!
//! ```text
//! EntitySample  → entity_sample
//! HTTPRequest   → http_request
//! createdAt     → created_at
//! ID            → id
//! ```

/// Signature of a name conversion rule.
pub type NameMapper = fn(&str) -> String;

/// Converts `CamelCase`, `mixedCase` and `kebab-case` names to `snake_case`.
///
/// Runs of capitals are treated as one word, so acronyms stay together.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Returns the last path segment of a type's name, without generics.
///
/// `my_app::model::EntitySample<u8>` becomes `EntitySample`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
