//! Member-name folding used by record lookups.

/// Fold a snake_case or lowerCamel name into the PascalCase form record
/// members are matched by.
///
/// Underscores are dropped and start a new word; the first character of every
/// word is upper-cased. Any other non-alphanumeric character is kept and also
/// starts a new word.
///
/// ```rust
/// use propath_core::fold;
///
/// assert_eq!(fold("last_name"), "LastName");
/// assert_eq!(fold("lastName"), "LastName");
/// assert_eq!(fold("get_Address"), "GetAddress");
/// assert_eq!(fold("Address_"), "Address");
/// ```
pub fn fold(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.chars() {
        if c == '_' {
            word_start = true;
            continue;
        }
        if word_start {
            folded.extend(c.to_uppercase());
        } else {
            folded.push(c);
        }
        word_start = !c.is_alphanumeric();
    }

    folded
}

/// Check whether two names denote the same member once folded.
pub(crate) fn same_member(query: &str, declared: &str) -> bool {
    fold(query) == fold(declared)
}
