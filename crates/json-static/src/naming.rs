//! Field-name translation policies.

/// Maps a declared field name to its wire name.
///
/// Names beginning with non-letter characters keep their prefix unchanged;
/// the policy applies from the first letter on, so `_links` under
/// [`NamingPolicy::UpperCamel`] becomes `_Links` rather than capitalizing
/// the underscore away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    #[default]
    Identity,
    UpperCamel,
    UpperCamelWithSpaces,
    LowerWithUnderscores,
    LowerWithDashes,
}

impl NamingPolicy {
    pub fn translate(&self, name: &str) -> String {
        match self {
            NamingPolicy::Identity => name.to_string(),
            NamingPolicy::UpperCamel => upper_case_first_letter(name),
            NamingPolicy::UpperCamelWithSpaces => {
                upper_case_first_letter(&separate_camel_case(name, ' '))
            }
            NamingPolicy::LowerWithUnderscores => {
                separate_camel_case(name, '_').to_lowercase()
            }
            NamingPolicy::LowerWithDashes => separate_camel_case(name, '-').to_lowercase(),
        }
    }
}

/// Insert `separator` before every uppercase letter that is not the first
/// character.
fn separate_camel_case(name: &str, separator: char) -> String {
    let mut translation = String::with_capacity(name.len());
    for character in name.chars() {
        if character.is_uppercase() && !translation.is_empty() {
            translation.push(separator);
        }
        translation.push(character);
    }
    translation
}

/// Capitalize the first letter, passing through any leading non-letter
/// characters unchanged.
fn upper_case_first_letter(name: &str) -> String {
    let mut chars = name.char_indices();
    for (index, character) in &mut chars {
        if character.is_alphabetic() {
            if character.is_uppercase() {
                return name.to_string();
            }
            let mut out = String::with_capacity(name.len());
            out.push_str(&name[..index]);
            out.extend(character.to_uppercase());
            out.push_str(&name[index + character.len_utf8()..]);
            return out;
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::NamingPolicy;

    #[test]
    fn identity_passes_through() {
        assert_eq!(NamingPolicy::Identity.translate("fooBarBaz"), "fooBarBaz");
    }

    #[test]
    fn upper_camel() {
        assert_eq!(NamingPolicy::UpperCamel.translate("fooBarBaz"), "FooBarBaz");
        assert_eq!(NamingPolicy::UpperCamel.translate("FooBarBaz"), "FooBarBaz");
    }

    #[test]
    fn upper_camel_with_spaces() {
        assert_eq!(
            NamingPolicy::UpperCamelWithSpaces.translate("fooBarBaz"),
            "Foo Bar Baz"
        );
    }

    #[test]
    fn lower_with_underscores() {
        assert_eq!(
            NamingPolicy::LowerWithUnderscores.translate("fooBarBaz"),
            "foo_bar_baz"
        );
    }

    #[test]
    fn lower_with_dashes() {
        assert_eq!(
            NamingPolicy::LowerWithDashes.translate("fooBarBaz"),
            "foo-bar-baz"
        );
    }

    #[test]
    fn leading_non_letter_prefix_is_preserved() {
        assert_eq!(NamingPolicy::UpperCamel.translate("_links"), "_Links");
        assert_eq!(
            NamingPolicy::UpperCamelWithSpaces.translate("_fooBar"),
            "_Foo Bar"
        );
    }

    #[test]
    fn single_letter_and_empty() {
        assert_eq!(NamingPolicy::UpperCamel.translate("x"), "X");
        assert_eq!(NamingPolicy::UpperCamel.translate(""), "");
        assert_eq!(NamingPolicy::LowerWithUnderscores.translate("x"), "x");
    }
}
