//! Naming conventions for accessors and supporting methods

use std::fmt;

/// `hideX`
pub const HIDE: &str = "hide";
/// `disableX`
pub const DISABLE: &str = "disable";
/// `validateX`
pub const VALIDATE: &str = "validate";
/// `defaultX`
pub const DEFAULT: &str = "default";
/// `choicesX`
pub const CHOICES: &str = "choices";
/// `autoCompleteX`
pub const AUTO_COMPLETE: &str = "autoComplete";
/// `modifyX`
pub const MODIFY: &str = "modify";
/// `clearX`
pub const CLEAR: &str = "clear";
/// `setX`
pub const SET: &str = "set";
/// `getX`
pub const GET: &str = "get";
/// `isX`
pub const IS: &str = "is";

/// Prefixes of member supporting methods
pub const SUPPORT_PREFIXES: &[&str] = &[HIDE, DISABLE, VALIDATE, DEFAULT, CHOICES, AUTO_COMPLETE];

/// Prefixes of property mutators
pub const MUTATOR_PREFIXES: &[&str] = &[MODIFY, CLEAR, SET];

/// `status` -> `Status`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Status` -> `status`
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` is `prefix` itself or `prefix` followed by an uppercase
/// letter or digit. `hideFoo` and `hide0` match `hide`; `hidden` does not.
pub fn has_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        None => false,
    }
}

/// Supporting-method prefix of `name`, if it is convention-shaped
pub fn support_prefix_of(name: &str) -> Option<&'static str> {
    SUPPORT_PREFIXES.iter().copied().find(|p| has_prefix(name, p))
}

/// Mutator prefix of `name`, if any
pub fn mutator_prefix_of(name: &str) -> Option<&'static str> {
    MUTATOR_PREFIXES.iter().copied().find(|p| has_prefix(name, p))
}

/// Names reserved for supporting methods and mutators; never actions unless
/// explicitly marked
pub fn is_reserved(name: &str) -> bool {
    support_prefix_of(name).is_some() || mutator_prefix_of(name).is_some()
}

/// `getStatus` / `isPaid` -> `status` / `paid`
pub fn property_name_from_accessor(name: &str) -> Option<String> {
    [GET, IS].iter().find_map(|prefix| {
        let rest = name.strip_prefix(prefix)?;
        if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            Some(decapitalize(rest))
        } else {
            None
        }
    })
}

/// `placeOrder` -> `Place Order`
pub fn friendly_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev_lower = false;
    for (i, c) in identifier.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c == '_' {
            out.push(' ');
            prev_lower = false;
            continue;
        } else if c.is_uppercase() && prev_lower {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    out
}

/// One naming convention producing a candidate method name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingConvention {
    /// `{prefix}{Member}`, e.g. `hideStatus`
    Member {
        /// Convention prefix
        prefix: &'static str,
        /// Member name
        member: String,
    },
    /// `{prefix}{N}{Action}`, e.g. `choices0PlaceOrder`
    ParamIndexed {
        /// Convention prefix
        prefix: &'static str,
        /// Parameter index
        index: usize,
        /// Action name
        action: String,
    },
    /// `{prefix}{Param}`, e.g. `choicesQuantity` (mixin main methods)
    ParamNamed {
        /// Convention prefix
        prefix: &'static str,
        /// Parameter name
        param: String,
    },
    /// `{prefix}{N}`, e.g. `default0` (mixin main methods)
    MixinParamIndexed {
        /// Convention prefix
        prefix: &'static str,
        /// Parameter index
        index: usize,
    },
    /// Bare `{prefix}`, e.g. `hide` (mixin main methods)
    MixinBare {
        /// Convention prefix
        prefix: &'static str,
    },
}

impl NamingConvention {
    /// Candidate method name
    pub fn candidate(&self) -> String {
        match self {
            NamingConvention::Member { prefix, member } => format!("{}{}", prefix, capitalize(member)),
            NamingConvention::ParamIndexed { prefix, index, action } => {
                format!("{}{}{}", prefix, index, capitalize(action))
            }
            NamingConvention::ParamNamed { prefix, param } => format!("{}{}", prefix, capitalize(param)),
            NamingConvention::MixinParamIndexed { prefix, index } => format!("{}{}", prefix, index),
            NamingConvention::MixinBare { prefix } => prefix.to_string(),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.candidate())
    }
}

/// Conventions for a member-level supporting method
pub fn member_conventions(prefix: &'static str, member: &str, is_mixin_main: bool) -> Vec<NamingConvention> {
    let mut conventions = vec![NamingConvention::Member {
        prefix,
        member: member.to_string(),
    }];
    if is_mixin_main {
        conventions.push(NamingConvention::MixinBare { prefix });
    }
    conventions
}

/// Conventions for a parameter-level supporting method
pub fn param_conventions(
    prefix: &'static str,
    index: usize,
    action: &str,
    param: &str,
    is_mixin_main: bool,
) -> Vec<NamingConvention> {
    let mut conventions = vec![NamingConvention::ParamIndexed {
        prefix,
        index,
        action: action.to_string(),
    }];
    if is_mixin_main {
        conventions.push(NamingConvention::ParamNamed {
            prefix,
            param: param.to_string(),
        });
        conventions.push(NamingConvention::MixinParamIndexed { prefix, index });
    }
    conventions
}

/// Candidate names for a list of conventions, in order
pub fn candidates(conventions: &[NamingConvention]) -> Vec<String> {
    conventions.iter().map(NamingConvention::candidate).collect()
}
