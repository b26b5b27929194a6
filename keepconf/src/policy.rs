//! Exception policy for loading.
//!
//! A [`Policy`] decides, for every situation the loader can run into,
//! whether the problem is repaired silently or surfaced as an error.
//! The defaults repair everything.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

macro_rules! policy_action {
    (
        $(#[$meta:meta])*
        $name:ident ($situation:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canonical:literal $(| $alt:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Canonical names of every action, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($canonical),+];

            /// The canonical name of this action.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match normalize(s).as_str() {
                    $($canonical $(| $alt)* => Ok(Self::$variant),)+
                    _ => Err(Error::InvalidPolicy {
                        message: format!(
                            "invalid action '{s}' for {}, expected one of: {}",
                            $situation,
                            Self::NAMES.join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

policy_action! {
    /// What to do when the configuration file does not exist.
    NotFoundAction ("not_found") {
        /// Write the defaults to the path and continue with them.
        #[default]
        Create => "create",
        /// Fail with [`Error::NotFound`].
        Raise => "raise" | "error",
    }
}

policy_action! {
    /// What to do when the file is not a valid JSON object.
    ParseErrorAction ("parse_error") {
        /// Continue with an empty, fully defaulted configuration.
        #[default]
        ReturnEmpty => "return_empty" | "reset",
        /// Fail with [`Error::Parse`].
        Raise => "raise" | "error",
    }
}

policy_action! {
    /// What to do when schema keys are absent.
    MissingKeyAction ("missing_key") {
        /// Append the missing defaults after the existing keys.
        #[default]
        UseDefault => "use_default" | "append",
        /// Insert the missing defaults and reorder to schema order.
        UseDefaultSorted => "use_default_sorted" | "append+sort",
        /// Discard the loaded data and use the defaults.
        Reset => "reset",
        /// Fail with [`Error::MissingKeys`].
        Raise => "raise" | "error",
    }
}

policy_action! {
    /// What to do when the file holds keys the schema does not declare.
    ExtraKeyAction ("extra_key") {
        /// Remove the unknown keys.
        #[default]
        Delete => "delete",
        /// Remove the unknown keys and reorder to schema order.
        DeleteSorted => "delete_sorted" | "delete+sort",
        /// Discard the loaded data and use the defaults.
        Reset => "reset",
        /// Leave the unknown keys in place.
        Keep => "keep" | "ignore",
        /// Fail with [`Error::ExtraKeys`].
        Raise => "raise" | "error",
    }
}

policy_action! {
    /// What to do when all keys are present but out of schema order.
    DisorderedKeysAction ("disordered_keys") {
        /// Reorder to schema order.
        #[default]
        Sort => "sort",
        /// Leave the order as loaded.
        Keep => "keep" | "ignore",
        /// Fail with [`Error::DisorderedKeys`].
        Raise => "raise" | "error",
    }
}

policy_action! {
    /// What to do when a value's kind does not match its default.
    TypeMismatchAction ("type_mismatch") {
        /// Convert the value, falling back to the default when no
        /// conversion exists.
        #[default]
        Coerce => "coerce",
        /// Replace the value with the default.
        Default => "default" | "reset",
        /// Fail with [`Error::TypeMismatch`].
        Raise => "raise" | "error",
    }
}

/// Per-situation behaviour of the loader.
///
/// # Examples
///
/// ```
/// use keepconf::policy::{ParseErrorAction, Policy, TypeMismatchAction};
///
/// let mut policy = Policy::default().with_parse_error(ParseErrorAction::Raise);
/// policy.set("type_mismatch", "default").unwrap();
///
/// assert_eq!(policy.on_parse_error, ParseErrorAction::Raise);
/// assert_eq!(policy.on_type_mismatch, TypeMismatchAction::Default);
/// assert!(policy.set("type_mismatch", "shrug").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    /// Behaviour when the file does not exist.
    pub on_not_found: NotFoundAction,
    /// Behaviour when the file is not a valid JSON object.
    pub on_parse_error: ParseErrorAction,
    /// Behaviour when schema keys are absent.
    pub on_missing_key: MissingKeyAction,
    /// Behaviour when the file has keys the schema does not declare.
    pub on_extra_key: ExtraKeyAction,
    /// Behaviour when keys are complete but out of order.
    pub on_disordered_keys: DisorderedKeysAction,
    /// Behaviour when a value's kind does not match its default.
    pub on_type_mismatch: TypeMismatchAction,
}

impl Policy {
    /// A policy that surfaces every problem as an error.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            on_not_found: NotFoundAction::Raise,
            on_parse_error: ParseErrorAction::Raise,
            on_missing_key: MissingKeyAction::Raise,
            on_extra_key: ExtraKeyAction::Raise,
            on_disordered_keys: DisorderedKeysAction::Raise,
            on_type_mismatch: TypeMismatchAction::Raise,
        }
    }

    /// Set the not-found behaviour.
    #[must_use]
    pub const fn with_not_found(mut self, action: NotFoundAction) -> Self {
        self.on_not_found = action;
        self
    }

    /// Set the parse-error behaviour.
    #[must_use]
    pub const fn with_parse_error(mut self, action: ParseErrorAction) -> Self {
        self.on_parse_error = action;
        self
    }

    /// Set the missing-key behaviour.
    #[must_use]
    pub const fn with_missing_key(mut self, action: MissingKeyAction) -> Self {
        self.on_missing_key = action;
        self
    }

    /// Set the extra-key behaviour.
    #[must_use]
    pub const fn with_extra_key(mut self, action: ExtraKeyAction) -> Self {
        self.on_extra_key = action;
        self
    }

    /// Set the disordered-keys behaviour.
    #[must_use]
    pub const fn with_disordered_keys(mut self, action: DisorderedKeysAction) -> Self {
        self.on_disordered_keys = action;
        self
    }

    /// Set the type-mismatch behaviour.
    #[must_use]
    pub const fn with_type_mismatch(mut self, action: TypeMismatchAction) -> Self {
        self.on_type_mismatch = action;
        self
    }

    /// Configure one situation by name.
    ///
    /// Situations: `not_found`, `parse_error` (or `syntax_error`),
    /// `missing_key`, `extra_key`, `disordered_keys`, `type_mismatch`.
    /// Names are case-insensitive, hyphens and an `on_` prefix are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicy`] if the situation is unknown or the
    /// action is not valid for it. The policy is unchanged on error.
    pub fn set(&mut self, situation: &str, action: &str) -> Result<()> {
        let normalized = normalize(situation);
        let key = normalized.strip_prefix("on_").unwrap_or(&normalized);

        match key.replace('_', "").as_str() {
            "notfound" => self.on_not_found = action.parse()?,
            "parseerror" | "syntaxerror" => self.on_parse_error = action.parse()?,
            "missingkey" | "missingkeys" => self.on_missing_key = action.parse()?,
            "extrakey" | "extrakeys" => self.on_extra_key = action.parse()?,
            "disorderedkeys" => self.on_disordered_keys = action.parse()?,
            "typemismatch" => self.on_type_mismatch = action.parse()?,
            _ => {
                return Err(Error::InvalidPolicy {
                    message: format!("unknown situation '{situation}'"),
                })
            }
        }

        Ok(())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}
