//! Editor properties and the `:set`-style directive parser.
//!
//! [`Properties`] holds the knobs edit actions consult: indentation width,
//! tab width, whether indentation uses spaces, whether the caret may sit
//! past the end of a line, and which side of the caret bracket matching
//! looks at.
//!
//! | Full name      | Abbrev | Type    | Default |
//! |----------------|--------|---------|---------|
//! | `indentsize`   | `sw`   | integer | 4       |
//! | `tabwidth`     | `ts`   | integer | 4       |
//! | `expandtab`    | `et`   | bool    | false   |
//! | `beyondeol`    | `be`   | bool    | false   |
//! | `bracketstyle` | `bs`   | enum    | after   |
//!
//! `shiftwidth` and `tabstop` are accepted as aliases.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a directive could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("option is not a boolean: {0}")]
    NotBoolean(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("{0} must be at least 1")]
    Zero(String),
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Which side of the caret bracket matching inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketStyle {
    /// The bracket just before the caret.
    #[default]
    After,
    /// The bracket under the caret.
    Before,
}

impl fmt::Display for BracketStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::After => f.write_str("after"),
            Self::Before => f.write_str("before"),
        }
    }
}

/// Editor options owned by a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    pub indentation_size: usize,
    pub tab_width: usize,
    pub convert_tabs_to_spaces: bool,
    pub allow_caret_beyond_eol: bool,
    pub bracket_style: BracketStyle,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            indentation_size: 4,
            tab_width: 4,
            convert_tabs_to_spaces: false,
            allow_caret_beyond_eol: false,
            bracket_style: BracketStyle::After,
        }
    }
}

impl Properties {
    /// Apply one parsed directive.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] for unknown names, boolean operations on
    /// non-boolean options, and unparsable or zero values.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<(), OptionError> {
        match directive {
            SetDirective::On(name) => *self.bool_mut(name)? = true,
            SetDirective::Off(name) => *self.bool_mut(name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.bool_mut(name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => self.assign(name, value)?,
        }
        Ok(())
    }

    /// Parse and apply a whole directive string such as `"et sw=2"`.
    ///
    /// Stops at the first failing directive; earlier ones stay applied.
    ///
    /// # Errors
    ///
    /// Propagates the first [`OptionError`].
    pub fn apply_str(&mut self, args: &str) -> Result<(), OptionError> {
        for directive in parse_set(args) {
            self.apply(&directive)?;
        }
        Ok(())
    }

    fn bool_mut(&mut self, name: &str) -> Result<&mut bool, OptionError> {
        match name {
            "expandtab" | "et" => Ok(&mut self.convert_tabs_to_spaces),
            "beyondeol" | "be" => Ok(&mut self.allow_caret_beyond_eol),
            _ if is_known_option(name) => Err(OptionError::NotBoolean(name.to_string())),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "indentsize" | "sw" | "shiftwidth" => {
                self.indentation_size = parse_width(name, value)?;
            }
            "tabwidth" | "ts" | "tabstop" => {
                self.tab_width = parse_width(name, value)?;
            }
            "bracketstyle" | "bs" => {
                self.bracket_style = match value {
                    "after" => BracketStyle::After,
                    "before" => BracketStyle::Before,
                    _ => return Err(invalid()),
                };
            }
            "expandtab" | "et" | "beyondeol" | "be" => {
                let flag = self.bool_mut(name)?;
                *flag = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

fn parse_width(name: &str, value: &str) -> Result<usize, OptionError> {
    let width: usize = value.parse().map_err(|_| OptionError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    if width == 0 {
        return Err(OptionError::Zero(name.to_string()));
    }
    Ok(width)
}

// ---------------------------------------------------------------------------
// Directive parsing
// ---------------------------------------------------------------------------

/// One parsed `:set` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `name` — enable a boolean option.
    On(String),

    /// `noname` — disable a boolean option.
    Off(String),

    /// `name!` — toggle a boolean option.
    Toggle(String),

    /// `name=value`.
    Assign(String, String),
}

/// True for every accepted option name or abbreviation.
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    matches!(
        name,
        "indentsize"
            | "sw"
            | "shiftwidth"
            | "tabwidth"
            | "ts"
            | "tabstop"
            | "expandtab"
            | "et"
            | "beyondeol"
            | "be"
            | "bracketstyle"
            | "bs"
    )
}

/// Split a directive string on whitespace and parse each argument.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // `no` only negates a known option name.
    match arg.strip_prefix("no") {
        Some(name) if is_known_option(name) => SetDirective::Off(name.to_string()),
        _ => SetDirective::On(arg.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
