// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Utilities for deriving Terraform resource identifiers from monitor names.
//!
//! Identifiers produced by this module match `[a-zA-Z_][a-zA-Z0-9_]*` and are
//! always lowercase when derived from a display name, which makes them usable
//! both as resource labels and as file name components.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::Error;

/// Identifier used when a name contains no usable characters.
pub const FALLBACK_IDENTIFIER: &str = "monitor";
/// Prefix applied to identifiers that would otherwise start with a digit.
pub const DIGIT_PREFIX: &str = "monitor_";
/// Longest identifier derived from a display name, in bytes.
///
/// Leaves room for deduplication suffixes and the `monitor_` / `.tf` parts of
/// the file name within the common 255-byte file name limit.
pub const MAX_IDENTIFIER_LEN: usize = 200;

static IDENTIFIER_GRAMMAR: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$",).expect("identifier grammar is a valid regex",)
},);

/// Validated Terraform resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,)]
pub struct ResourceIdentifier(String,);

impl ResourceIdentifier
{
    /// Derives an identifier from an arbitrary monitor display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use monitor2tf::ResourceIdentifier;
    ///
    /// let identifier = ResourceIdentifier::sanitize("CPU High (prod)",);
    /// assert_eq!(identifier.as_str(), "cpu_high_prod");
    /// ```
    pub fn sanitize(name: &str,) -> Self
    {
        Self(NameSanitizer::builder(name,).build(),)
    }

    /// Validates an existing string against the identifier grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when the value is
    /// empty, starts with a digit or contains characters outside
    /// `[a-zA-Z0-9_]`.
    pub fn parse(value: &str,) -> Result<Self, Error,>
    {
        if is_valid_identifier(value,) {
            Ok(Self(value.to_owned(),),)
        } else {
            Err(Error::validation(format!("'{value}' is not a valid resource identifier"),),)
        }
    }

    /// Appends a numeric suffix, producing `{self}_{counter}`.
    pub(crate) fn with_suffix(&self, counter: usize,) -> Self
    {
        Self(format!("{}_{counter}", self.0),)
    }

    /// Borrows the identifier as a string slice.
    pub fn as_str(&self,) -> &str
    {
        &self.0
    }

    /// Name of the file holding the resource block for this identifier.
    pub fn file_name(&self,) -> String
    {
        format!("monitor_{}.tf", self.0)
    }
}

impl fmt::Display for ResourceIdentifier
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.0,)
    }
}

/// Returns whether `value` satisfies the Terraform identifier grammar used
/// for generated resources.
pub fn is_valid_identifier(value: &str,) -> bool
{
    IDENTIFIER_GRAMMAR.is_match(value,)
}

/// Builder that turns display names into identifier strings.
#[derive(Debug, Clone, Copy,)]
pub struct NameSanitizer<'input,>
{
    source: &'input str,
}

impl<'input,> NameSanitizer<'input,>
{
    /// Creates a new sanitizer for the provided string slice.
    pub fn builder(source: &'input str,) -> Self
    {
        Self {
            source,
        }
    }

    /// Builds the identifier string.
    ///
    /// The name is lowercased, every run of characters outside `[a-z0-9_]`
    /// collapses into one underscore and surrounding underscores are
    /// stripped. Names left empty map to [`FALLBACK_IDENTIFIER`]; names
    /// starting with a digit receive [`DIGIT_PREFIX`]. The result is cut to
    /// [`MAX_IDENTIFIER_LEN`] bytes, dropping underscores left at the cut.
    pub fn build(self,) -> String
    {
        let mut sanitized = String::with_capacity(self.source.len(),);
        let mut in_invalid_run = false;

        for candidate in self.source.chars().flat_map(char::to_lowercase,) {
            match candidate {
                'a'..='z' | '0'..='9' | '_' => {
                    sanitized.push(candidate,);
                    in_invalid_run = false;
                }
                _ => {
                    if !in_invalid_run {
                        sanitized.push('_',);
                        in_invalid_run = true;
                    }
                }
            }
        }

        let trimmed = sanitized.trim_matches('_',);
        if trimmed.is_empty() {
            return FALLBACK_IDENTIFIER.to_owned();
        }
        let mut identifier = if trimmed.starts_with(|ch: char| ch.is_ascii_digit(),) {
            format!("{DIGIT_PREFIX}{trimmed}")
        } else {
            trimmed.to_owned()
        };

        // ASCII only, so any byte offset is a char boundary.
        if identifier.len() > MAX_IDENTIFIER_LEN {
            identifier.truncate(MAX_IDENTIFIER_LEN,);
            let kept = identifier.trim_end_matches('_',).len();
            identifier.truncate(kept,);
        }
        identifier
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{MAX_IDENTIFIER_LEN, NameSanitizer, ResourceIdentifier, is_valid_identifier};

    proptest! {
        #[test]
        fn sanitized_names_match_identifier_grammar(input in any::<String>()) {
            let identifier = ResourceIdentifier::sanitize(&input);
            prop_assert!(is_valid_identifier(identifier.as_str()));
        }

        #[test]
        fn sanitizing_twice_is_a_no_op(input in "\\PC{0,40}") {
            let once = NameSanitizer::builder(&input).build();
            let twice = NameSanitizer::builder(&once).build();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn sanitized_names_respect_length_limit(input in "[A-Za-z0-9 _-]{0,600}") {
            let identifier = ResourceIdentifier::sanitize(&input);
            prop_assert!(identifier.as_str().len() <= MAX_IDENTIFIER_LEN);
            prop_assert!(is_valid_identifier(identifier.as_str()));
            prop_assert!(!identifier.as_str().ends_with('_'));
        }

        #[test]
        fn sanitizer_is_deterministic(input in "[A-Za-z0-9 _./-]{0,32}") {
            prop_assert_eq!(
                NameSanitizer::builder(&input).build(),
                NameSanitizer::builder(&input).build()
            );
        }
    }

    #[test]
    fn lowercases_and_joins_words()
    {
        assert_eq!(NameSanitizer::builder("CPU High",).build(), "cpu_high");
        assert_eq!(NameSanitizer::builder("cpu high",).build(), "cpu_high");
    }

    #[test]
    fn collapses_runs_of_invalid_characters()
    {
        assert_eq!(NameSanitizer::builder("disk -- usage!!!",).build(), "disk_usage");
    }

    #[test]
    fn keeps_existing_underscores()
    {
        assert_eq!(NameSanitizer::builder("snake__case",).build(), "snake__case");
    }

    #[test]
    fn strips_surrounding_underscores()
    {
        assert_eq!(NameSanitizer::builder("  [prod] latency  ",).build(), "prod_latency");
        assert_eq!(NameSanitizer::builder("__private__",).build(), "private");
    }

    #[test]
    fn empty_names_fall_back()
    {
        assert_eq!(NameSanitizer::builder("",).build(), "monitor");
        assert_eq!(NameSanitizer::builder("!!!",).build(), "monitor");
        assert_eq!(NameSanitizer::builder("世界",).build(), "monitor");
    }

    #[test]
    fn leading_digits_receive_prefix()
    {
        assert_eq!(NameSanitizer::builder("5xx errors",).build(), "monitor_5xx_errors");
        assert_eq!(NameSanitizer::builder("  42",).build(), "monitor_42");
    }

    #[test]
    fn non_ascii_letters_become_separators()
    {
        assert_eq!(NameSanitizer::builder("Café Latency",).build(), "caf_latency");
    }

    #[test]
    fn parse_accepts_valid_identifiers()
    {
        let identifier = ResourceIdentifier::parse("Mixed_Case_1",).expect("valid identifier",);
        assert_eq!(identifier.as_str(), "Mixed_Case_1");
    }

    #[test]
    fn parse_rejects_invalid_identifiers()
    {
        assert!(ResourceIdentifier::parse("",).is_err());
        assert!(ResourceIdentifier::parse("1abc",).is_err());
        assert!(ResourceIdentifier::parse("with-dash",).is_err());
    }

    #[test]
    fn file_name_uses_monitor_prefix()
    {
        let identifier = ResourceIdentifier::sanitize("CPU High",);
        assert_eq!(identifier.file_name(), "monitor_cpu_high.tf");
        assert_eq!(identifier.with_suffix(2,).file_name(), "monitor_cpu_high_2.tf");
    }

    #[test]
    fn long_names_are_capped_below_file_name_limit()
    {
        let title = "Very Long Monitor Title ".repeat(20,);
        let identifier = ResourceIdentifier::sanitize(&title,);

        assert_eq!(identifier.as_str().len(), MAX_IDENTIFIER_LEN);
        assert!(identifier.with_suffix(9999,).file_name().len() <= 255);
    }

    #[test]
    fn cut_does_not_leave_trailing_underscore()
    {
        let title = format!("{}-tail", "a".repeat(MAX_IDENTIFIER_LEN,));
        assert_eq!(NameSanitizer::builder(&title,).build(), "a".repeat(MAX_IDENTIFIER_LEN,));

        let digits = "1".repeat(300,);
        let identifier = NameSanitizer::builder(&digits,).build();
        assert!(identifier.starts_with("monitor_1"));
        assert_eq!(identifier.len(), MAX_IDENTIFIER_LEN);
    }
}
