// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Collision resolution for resource identifiers within a single run.

use std::collections::{HashMap, HashSet};

use crate::identifier::ResourceIdentifier;

/// First numeric suffix handed out to a repeated identifier.
const FIRST_SUFFIX: usize = 2;

/// Assigns unique identifiers in the order candidates are offered.
///
/// The first monitor offering a candidate keeps it unchanged. Every repeat
/// receives `{candidate}_{n}` with `n` starting at 2, skipping any suffixed
/// form that was already handed out.
///
/// # Examples
///
/// ```
/// use monitor2tf::{Deduplicator, ResourceIdentifier};
///
/// let mut dedupe = Deduplicator::default();
/// let first = dedupe.assign(ResourceIdentifier::sanitize("CPU High",),);
/// let second = dedupe.assign(ResourceIdentifier::sanitize("cpu high",),);
/// assert_eq!(first.as_str(), "cpu_high");
/// assert_eq!(second.as_str(), "cpu_high_2");
/// ```
#[derive(Debug, Default,)]
pub struct Deduplicator
{
    counters: HashMap<ResourceIdentifier, usize,>,
    emitted:  HashSet<ResourceIdentifier,>,
}

impl Deduplicator
{
    /// Returns a unique identifier for `candidate` and records it as taken.
    pub fn assign(&mut self, candidate: ResourceIdentifier,) -> ResourceIdentifier
    {
        if !self.emitted.contains(&candidate,) && !self.counters.contains_key(&candidate,) {
            self.counters.insert(candidate.clone(), FIRST_SUFFIX,);
            self.emitted.insert(candidate.clone(),);
            return candidate;
        }

        let counter = self.counters.entry(candidate.clone(),).or_insert(FIRST_SUFFIX,);
        let mut resolved = candidate.with_suffix(*counter,);
        while self.emitted.contains(&resolved,) {
            *counter += 1;
            resolved = candidate.with_suffix(*counter,);
        }
        *counter += 1;

        self.emitted.insert(resolved.clone(),);
        resolved
    }
}

/// Deduplicates a whole sequence, preserving its length and order.
pub fn deduplicate<I,>(candidates: I,) -> Vec<ResourceIdentifier,>
where
    I: IntoIterator<Item = ResourceIdentifier,>,
{
    let mut dedupe = Deduplicator::default();
    candidates.into_iter().map(|candidate| dedupe.assign(candidate,),).collect()
}

#[cfg(test)]
mod tests
{
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::deduplicate;
    use crate::identifier::ResourceIdentifier;

    fn identifiers(values: &[&str],) -> Vec<ResourceIdentifier,>
    {
        values
            .iter()
            .map(|value| ResourceIdentifier::parse(value,).expect("valid identifier",),)
            .collect()
    }

    fn as_strings(values: &[ResourceIdentifier],) -> Vec<&str,>
    {
        values.iter().map(ResourceIdentifier::as_str,).collect()
    }

    proptest! {
        #[test]
        fn output_is_unique_and_preserves_first_occurrences(
            raw in prop::collection::vec("[ab](_[2-4]){0,2}", 0..24)
        ) {
            let candidates: Vec<ResourceIdentifier> = raw
                .iter()
                .map(|value| ResourceIdentifier::parse(value).expect("valid identifier"))
                .collect();
            let resolved = deduplicate(candidates.clone());

            prop_assert_eq!(resolved.len(), candidates.len());
            let distinct: HashSet<_> = resolved.iter().collect();
            prop_assert_eq!(distinct.len(), resolved.len());

            let mut seen = HashSet::new();
            for (candidate, output) in candidates.iter().zip(&resolved) {
                if seen.insert(candidate.clone()) {
                    let suffixed = output != candidate;
                    // A first occurrence is only renamed when an earlier
                    // repeat already produced exactly this string.
                    if suffixed {
                        prop_assert!(resolved.iter().any(|other| other == candidate));
                    }
                }
            }
        }
    }

    #[test]
    fn first_occurrence_keeps_name()
    {
        let resolved = deduplicate(identifiers(&["cpu_high", "cpu_high", "cpu_high"],),);
        assert_eq!(as_strings(&resolved), vec!["cpu_high", "cpu_high_2", "cpu_high_3"]);
    }

    #[test]
    fn distinct_names_are_untouched()
    {
        let resolved = deduplicate(identifiers(&["a", "b", "c"],),);
        assert_eq!(as_strings(&resolved), vec!["a", "b", "c"]);
    }

    #[test]
    fn suffixed_form_skips_names_already_taken()
    {
        let resolved = deduplicate(identifiers(&["disk", "disk_2", "disk"],),);
        assert_eq!(as_strings(&resolved), vec!["disk", "disk_2", "disk_3"]);
    }

    #[test]
    fn later_literal_collision_with_suffixed_form_is_resolved()
    {
        let resolved = deduplicate(identifiers(&["disk", "disk", "disk_2"],),);
        assert_eq!(as_strings(&resolved), vec!["disk", "disk_2", "disk_2_2"]);
    }

    #[test]
    fn empty_input_yields_empty_output()
    {
        assert!(deduplicate(Vec::new(),).is_empty());
    }
}
