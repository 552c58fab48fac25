//! Patch lookup and argument merging
//!
//! A patch adds volumes and environment entries to a component verbatim and
//! merges its argument directives into the component's `--key=value` flags.
//! After a merge the flags are always sorted, so the final argument list
//! does not depend on the order patches were declared in.

use std::collections::HashMap;

use super::model::{Component, ComponentPatch, ExtraArg};

const FLAG_PREFIX: &str = "--";

/// Return the first patch whose name matches `component_name`
pub fn find_patch<'a>(
    patches: &'a [ComponentPatch],
    component_name: &str,
) -> Option<&'a ComponentPatch> {
    patches.iter().find(|patch| patch.name == component_name)
}

/// Apply every patch targeting `component`, in list order
pub fn apply_patches(component: &mut Component, patches: &[ComponentPatch]) {
    for patch in patches {
        apply_patch(component, patch);
    }
}

/// Apply a single patch; a patch for another component is a no-op
pub fn apply_patch(component: &mut Component, patch: &ComponentPatch) {
    if patch.name != component.name {
        return;
    }

    component.volumes.extend(patch.extra_volumes.iter().cloned());
    component.envs.extend(patch.extra_envs.iter().cloned());
    component.args = merge_args(&component.args, &patch.extra_args);
}

/// Split a `--key=value` token into its key and value.
///
/// Only the first `=` separates the two, so a value may itself contain `=`.
/// Tokens without the `--` prefix, without `=`, or with an empty key or
/// value yield `None`.
pub fn parse_arg(token: &str) -> Option<(&str, &str)> {
    let flag = token.strip_prefix(FLAG_PREFIX)?;
    let (key, value) = flag.split_once('=')?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Merge argument directives into `args` and return the sorted result.
///
/// Tokens that [`parse_arg`] rejects are dropped from the output.
pub fn merge_args(args: &[String], extra_args: &[ExtraArg]) -> Vec<String> {
    let mut values_by_key: HashMap<&str, Vec<&str>> = HashMap::new();
    for (key, value) in args.iter().filter_map(|arg| parse_arg(arg)) {
        values_by_key.entry(key).or_default().push(value);
    }

    for extra in extra_args {
        let values = values_by_key.entry(extra.key.as_str()).or_default();
        // Override acts on what has accumulated so far, including earlier directives
        if extra.r#override && !values.is_empty() {
            values.clear();
        }
        values.push(extra.value.as_str());
    }

    let mut merged: Vec<String> = values_by_key
        .into_iter()
        .flat_map(|(key, values)| {
            values
                .into_iter()
                .map(move |value| format!("{FLAG_PREFIX}{key}={value}"))
        })
        .collect();
    merged.sort();
    merged
}
