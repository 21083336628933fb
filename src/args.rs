//! Maps positional tokens onto a command's declared argument schema.

use std::collections::HashMap;

use crate::models::{ArgSpec, ArgValue};

pub type NamedParams = HashMap<String, ArgValue>;

/// Bind positional arguments to named, typed parameters.
///
/// An empty-string positional counts as absent and falls through to the
/// entry's default (or null).
pub fn bind(schema: &[ArgSpec], positional: &[String]) -> NamedParams {
    let mut named = NamedParams::with_capacity(schema.len());

    for (i, spec) in schema.iter().enumerate() {
        let value = match positional.get(i) {
            Some(token) if !token.is_empty() => spec.kind.coerce(token),
            _ => spec
                .default_value
                .clone()
                .unwrap_or(ArgValue::Null),
        };
        named.insert(spec.name.clone(), value);
    }

    named
}
