//! Argument binding.
//!
//! Maps argument tokens positionally onto a command's parameters. Binding
//! is all-or-nothing: any failure abandons the invocation before the
//! handler runs.

use super::command::Command;
use crate::error::DispatchError;
use std::collections::HashMap;

/// Parameters resolved for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    pub parameters: HashMap<String, String>,
    pub rest: Vec<String>,
}

/// Bind `tokens` to the parameters of `command`.
///
/// `path` names the command in errors (e.g. `points add`).
pub fn bind(command: &Command, path: &str, tokens: &[String]) -> Result<BoundArgs, DispatchError> {
    let params = command.params();
    if tokens.len() > params.len() && !command.allows_rest() {
        return Err(DispatchError::TooManyArguments {
            command: path.to_string(),
            expected: params.len(),
            got: tokens.len(),
        });
    }

    let mut bound = BoundArgs::default();
    for (index, token) in tokens.iter().enumerate() {
        match params.get(index) {
            Some(param) => {
                bound
                    .parameters
                    .insert(param.name().to_string(), token.clone());
            }
            None => bound.rest.push(token.clone()),
        }
    }

    for param in params {
        if bound.parameters.contains_key(param.name()) {
            continue;
        }
        if param.is_required() {
            return Err(DispatchError::MissingRequiredParameter {
                command: path.to_string(),
                parameter: param.name().to_string(),
            });
        }
        if let Some(default) = param.default_value() {
            bound
                .parameters
                .insert(param.name().to_string(), default.to_string());
        }
    }

    for param in params {
        if let Some(value) = bound.parameters.get(param.name())
            && !param.accepts(value)
        {
            return Err(DispatchError::InvalidParameterValue {
                command: path.to_string(),
                parameter: param.name().to_string(),
                value: value.clone(),
            });
        }
    }

    Ok(bound)
}
