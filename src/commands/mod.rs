//! Command system.
//!
//! - [`tokenizer`]: splits a command line into name and argument tokens
//! - [`command`]: command and parameter definitions, handler arguments
//! - [`registry`]: name to command lookup
//! - [`binder`]: positional argument binding against a parameter schema
//! - [`dispatcher`]: role checks, subcommand descent, handler invocation
//! - [`builtin`]: commands every bot gets

pub mod binder;
pub mod builtin;
pub mod command;
pub mod dispatcher;
pub mod registry;
pub mod tokenizer;

pub use binder::{BoundArgs, bind};
pub use command::{
    Command, CommandArgs, CommandHandler, HandlerResult, Parameter, Presence, Validator,
};
pub use dispatcher::{Dispatcher, ErrorReplyPolicy};
pub use registry::CommandRegistry;
pub use tokenizer::tokenize;
