//! # Dialogue Core
//!
//! Evaluates the condition directives embedded in intrigue dialogue text
//! against the state held by `intrigue_rules`.
//!
//! ## Core Components
//!
//! - **scope**: The four variable scopes a directive can address
//! - **condition**: Directive scanner, comparator and the [`ConditionEngine`]
//! - **dialogue**: Dialogue patterns whose text and choices are driven by the engine
//!
//! ## Directive Syntax
//!
//! - `!if[gold>=10]{"text"}` - template form: `text` replaces the directive when the condition holds
//! - `$if[HasPolicy==Pacifist]` - gate form: decides whether content is shown at all
//!
//! Markers select the scope: `!` global, `#` scheme table, `$` conspirator, `&` target.

pub mod condition;
pub mod dialogue;
pub mod error;
pub mod scope;

pub use condition::{
    ConditionEngine, Diagnostic, EngineConfig, Evaluation, Placeholders, Severity,
};
pub use dialogue::*;
pub use error::*;
pub use scope::*;
