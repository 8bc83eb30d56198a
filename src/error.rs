//! Typed error taxonomy for the allocation engine.
//!
//! Errors are tagged variants with stable numeric codes (1xxx general,
//! 2xxx config, 3xxx CIDR/allocation, 4xxx I/O, 5xxx provider) and carry a
//! structured context map rather than an open string, so callers can match
//! on the kind programmatically while still getting an actionable message.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Arbitrary key/value context attached to an error (e.g. `cidr`, `account`,
/// `region`, `role`, `requiredSpace`, `availableSpace`).
pub type Context = BTreeMap<String, String>;

fn fmt_context(ctx: &Context) -> String {
    if ctx.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = ctx.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(" [{}]", pairs.join(", "))
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("invalid CIDR format: {text}{}", fmt_context(.context))]
    InvalidCidrFormat { text: String, context: Context },

    #[error("invalid prefix length: {prefix}{}", fmt_context(.context))]
    InvalidPrefix { prefix: String, context: Context },

    #[error("CIDR already allocated: {cidr}{}", fmt_context(.context))]
    CidrAlreadyAllocated { cidr: String, context: Context },

    #[error("not enough space left for allocation: {message}{}", fmt_context(.context))]
    InsufficientSpace { message: String, context: Context },

    #[error("invalid operation: {message}{}", fmt_context(.context))]
    InvalidOperation { message: String, context: Context },

    #[error("configuration error: {message}{}", fmt_context(.context))]
    ConfigurationError { message: String, context: Context },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Stable numeric code for programmatic matching, per the §7 ranges.
    pub fn code(&self) -> u32 {
        match self {
            PlannerError::InvalidCidrFormat { .. } => 3001,
            PlannerError::InvalidPrefix { .. } => 3002,
            PlannerError::CidrAlreadyAllocated { .. } => 3003,
            PlannerError::InsufficientSpace { .. } => 3004,
            PlannerError::InvalidOperation { .. } => 1001,
            PlannerError::ConfigurationError { .. } => 2001,
            PlannerError::Io { .. } => 4001,
        }
    }

    pub fn invalid_cidr_format(text: impl Into<String>) -> Self {
        PlannerError::InvalidCidrFormat {
            text: text.into(),
            context: Context::new(),
        }
    }

    pub fn invalid_prefix(prefix: impl fmt::Display) -> Self {
        PlannerError::InvalidPrefix {
            prefix: prefix.to_string(),
            context: Context::new(),
        }
    }

    pub fn cidr_already_allocated(cidr: impl fmt::Display) -> Self {
        PlannerError::CidrAlreadyAllocated {
            cidr: cidr.to_string(),
            context: Context::new(),
        }
    }

    pub fn insufficient_space(message: impl Into<String>) -> Self {
        PlannerError::InsufficientSpace {
            message: message.into(),
            context: Context::new(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        PlannerError::InvalidOperation {
            message: message.into(),
            context: Context::new(),
        }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        PlannerError::ConfigurationError {
            message: message.into(),
            context: Context::new(),
        }
    }

    /// Attach (or overwrite) a context key, consuming and returning self for
    /// chained construction at the call site.
    pub fn with_context(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let ctx = match &mut self {
            PlannerError::InvalidCidrFormat { context, .. }
            | PlannerError::InvalidPrefix { context, .. }
            | PlannerError::CidrAlreadyAllocated { context, .. }
            | PlannerError::InsufficientSpace { context, .. }
            | PlannerError::InvalidOperation { context, .. }
            | PlannerError::ConfigurationError { context, .. } => context,
            PlannerError::Io { .. } => return self,
        };
        ctx.insert(key.into(), value.to_string());
        self
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
