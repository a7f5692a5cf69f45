//! Result type definition for desired-state operations.

use crate::error::Error;

/// The standard Result type for kafcfg core operations.
///
/// Use the `?` operator, `match`, or combinator methods to handle results.
///
/// # Examples
///
/// ```ignore
/// fn load() -> Result<TopicConfig> {
///     let config = TopicConfig::from_yaml_str(&text)?;
///     config.validate()?;
///     Ok(config)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
