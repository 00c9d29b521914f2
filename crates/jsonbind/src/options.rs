/// Configuration for [`JsonWriter`](crate::JsonWriter).
///
/// # Examples
///
/// ```rust
/// use jsonbind::{WriterOptions, to_string_with};
///
/// let options = WriterOptions {
///     pretty: true,
///     indent: 2,
/// };
/// assert_eq!(to_string_with(&vec![1u8], options), "[\n  1\n]");
/// ```
///
/// # Default
///
/// Compact output; four spaces per level once `pretty` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Whether to put every element and member on its own line.
    ///
    /// Empty arrays and objects are always written as `[]` and `{}`, and a
    /// space follows the colon after each key.
    ///
    /// # Default
    ///
    /// `false`
    pub pretty: bool,

    /// Number of spaces per nesting level when `pretty` is set.
    ///
    /// # Default
    ///
    /// `4`
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 4,
        }
    }
}
