use alloc::sync::Arc;
use core::fmt;

/// Failure of a single collection operation.
///
/// A failed operation leaves the collection and every subscribed controller exactly as they were
/// before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListError {
    /// An index-accepting operation was given an index outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// `start` was outside `0..=len`, or `delete_count` exceeded the items available from `start`.
    InvalidSplice {
        start: usize,
        delete_count: usize,
        len: usize,
    },
    /// The collection was mutated from inside one of its own change notifications.
    ReentrantMutation,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of length {len}")
            }
            Self::InvalidSplice {
                start,
                delete_count,
                len,
            } => write!(
                f,
                "invalid splice: start={start}, delete_count={delete_count}, len={len}"
            ),
            Self::ReentrantMutation => {
                f.write_str("list mutated while its change notification was being delivered")
            }
        }
    }
}

impl core::error::Error for ListError {}

/// A non-fatal advisory about the collection's keys.
///
/// Diagnostics never abort an operation. They are logged (with `feature = "tracing"`) and handed
/// to the collection's [`DiagnosticSink`], if one is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic<K> {
    /// The collection was built without a key extractor and uses positional keys, which change
    /// meaning whenever items are inserted, removed or reordered.
    MissingKeyExtractor,
    /// Two items of the same snapshot produced the same key. Rendering falls back to
    /// last-write-wins for the colliding key.
    DuplicateKey {
        key: K,
        first_index: usize,
        second_index: usize,
    },
}

impl<K> fmt::Display for Diagnostic<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKeyExtractor => f.write_str(
                "missing key extractor: positional keys do not survive insertion or reordering",
            ),
            Self::DuplicateKey {
                first_index,
                second_index,
                ..
            } => write!(
                f,
                "duplicate key at indexes {first_index} and {second_index}"
            ),
        }
    }
}

/// Receives advisory [`Diagnostic`]s, separately from the `Result` error channel.
pub type DiagnosticSink<K> = Arc<dyn Fn(&Diagnostic<K>) + Send + Sync>;
