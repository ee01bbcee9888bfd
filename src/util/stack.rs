/// Stack space that must remain before recursing further.
const RED_ZONE: usize = 128 * 1024;

/// Size of each extra stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
///
/// The parser and the evaluator recurse once per level of nesting in the
/// source, so every recursive entry point goes through here.
///
/// # Example
/// ```
/// use aplite::util::stack::ensure_sufficient_stack;
///
/// fn count(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { count(n - 1) + 1 })
/// }
///
/// assert_eq!(count(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}
