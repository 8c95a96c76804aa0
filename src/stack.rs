//=====================================================
// File: stack.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Stack safety for recursive parsing, evaluation and decoding
// Objective: Grow the native stack on demand so deep scripts report errors
//            instead of aborting the process
//=====================================================

/// If less than this remains, the stack is grown before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each segment added by [`ensure_sufficient_stack`].
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Budget per nesting level for code that recurses outside our control
/// (serde_json parsing and dropping deep documents).
const STACK_PER_LEVEL: usize = 8 * 1024;

/// Wrap a recursive step; grows the stack when it runs low.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Run `f` on a fresh stack segment sized for `depth` levels of nesting.
pub fn with_stack_for_depth<R>(depth: usize, f: impl FnOnce() -> R) -> R {
    let size = STACK_PER_RECURSION.saturating_add(depth.saturating_mul(STACK_PER_LEVEL));
    stacker::grow(size, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> usize {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn deep_recursion_survives_small_threads() {
        let result = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| depth(200_000))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(result, 200_000);
    }

    #[test]
    fn sized_segment_runs_closure() {
        assert_eq!(with_stack_for_depth(10, || 7), 7);
    }
}
