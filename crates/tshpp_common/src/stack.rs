//! Stack growth for recursive tree walks.
//!
//! Trees produced from pathological input (thousands of nested parentheses, say)
//! are cloned, visited and dropped recursively. Each recursion step goes through
//! [`ensure_sufficient_stack`], which moves execution onto a freshly allocated
//! segment when the current one is running out.

/// Grow when less than this many bytes remain.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Runs `f`, first switching to a new stack segment if the remaining stack is
/// below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm manages its own stack
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    /// A linked chain, dropped recursively through the guard.
    struct Link(Option<Box<Link>>);

    impl Drop for Link {
        fn drop(&mut self) {
            if let Some(next) = self.0.take() {
                ensure_sufficient_stack(move || drop(next));
            }
        }
    }

    #[test]
    fn nested_calls_return_value() {
        fn depth(n: u32) -> u32 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }
        assert_eq!(depth(200_000), 200_000);
    }

    #[test]
    fn deep_chain_drops() {
        let mut head = Link(None);
        for _ in 0..200_000 {
            head = Link(Some(Box::new(head)));
        }
        drop(head);
    }
}
