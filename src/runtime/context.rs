use std::cell::Cell;

use crate::atoms::SharedOutput;
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigError, SprigResult};
use crate::syntax::Keywords;

/// Default bound on nested (non-tail) evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// A container for the services the evaluator and primitives need: keyword
/// handles for special-form dispatch, the output sink, and the depth budget.
pub struct EvalContext {
    pub keywords: Keywords,
    pub output: SharedOutput,
    pub max_depth: usize,
    depth: Cell<usize>,
}

impl EvalContext {
    pub fn new(keywords: Keywords, output: SharedOutput, max_depth: usize) -> Self {
        Self {
            keywords,
            output,
            max_depth,
            depth: Cell::new(0),
        }
    }

    /// Current nesting of evaluator invocations.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Claims one level of nesting for the lifetime of the returned guard.
    pub(crate) fn enter(&self) -> SprigResult<DepthGuard<'_>> {
        let next = self.depth.get() + 1;
        if next > self.max_depth {
            return Err(self
                .report(ErrorKind::RecursionLimit {
                    limit: self.max_depth,
                })
                .with_help("non-tail recursion nests one level per call; rewrite the call in tail position or raise --max-depth"));
        }
        self.depth.set(next);
        Ok(DepthGuard(&self.depth))
    }
}

impl ErrorReporting for EvalContext {
    fn report(&self, kind: ErrorKind) -> SprigError {
        SprigError::new(kind, Phase::Eval)
    }
}

pub(crate) struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::NullSink;
    use crate::syntax::SymbolTable;

    #[test]
    fn depth_is_released_when_guards_drop() {
        let mut symbols = SymbolTable::new();
        let ctx = EvalContext::new(Keywords::new(&mut symbols), SharedOutput::new(NullSink), 2);
        {
            let _a = ctx.enter().unwrap();
            let _b = ctx.enter().unwrap();
            assert_eq!(ctx.depth(), 2);
            let err = ctx.enter().map(|_| ()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::RecursionLimit { limit: 2 });
        }
        assert_eq!(ctx.depth(), 0);
    }
}
