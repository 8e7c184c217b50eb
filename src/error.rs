//! Error kinds raised by the engine. Primitives raise; `Runtime::query` never
//! catches one — the host surface decides whether to propagate or report and
//! continue.

#[derive(Debug, thiserror::Error)]
pub enum ForthError {
    #[error("stack underflow in {0}")]
    StackUnderflow(&'static str),
    #[error("return stack underflow")]
    ReturnStackUnderflow,
    #[error("compilation stack underflow")]
    CompilationStackUnderflow,
    #[error("unknown word: {0}")]
    UnknownWord(String),
    #[error("bad branch offset")]
    BadBranch,
    #[error("bad stack for 0branch")]
    BadStackForZeroBranch,
    #[error("bad stack frame")]
    BadStackFrame,
    #[error("clone of non-array")]
    CloneNonArray,
    #[error("each needs an array")]
    EachNeedsArray,
    #[error("compileNow: target is not a literal primitive")]
    CompileNowNotPrimitive,
    #[error("uncallable placeholder invoked")]
    UncallableCalled,
    #[error("{0}")]
    UserThrow(String),
    #[error("host bridge error: {0}")]
    Host(String),
}
