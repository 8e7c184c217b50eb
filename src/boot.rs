//! The short source string compiled into the dictionary once, right after
//! the primitive word set is installed (C8). It defines the structured
//! control-flow words in terms of the five branch/patch primitives in
//! `internals::control`: `ahead`/`<back` capture a `here` location and
//! leave a placeholder offset cell for `,` to fill in later; `if`/`else`/
//! `endif` and `begin`/`until`/`again`/`repeat` compile `falsyBranch`/
//! `branch` pairs and patch the placeholder with `-stackFrame` once both
//! ends of the jump are known. `ahead` and `<back` are ordinary (non-
//! immediate) words — they run as plain subroutine calls from inside the
//! immediate words that use them, not as compile-time actions themselves.

pub const SOURCE: &str = "
: ahead                here 0 , ;
: <back                here -stackFrame , ;
: if     immediate     postpone falsyBranch ahead ;
: endif  immediate     here over -stackFrame swap ! ;
: else   immediate     postpone branch ahead swap postpone endif ;
: begin  immediate     here ;
: until  immediate     postpone falsyBranch <back ;
: again  immediate     postpone branch <back ;
: repeat immediate     postpone again postpone endif ;
";
