//! 콘솔 전반에서 사용되는 공통 타입.

mod job;
mod source;

pub use job::*;
pub use source::*;
