//! 经文语料
//!
//! - `canon` - 66 卷书的静态章节表
//! - `index` - 按正典顺序展开的经文索引
//! - `resolver` - 地址、文档路径与可读引用之间的转换

pub mod canon;
pub mod index;
pub mod resolver;

pub use canon::{BookSpec, Testament, CANON, CANON_VERSE_COUNT};
pub use index::{CorpusIndex, UnitAddress};
pub use resolver::{LookupPath, ReferenceResolver};
