/// 牌相关模块
///
/// 包含牌（Tile）、手牌（Hand）、牌墙（WallManager）和牌型判定

pub mod hand;
pub mod tile;
pub mod wall;
pub mod win_check;

// 重新导出常用类型
pub use hand::Hand;
pub use tile::{Dragon, Suit, Tile, Wind};
pub use wall::{WallCursor, WallManager};
pub use win_check::{Decomposition, Group, WinChecker};
