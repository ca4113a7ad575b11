/// 游戏常量定义

/// 玩家数量
pub const NUM_SEATS: u8 = 4;

/// 流通总牌数（104 张）
pub const TOTAL_TILES: usize = 104;

/// 标准整场局数
pub const DEFAULT_ROUNDS: u32 = 12;

/// 每家的起始分数
pub const STARTING_SCORE: i32 = 50;

/// 最大回合数限制（防活锁护栏，不属于计分规则）
pub const MAX_TURNS: u32 = 200;

/// 同一决策连续被拒的上限，超过按流局收尾
pub const MAX_DECISION_RETRIES: u8 = 8;
