/// 麻将牌类型
///
/// 韩国麻将使用 104 张牌：
/// - 万子、筒子各 36 张（1-9 各 4 张）
/// - 索子只有 1 索 4 张，作为花牌使用，不参与牌型
/// - 风牌（东南西北）各 4 张，共 16 张
/// - 三元牌（中发白）各 4 张，共 12 张
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Tile {
    /// 万子（1-9）
    Man(u8),
    /// 筒子（1-9）
    Tong(u8),
    /// 索子（1 为花牌；2-9 属于合法标识空间但不在流通牌池中）
    Sak(u8),
    /// 风牌
    Wind(Wind),
    /// 三元牌
    Dragon(Dragon),
}

/// 花色枚举（数牌）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Man = 0,
    Tong = 1,
    Sak = 2,
}

impl Suit {
    /// 所有花色
    pub fn all() -> [Suit; 3] {
        [Suit::Man, Suit::Tong, Suit::Sak]
    }
}

/// 风牌枚举（按座位顺序：东南西北）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Wind {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    /// 所有风牌
    pub fn all() -> [Wind; 4] {
        [Wind::East, Wind::South, Wind::West, Wind::North]
    }

    /// 从索引创建（0-3）
    pub fn from_index(index: u8) -> Option<Wind> {
        match index {
            0 => Some(Wind::East),
            1 => Some(Wind::South),
            2 => Some(Wind::West),
            3 => Some(Wind::North),
            _ => None,
        }
    }
}

/// 三元牌枚举（中、发、白）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Dragon {
    Red = 0,
    Green = 1,
    White = 2,
}

impl Dragon {
    /// 所有三元牌
    pub fn all() -> [Dragon; 3] {
        [Dragon::Red, Dragon::Green, Dragon::White]
    }
}

impl Tile {
    /// 流通总牌数：104 张
    pub const TOTAL_COUNT: usize = 104;

    /// 每种牌的数量：4 张
    pub const COPIES: u8 = 4;

    /// 数牌的数字范围：1-9
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;

    /// 牌类总数（标识空间）：27 种数牌 + 4 风 + 3 元 = 34
    pub const NUM_CLASSES: usize = 34;

    /// 创建一张数牌，验证输入有效性
    ///
    /// 超出目录范围的标识（rank 0、rank 10 等）返回 `None`，
    /// 不会进入手牌或牌墙状态。
    pub fn suited(suit: Suit, rank: u8) -> Option<Self> {
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            return None;
        }
        Some(match suit {
            Suit::Man => Tile::Man(rank),
            Suit::Tong => Tile::Tong(rank),
            Suit::Sak => Tile::Sak(rank),
        })
    }

    /// 获取花色（字牌返回 None）
    pub fn suit(&self) -> Option<Suit> {
        match self {
            Tile::Man(_) => Some(Suit::Man),
            Tile::Tong(_) => Some(Suit::Tong),
            Tile::Sak(_) => Some(Suit::Sak),
            _ => None,
        }
    }

    /// 获取数字（字牌返回 None）
    pub fn rank(&self) -> Option<u8> {
        match self {
            Tile::Man(r) | Tile::Tong(r) | Tile::Sak(r) => Some(*r),
            _ => None,
        }
    }

    /// 是否为花牌（唯一的花牌是 1 索）
    pub fn is_flower(&self) -> bool {
        matches!(self, Tile::Sak(1))
    }

    /// 是否为字牌（风牌或三元牌）
    pub fn is_honor(&self) -> bool {
        matches!(self, Tile::Wind(_) | Tile::Dragon(_))
    }

    /// 是否为幺九牌或字牌（断幺判定用）
    pub fn is_terminal_or_honor(&self) -> bool {
        match self {
            Tile::Man(r) | Tile::Tong(r) | Tile::Sak(r) => *r == 1 || *r == 9,
            Tile::Wind(_) | Tile::Dragon(_) => true,
        }
    }

    /// 转换为 u8 索引（0-33）
    ///
    /// 映射规则：
    /// - 万子：0-8
    /// - 筒子：9-17
    /// - 索子：18-26
    /// - 风牌：27-30（东南西北）
    /// - 三元牌：31-33（中发白）
    pub fn to_index(&self) -> u8 {
        match self {
            Tile::Man(r) => r - 1,
            Tile::Tong(r) => 9 + r - 1,
            Tile::Sak(r) => 18 + r - 1,
            Tile::Wind(w) => 27 + *w as u8,
            Tile::Dragon(d) => 31 + *d as u8,
        }
    }

    /// 从 u8 索引创建牌（0-33）
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0..=8 => Some(Tile::Man(index + 1)),
            9..=17 => Some(Tile::Tong(index - 9 + 1)),
            18..=26 => Some(Tile::Sak(index - 18 + 1)),
            27..=30 => Wind::from_index(index - 27).map(Tile::Wind),
            31 => Some(Tile::Dragon(Dragon::Red)),
            32 => Some(Tile::Dragon(Dragon::Green)),
            33 => Some(Tile::Dragon(Dragon::White)),
            _ => None,
        }
    }

    /// 排序键：万 → 筒 → 索(2-9) → 风牌 → 三元牌 → 花牌
    ///
    /// 手牌展示的固定排列顺序，花牌永远排在最后。
    pub fn sort_key(&self) -> (u8, u8) {
        match self {
            Tile::Man(r) => (1, *r),
            Tile::Tong(r) => (2, *r),
            Tile::Sak(1) => (9, 1),
            Tile::Sak(r) => (3, *r),
            Tile::Wind(w) => (4, *w as u8 + 1),
            Tile::Dragon(d) => (4, *d as u8 + 5),
        }
    }

    /// 生成完整的 104 张流通牌（未洗牌）
    ///
    /// 索子只生成 4 张 1 索（花牌），2-9 索不进入牌池。
    pub fn full_set() -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(Self::TOTAL_COUNT);

        for suit in [Suit::Man, Suit::Tong] {
            for rank in Self::MIN_RANK..=Self::MAX_RANK {
                for _ in 0..Self::COPIES {
                    if let Some(tile) = Tile::suited(suit, rank) {
                        tiles.push(tile);
                    }
                }
            }
        }

        // 花牌：1 索 4 张
        for _ in 0..Self::COPIES {
            tiles.push(Tile::Sak(1));
        }

        for wind in Wind::all() {
            for _ in 0..Self::COPIES {
                tiles.push(Tile::Wind(wind));
            }
        }

        for dragon in Dragon::all() {
            for _ in 0..Self::COPIES {
                tiles.push(Tile::Dragon(dragon));
            }
        }

        tiles
    }
}

/// 按排序键排序牌列表（基准视角）
pub fn sort_tiles(tiles: &mut [Tile]) {
    tiles.sort_by_key(Tile::sort_key);
}

/// 按座位视角排序牌列表
///
/// 对面和右侧座位从中心看是镜像方向，排序后反转。
pub fn sort_tiles_for_seat_view(tiles: &mut Vec<Tile>, mirrored: bool) {
    sort_tiles(tiles);
    if mirrored {
        tiles.reverse();
    }
}
