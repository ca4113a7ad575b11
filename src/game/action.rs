use crate::tile::Tile;

/// 自家回合动作（对刚摸的状态可用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SelfAction {
    /// 暗杠：手牌中有四张相同的牌
    ClosedKong { tile: Tile },
    /// 加杠：已碰的刻子补上手里的第四张
    AddedKong { tile: Tile },
}

impl SelfAction {
    /// 动作涉及的牌
    pub fn tile(&self) -> Tile {
        match self {
            SelfAction::ClosedKong { tile } | SelfAction::AddedKong { tile } => *tile,
        }
    }
}

/// 对他家弃牌的响应动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CallAction {
    /// 荣和：用弃牌完成牌型
    Ron { tile: Tile },
    /// 碰：手牌两张 + 弃牌一张
    Pung { tile: Tile },
    /// 明杠：手牌三张 + 弃牌一张
    OpenKong { tile: Tile },
}

impl CallAction {
    /// 动作涉及的牌
    pub fn tile(&self) -> Tile {
        match self {
            CallAction::Ron { tile } | CallAction::Pung { tile } | CallAction::OpenKong { tile } => {
                *tile
            }
        }
    }

    /// 优先级序数：荣和 > 杠 > 碰（数字越小越优先）
    pub fn priority(&self) -> u8 {
        match self {
            CallAction::Ron { .. } => 0,
            CallAction::OpenKong { .. } => 1,
            CallAction::Pung { .. } => 2,
        }
    }
}
