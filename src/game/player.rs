use crate::game::scoring::Meld;
use crate::tile::tile::Wind;
use crate::tile::{Hand, Tile};

/// 玩家状态
///
/// 手牌、副露、花牌堆和弃牌河都归属唯一的座位；
/// 跨座位的修改只发生在状态机的动作处理里。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    /// 座位（0-3）
    pub seat: u8,
    /// 自风（每局按庄家重新分配）
    pub wind: Wind,
    /// 手牌
    pub hand: Hand,
    /// 副露（碰/杠）
    pub melds: Vec<Meld>,
    /// 花牌堆（摸到即置出，不参与牌型）
    pub flowers: Vec<Tile>,
    /// 弃牌河（按弃牌顺序追加；只有最后一张可被鸣牌）
    pub discards: Vec<Tile>,
}

impl Player {
    /// 创建新玩家
    pub fn new(seat: u8) -> Self {
        Self {
            seat,
            wind: Wind::East,
            hand: Hand::new(),
            melds: Vec::new(),
            flowers: Vec::new(),
            discards: Vec::new(),
        }
    }

    /// 是否门清
    ///
    /// 只有暗杠不破坏门清；碰、明杠、加杠都算副露。
    pub fn is_concealed(&self) -> bool {
        self.melds.iter().all(Meld::is_concealed_kong)
    }

    /// 花牌数量
    pub fn flower_count(&self) -> u8 {
        self.flowers.len() as u8
    }

    /// 静止状态的标准手牌数：13 - 3 × 副露数
    pub fn rest_hand_size(&self) -> usize {
        13 - 3 * self.melds.len()
    }

    /// 持有待打牌时的手牌数：14 - 3 × 副露数
    pub fn full_hand_size(&self) -> usize {
        14 - 3 * self.melds.len()
    }

    /// 副露实际占用的牌数（碰 3 张、杠 4 张）
    pub fn meld_tile_count(&self) -> usize {
        self.melds.iter().map(Meld::tile_count).sum()
    }

    /// 收一张花牌进花牌堆
    pub fn stash_flower(&mut self, tile: Tile) {
        debug_assert!(tile.is_flower());
        self.flowers.push(tile);
    }

    /// 弃牌河最后一张（唯一可被鸣的牌）
    pub fn last_discard(&self) -> Option<Tile> {
        self.discards.last().copied()
    }

    /// 从弃牌河取走最后一张（被鸣牌时）
    pub fn take_last_discard(&mut self) -> Option<Tile> {
        self.discards.pop()
    }
}
