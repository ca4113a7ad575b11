use crate::game::player::Player;
use crate::game::scoring::Meld;
use crate::tile::Tile;

/// 杠类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum KongType {
    /// 明杠（别人打出的牌，手里三张凑成四张）
    Open,
    /// 加杠（已经碰了三张，摸到第四张补上）
    Added,
    /// 暗杠（手牌中有四张相同的牌，自己杠）
    Closed,
}

/// 杠操作器
pub struct KongHandler;

impl KongHandler {
    /// 检查是否可以明杠：手牌中有三张与弃牌相同的牌
    pub fn can_open_kong(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) >= 3
    }

    /// 检查是否可以暗杠：手牌中有四张相同的牌
    pub fn can_closed_kong(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) == 4
    }

    /// 检查是否可以加杠
    ///
    /// 加杠条件：已有该牌的碰副露，且手牌中有第四张。
    pub fn can_added_kong(player: &Player, tile: &Tile) -> bool {
        let has_pung = player
            .melds
            .iter()
            .any(|meld| matches!(meld, Meld::Pung { tile: t, .. } if t == tile));
        has_pung && player.hand.has_tile(*tile)
    }

    /// 手牌中所有可以暗杠的牌类
    pub fn closed_kong_candidates(player: &Player) -> Vec<Tile> {
        let mut candidates: Vec<Tile> = player
            .hand
            .tiles_map()
            .iter()
            .filter(|(_, &count)| count == 4)
            .map(|(tile, _)| *tile)
            .collect();
        candidates.sort_by_key(Tile::sort_key);
        candidates
    }

    /// 手牌中所有可以加杠的牌类
    pub fn added_kong_candidates(player: &Player) -> Vec<Tile> {
        let mut candidates: Vec<Tile> = player
            .melds
            .iter()
            .filter_map(|meld| match meld {
                Meld::Pung { tile, .. } if player.hand.has_tile(*tile) => Some(*tile),
                _ => None,
            })
            .collect();
        candidates.sort_by_key(Tile::sort_key);
        candidates
    }

    /// 执行明杠：从手牌移除三张，加入明杠副露
    pub fn open_kong(player: &mut Player, tile: Tile, from_seat: u8) -> bool {
        if !KongHandler::can_open_kong(player, &tile) {
            return false;
        }

        for _ in 0..3 {
            if !player.hand.remove_tile(tile) {
                return false;
            }
        }

        player.melds.push(Meld::Kong {
            tile,
            kind: KongType::Open,
            from_seat: Some(from_seat),
        });
        true
    }

    /// 执行暗杠：从手牌移除四张，加入暗杠副露
    pub fn closed_kong(player: &mut Player, tile: Tile) -> bool {
        if !KongHandler::can_closed_kong(player, &tile) {
            return false;
        }

        for _ in 0..4 {
            if !player.hand.remove_tile(tile) {
                return false;
            }
        }

        player.melds.push(Meld::Kong {
            tile,
            kind: KongType::Closed,
            from_seat: None,
        });
        true
    }

    /// 执行加杠：从手牌移除一张，把已有的碰原地改写为杠
    pub fn added_kong(player: &mut Player, tile: Tile) -> bool {
        if !KongHandler::can_added_kong(player, &tile) {
            return false;
        }
        if !player.hand.remove_tile(tile) {
            return false;
        }

        for meld in &mut player.melds {
            if let Meld::Pung { tile: t, from_seat } = *meld {
                if t == tile {
                    *meld = Meld::Kong {
                        tile,
                        kind: KongType::Added,
                        from_seat: Some(from_seat),
                    };
                    return true;
                }
            }
        }
        false
    }
}
