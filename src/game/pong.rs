use crate::game::player::Player;
use crate::game::scoring::Meld;
use crate::tile::Tile;

/// 碰牌操作器
pub struct PungHandler;

impl PungHandler {
    /// 检查是否可以碰牌
    ///
    /// 碰牌条件：手牌中至少有两张与弃牌相同的牌。
    pub fn can_pung(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) >= 2
    }

    /// 执行碰牌
    ///
    /// 从手牌移除两张，加入一组碰副露并记录放铳座位。
    ///
    /// # 返回
    ///
    /// 是否成功碰牌
    pub fn pung(player: &mut Player, tile: Tile, from_seat: u8) -> bool {
        if !PungHandler::can_pung(player, &tile) {
            return false;
        }

        for _ in 0..2 {
            if !player.hand.remove_tile(tile) {
                return false;
            }
        }

        player.melds.push(Meld::Pung { tile, from_seat });
        true
    }
}
