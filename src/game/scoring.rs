use crate::game::kong::KongType;
use crate::game::yaku::{WinContext, Yaku};
use crate::tile::{Hand, Tile};

/// 碰/杠（副露牌组）
///
/// 碰永远来自他家弃牌；杠分明杠（他家弃牌）、加杠（碰升级）、
/// 暗杠（自家四张）。加杠会原地改写已有的碰。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Meld {
    /// 碰（三张相同牌），记录放铳座位
    Pung { tile: Tile, from_seat: u8 },
    /// 杠（四张相同牌）
    Kong {
        tile: Tile,
        kind: KongType,
        /// 明杠的放铳座位；加杠沿用原碰的来源；暗杠为 None
        from_seat: Option<u8>,
    },
}

impl Meld {
    /// 牌组的牌类
    pub fn tile(&self) -> Tile {
        match self {
            Meld::Pung { tile, .. } | Meld::Kong { tile, .. } => *tile,
        }
    }

    /// 牌组实际占用的牌数（碰 3 张，杠 4 张）
    pub fn tile_count(&self) -> usize {
        match self {
            Meld::Pung { .. } => 3,
            Meld::Kong { .. } => 4,
        }
    }

    /// 是否为暗杠（唯一不破坏门清的副露）
    pub fn is_concealed_kong(&self) -> bool {
        matches!(
            self,
            Meld::Kong {
                kind: KongType::Closed,
                ..
            }
        )
    }
}

/// 基础分：每次和牌固定 10 分起算
pub const BASE_SCORE: u32 = 10;

/// 计算总得分
///
/// 总分 = 基础 10 分 + 各役得分之和 + 门清自摸加 1 分
///        + 自摸加 1 分 + 花牌每张 1 分
///
/// 加法累计，没有上限。
pub fn total_score(yaku: &[Yaku], ctx: &WinContext) -> u32 {
    let mut score = BASE_SCORE;
    score += yaku.iter().map(Yaku::points).sum::<u32>();
    if ctx.is_self_drawn && ctx.is_concealed {
        score += 1;
    }
    if ctx.is_self_drawn {
        score += 1;
    }
    score += ctx.flower_count as u32;
    score
}

/// 把副露合成进手牌得到完整的 14 张判定用牌组
///
/// 每组副露按 3 张同牌计入（杠在牌型判定中按刻子处理）。
pub fn virtual_hand(hand: &Hand, melds: &[Meld]) -> Hand {
    let mut virtual_hand = hand.clone();
    for meld in melds {
        for _ in 0..3 {
            virtual_hand.add_tile(meld.tile());
        }
    }
    virtual_hand
}

/// 一局的点数结算
///
/// 自摸：其余三家各支付全额，和牌者收入三倍；
/// 荣和：只有放铳者支付全额；流局：无变动。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settlement {
    /// 每个座位的分数变动（正为收入，负为支出）
    pub deltas: [i32; 4],
}

impl Settlement {
    /// 自摸结算
    pub fn self_draw(winner: u8, score: u32) -> Self {
        let mut deltas = [0i32; 4];
        for seat in 0..4u8 {
            if seat != winner {
                deltas[seat as usize] -= score as i32;
                deltas[winner as usize] += score as i32;
            }
        }
        Self { deltas }
    }

    /// 荣和结算：放铳者独自支付
    pub fn discard_win(winner: u8, discarder: u8, score: u32) -> Self {
        let mut deltas = [0i32; 4];
        deltas[discarder as usize] -= score as i32;
        deltas[winner as usize] += score as i32;
        Self { deltas }
    }

    /// 流局结算：无变动
    pub fn draw() -> Self {
        Self { deltas: [0; 4] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::tile::Wind;

    fn ctx(self_drawn: bool, concealed: bool, flowers: u8) -> WinContext {
        WinContext {
            is_self_drawn: self_drawn,
            is_concealed: concealed,
            seat_wind: Wind::East,
            round_wind: Wind::East,
            flower_count: flowers,
        }
    }

    #[test]
    fn test_base_score_only() {
        // 役列表为空的得分只在测试中出现，正式流程无役不算和
        assert_eq!(total_score(&[], &ctx(false, true, 0)), 10);
    }

    #[test]
    fn test_concealed_tsumo_score() {
        // 门清自摸：基础 10 + 役 1 + 门清自摸 1 + 自摸 1 = 13
        let yaku = vec![Yaku::ConcealedSelfDraw];
        assert_eq!(total_score(&yaku, &ctx(true, true, 0)), 13);
    }

    #[test]
    fn test_open_tsumo_score() {
        // 副露自摸只有自摸加分，没有门清加分
        let yaku = vec![Yaku::SeatWind(Wind::East)];
        assert_eq!(total_score(&yaku, &ctx(true, false, 0)), 12);
    }

    #[test]
    fn test_flower_bonus() {
        let yaku = vec![Yaku::AllSimples];
        assert_eq!(total_score(&yaku, &ctx(false, true, 3)), 14);
    }

    #[test]
    fn test_settlement_self_draw() {
        let settlement = Settlement::self_draw(1, 13);
        assert_eq!(settlement.deltas, [-13, 39, -13, -13]);
        assert_eq!(settlement.deltas.iter().sum::<i32>(), 0);
    }

    #[test]
    fn test_settlement_discard_win() {
        let settlement = Settlement::discard_win(2, 0, 17);
        assert_eq!(settlement.deltas, [-17, 0, 17, 0]);
    }

    #[test]
    fn test_settlement_draw() {
        assert_eq!(Settlement::draw().deltas, [0; 4]);
    }

    #[test]
    fn test_virtual_hand_synthesis() {
        let mut hand = Hand::new();
        hand.add_tile(Tile::Man(5));
        hand.add_tile(Tile::Man(5));

        let melds = vec![
            Meld::Pung {
                tile: Tile::Tong(1),
                from_seat: 2,
            },
            Meld::Kong {
                tile: Tile::Man(9),
                kind: KongType::Closed,
                from_seat: None,
            },
        ];

        let virtual_hand = virtual_hand(&hand, &melds);
        // 杠也按 3 张计入
        assert_eq!(virtual_hand.total_count(), 8);
        assert_eq!(virtual_hand.tile_count(Tile::Tong(1)), 3);
        assert_eq!(virtual_hand.tile_count(Tile::Man(9)), 3);
    }

    #[test]
    fn test_meld_accessors() {
        let pung = Meld::Pung {
            tile: Tile::Man(1),
            from_seat: 3,
        };
        assert_eq!(pung.tile(), Tile::Man(1));
        assert_eq!(pung.tile_count(), 3);
        assert!(!pung.is_concealed_kong());

        let kong = Meld::Kong {
            tile: Tile::Tong(2),
            kind: KongType::Closed,
            from_seat: None,
        };
        assert_eq!(kong.tile_count(), 4);
        assert!(kong.is_concealed_kong());
    }
}
