use crate::game::action::{CallAction, SelfAction};
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::pong::PungHandler;
use crate::game::yaku::{HandEvaluator, WinContext};
use crate::tile::tile::Wind;
use crate::tile::Tile;

/// 动作裁定器
///
/// 给定一张弃牌和全部桌面状态，计算哪些座位可以做什么响应，
/// 以及多家同时有响应时的优先裁定。全部为纯函数。
pub struct ActionResolver;

impl ActionResolver {
    /// 自家回合可用的动作（暗杠、加杠）
    ///
    /// 只有刚摸了牌（drawn_tile 非空）的状态才有自家动作；
    /// 碰之后的待打状态没有。多个候选全部返回，由决策来源挑选。
    pub fn legal_self_actions(player: &Player, drawn_tile: Option<Tile>) -> Vec<SelfAction> {
        if drawn_tile.is_none() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        for tile in KongHandler::closed_kong_candidates(player) {
            actions.push(SelfAction::ClosedKong { tile });
        }
        for tile in KongHandler::added_kong_candidates(player) {
            actions.push(SelfAction::AddedKong { tile });
        }
        actions
    }

    /// 某一座位对弃牌的合法响应（荣和、碰、明杠）
    ///
    /// 荣和要求加入弃牌后的手牌恰好是 `14 - 3 × 副露数` 张，
    /// 且牌型成立并至少有一个役。所有符合的动作都返回；
    /// 同一弃牌的多家响应由 `resolve_priority` 裁定。
    pub fn legal_call_actions(
        player: &Player,
        discarded: Tile,
        round_wind: Wind,
    ) -> Vec<CallAction> {
        let mut actions = Vec::new();

        // 荣和判定
        if player.hand.total_count() + 1 == player.full_hand_size() {
            let mut test_hand = player.hand.clone();
            if test_hand.add_tile(discarded) {
                let ctx = WinContext {
                    is_self_drawn: false,
                    is_concealed: player.is_concealed(),
                    seat_wind: player.wind,
                    round_wind,
                    flower_count: player.flower_count(),
                };
                if HandEvaluator::is_winning(&test_hand, &player.melds, &ctx) {
                    actions.push(CallAction::Ron { tile: discarded });
                }
            }
        }

        if PungHandler::can_pung(player, &discarded) {
            actions.push(CallAction::Pung { tile: discarded });
        }
        if KongHandler::can_open_kong(player, &discarded) {
            actions.push(CallAction::OpenKong { tile: discarded });
        }

        actions
    }

    /// 多家响应的优先裁定：荣和 > 杠 > 碰
    ///
    /// `chosen` 按座位枚举顺序排列。同级不会真正撞车（同一张牌
    /// 至多一家能碰/杠），多家荣和时取枚举顺序的第一家并立即
    /// 结束裁定，其余座位的荣和被放弃（单和牌者语义，刻意保留）。
    pub fn resolve_priority(chosen: &[(u8, CallAction)]) -> Option<(u8, CallAction)> {
        for (seat, action) in chosen {
            if matches!(action, CallAction::Ron { .. }) {
                return Some((*seat, *action));
            }
        }
        for (seat, action) in chosen {
            if matches!(action, CallAction::OpenKong { .. }) {
                return Some((*seat, *action));
            }
        }
        for (seat, action) in chosen {
            if matches!(action, CallAction::Pung { .. }) {
                return Some((*seat, *action));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scoring::Meld;

    #[test]
    fn test_self_actions_require_drawn_tile() {
        let mut player = Player::new(0);
        for _ in 0..4 {
            player.hand.add_tile(Tile::Man(5));
        }

        // 没有摸牌状态就没有自家动作
        assert!(ActionResolver::legal_self_actions(&player, None).is_empty());

        let actions = ActionResolver::legal_self_actions(&player, Some(Tile::Man(5)));
        assert_eq!(actions, vec![SelfAction::ClosedKong { tile: Tile::Man(5) }]);
    }

    #[test]
    fn test_self_actions_both_kinds() {
        let mut player = Player::new(0);
        for _ in 0..4 {
            player.hand.add_tile(Tile::Man(5));
        }
        player.melds.push(Meld::Pung {
            tile: Tile::Tong(2),
            from_seat: 1,
        });
        player.hand.add_tile(Tile::Tong(2));

        let actions = ActionResolver::legal_self_actions(&player, Some(Tile::Tong(2)));
        assert!(actions.contains(&SelfAction::ClosedKong { tile: Tile::Man(5) }));
        assert!(actions.contains(&SelfAction::AddedKong { tile: Tile::Tong(2) }));
    }

    #[test]
    fn test_call_actions_pung_and_kong() {
        let mut player = Player::new(1);
        for _ in 0..3 {
            player.hand.add_tile(Tile::Tong(8));
        }
        // 手牌凑满 13 张
        for rank in 1..=5 {
            player.hand.add_tile(Tile::Man(rank));
            player.hand.add_tile(Tile::Man(rank));
        }

        let actions = ActionResolver::legal_call_actions(&player, Tile::Tong(8), Wind::East);
        assert!(actions.contains(&CallAction::Pung { tile: Tile::Tong(8) }));
        assert!(actions.contains(&CallAction::OpenKong { tile: Tile::Tong(8) }));
    }

    #[test]
    fn test_call_actions_ron() {
        let mut player = Player::new(2);
        // 听 8 筒的门清手：234567万 + 234筒 + 88筒 + 678筒缺8
        for tile in [
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(4),
            Tile::Tong(6),
            Tile::Tong(7),
            Tile::Tong(8),
            Tile::Tong(8),
        ] {
            player.hand.add_tile(tile);
        }

        let actions = ActionResolver::legal_call_actions(&player, Tile::Tong(8), Wind::East);
        assert!(actions.contains(&CallAction::Ron { tile: Tile::Tong(8) }));
        // 手里已有两张 8 筒，碰也合法
        assert!(actions.contains(&CallAction::Pung { tile: Tile::Tong(8) }));
    }

    #[test]
    fn test_ron_requires_yaku() {
        let mut player = Player::new(2);
        // 牌型成立但荣和无役的手：123456万 + 123筒 + 789筒缺9 + 南南
        for tile in [
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(7),
            Tile::Tong(8),
            Tile::Wind(Wind::South),
            Tile::Wind(Wind::South),
        ] {
            player.hand.add_tile(tile);
        }

        let actions = ActionResolver::legal_call_actions(&player, Tile::Tong(9), Wind::East);
        assert!(!actions.iter().any(|a| matches!(a, CallAction::Ron { .. })));
    }

    #[test]
    fn test_priority_ron_beats_pung() {
        // 座位 2 可碰、座位 3 可荣和：荣和赢，与座位顺序无关
        let chosen = vec![
            (2u8, CallAction::Pung { tile: Tile::Man(1) }),
            (3u8, CallAction::Ron { tile: Tile::Man(1) }),
        ];
        let resolved = ActionResolver::resolve_priority(&chosen).unwrap();
        assert_eq!(resolved.0, 3);
        assert!(matches!(resolved.1, CallAction::Ron { .. }));
    }

    #[test]
    fn test_priority_kong_beats_pung() {
        let chosen = vec![
            (1u8, CallAction::Pung { tile: Tile::Man(1) }),
            (3u8, CallAction::OpenKong { tile: Tile::Man(1) }),
        ];
        let resolved = ActionResolver::resolve_priority(&chosen).unwrap();
        assert_eq!(resolved.0, 3);
        assert!(matches!(resolved.1, CallAction::OpenKong { .. }));
    }

    #[test]
    fn test_priority_first_ron_wins() {
        // 多家荣和：枚举顺序靠前的一家赢
        let chosen = vec![
            (1u8, CallAction::Ron { tile: Tile::Man(1) }),
            (2u8, CallAction::Ron { tile: Tile::Man(1) }),
        ];
        let resolved = ActionResolver::resolve_priority(&chosen).unwrap();
        assert_eq!(resolved.0, 1);
    }

    #[test]
    fn test_priority_empty() {
        assert!(ActionResolver::resolve_priority(&[]).is_none());
    }
}
