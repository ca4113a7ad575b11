use super::tile::{Suit, Tile};
use super::hand::Hand;
use std::collections::HashMap;
use smallvec::SmallVec;

/// 牌组（顺子或刻子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Group {
    /// 顺子（同花色连续三张，start 为起始数字）
    Run { suit: Suit, start: u8 },
    /// 刻子（三张相同牌）
    Triple { tile: Tile },
}

/// 牌型分解结果：1 个对子（머리）+ 4 个牌组（몸통）
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Decomposition {
    /// 对子
    pub head: Tile,
    /// 4 个顺子/刻子
    pub groups: SmallVec<[Group; 4]>,
}

impl Decomposition {
    /// 所有牌组都是顺子
    pub fn all_runs(&self) -> bool {
        self.groups.iter().all(|g| matches!(g, Group::Run { .. }))
    }

    /// 所有牌组都是刻子
    pub fn all_triples(&self) -> bool {
        self.groups.iter().all(|g| matches!(g, Group::Triple { .. }))
    }
}

/// 牌型判定器
///
/// 对 14 张牌的多重集做回溯搜索：尝试每种数量 ≥ 2 的牌作为对子，
/// 剩余 12 张在每个分支先试刻子、后试顺子（字牌不能组顺子）。
/// 固定的分支顺序决定了多解手牌报告哪一种分解，后续的役判定
/// 以这里找到的第一个分解为准。
///
/// 带结果缓存，相同的牌组合不重复搜索。
pub struct WinChecker {
    /// 结果缓存：手牌哈希 -> 分解结果
    result_cache: HashMap<u64, Option<Decomposition>>,
    /// 最大缓存条目数，超过后清空
    max_cache_size: usize,
}

impl WinChecker {
    /// 创建新的牌型判定器
    pub fn new() -> Self {
        Self {
            result_cache: HashMap::new(),
            max_cache_size: 1000,
        }
    }

    /// 判定 14 张牌能否分解为 1 对子 + 4 牌组
    ///
    /// 牌数不是 14 时直接返回 None（纯函数，不报错）；
    /// 调用方应在进入搜索前校验 `14 - 3 × 副露数` 的牌数约束。
    pub fn decompose(&mut self, hand: &Hand) -> Option<Decomposition> {
        if hand.total_count() != 14 {
            return None;
        }

        let hash = hand.multiset_hash();
        if let Some(cached) = self.result_cache.get(&hash) {
            return cached.clone();
        }

        let result = self.search_decomposition(hand);

        if self.result_cache.len() >= self.max_cache_size {
            self.result_cache.clear();
        }
        self.result_cache.insert(hash, result.clone());
        result
    }

    /// 搜索分解：按排序顺序尝试每个对子候选
    fn search_decomposition(&self, hand: &Hand) -> Option<Decomposition> {
        let mut candidates: Vec<Tile> = hand
            .tiles_map()
            .iter()
            .filter(|(_, &count)| count >= 2)
            .map(|(tile, _)| *tile)
            .collect();
        candidates.sort_by_key(Tile::sort_key);

        for head in candidates {
            let mut rest = hand.clone();
            rest.remove_tile(head);
            rest.remove_tile(head);

            if let Some(groups) = Self::find_groups(&rest) {
                if groups.len() == 4 {
                    return Some(Decomposition { head, groups });
                }
            }
        }
        None
    }

    /// 递归查找顺子/刻子组合
    ///
    /// 每个分支先试刻子、后试顺子。返回 None 表示无法分完。
    fn find_groups(hand: &Hand) -> Option<SmallVec<[Group; 4]>> {
        if hand.total_count() == 0 {
            return Some(SmallVec::new());
        }
        if hand.total_count() % 3 != 0 {
            return None;
        }

        // 取排序后的第一种牌作为当前分支的锚点
        let mut distinct: Vec<Tile> = hand.tiles_map().keys().copied().collect();
        distinct.sort_by_key(Tile::sort_key);
        let anchor = distinct[0];
        let count = hand.tile_count(anchor);

        // 1. 刻子分支
        if count >= 3 {
            let mut rest = hand.clone();
            for _ in 0..3 {
                rest.remove_tile(anchor);
            }
            if let Some(mut groups) = Self::find_groups(&rest) {
                groups.push(Group::Triple { tile: anchor });
                return Some(groups);
            }
        }

        // 2. 顺子分支（只有数牌；锚点是最小的，顺子只能从它起始）
        if let (Some(suit), Some(rank)) = (anchor.suit(), anchor.rank()) {
            if rank + 2 <= Tile::MAX_RANK {
                let second = Tile::suited(suit, rank + 1);
                let third = Tile::suited(suit, rank + 2);
                if let (Some(second), Some(third)) = (second, third) {
                    if hand.has_tile(second) && hand.has_tile(third) {
                        let mut rest = hand.clone();
                        rest.remove_tile(anchor);
                        rest.remove_tile(second);
                        rest.remove_tile(third);
                        if let Some(mut groups) = Self::find_groups(&rest) {
                            groups.push(Group::Run { suit, start: rank });
                            return Some(groups);
                        }
                    }
                }
            }
        }

        None
    }

    /// 清空缓存
    pub fn clear_cache(&mut self) {
        self.result_cache.clear();
    }

    /// 当前缓存大小（测试与监控用）
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.result_cache.len()
    }
}

impl Default for WinChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数：判定 14 张牌是否构成合法牌型
pub fn has_winning_shape(hand: &Hand) -> bool {
    WinChecker::new().decompose(hand).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::tile::{Dragon, Wind};

    fn hand_of(tiles: &[Tile]) -> Hand {
        Hand::from_tiles(tiles)
    }

    #[test]
    fn test_basic_run_hand() {
        // 对子 1万 + 顺子 234万 567万 + 顺子 123筒 567筒
        let hand = hand_of(&[
            Tile::Man(1),
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(5),
            Tile::Tong(6),
            Tile::Tong(7),
        ]);

        let result = WinChecker::new().decompose(&hand).unwrap();
        assert_eq!(result.head, Tile::Man(1));
        assert_eq!(result.groups.len(), 4);
        assert!(result.all_runs());
    }

    #[test]
    fn test_triple_hand_with_honors() {
        // 字牌刻子 + 数牌刻子 + 对子
        let hand = hand_of(&[
            Tile::Wind(Wind::East),
            Tile::Wind(Wind::East),
            Tile::Wind(Wind::East),
            Tile::Dragon(Dragon::Red),
            Tile::Dragon(Dragon::Red),
            Tile::Dragon(Dragon::Red),
            Tile::Man(3),
            Tile::Man(3),
            Tile::Man(3),
            Tile::Tong(7),
            Tile::Tong(7),
            Tile::Tong(7),
            Tile::Tong(9),
            Tile::Tong(9),
        ]);

        let result = WinChecker::new().decompose(&hand).unwrap();
        assert_eq!(result.head, Tile::Tong(9));
        assert!(result.all_triples());
    }

    #[test]
    fn test_honor_cannot_form_run() {
        // 东南西 + 其余合法牌组：字牌不可连续，不能胡
        let hand = hand_of(&[
            Tile::Wind(Wind::East),
            Tile::Wind(Wind::South),
            Tile::Wind(Wind::West),
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Man(8),
            Tile::Man(9),
            Tile::Tong(5),
            Tile::Tong(5),
        ]);

        assert!(WinChecker::new().decompose(&hand).is_none());
    }

    #[test]
    fn test_triples_tried_before_runs() {
        // 111 222 333 万既可解为三刻子也可解为三顺子，
        // 固定分支顺序必须先找到刻子分解
        let hand = hand_of(&[
            Tile::Man(1),
            Tile::Man(1),
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(2),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(3),
            Tile::Man(3),
            Tile::Tong(4),
            Tile::Tong(5),
            Tile::Tong(6),
            Tile::Tong(8),
            Tile::Tong(8),
        ]);

        let result = WinChecker::new().decompose(&hand).unwrap();
        let triple_count = result
            .groups
            .iter()
            .filter(|g| matches!(g, Group::Triple { .. }))
            .count();
        assert_eq!(triple_count, 3);
    }

    #[test]
    fn test_wrong_size_returns_none() {
        let hand = hand_of(&[Tile::Man(1), Tile::Man(1)]);
        assert!(WinChecker::new().decompose(&hand).is_none());

        // 13 张也不行
        let hand = hand_of(&[
            Tile::Man(1),
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(5),
            Tile::Tong(6),
        ]);
        assert!(WinChecker::new().decompose(&hand).is_none());
    }

    #[test]
    fn test_no_pair_no_win() {
        let hand = hand_of(&[
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Man(8),
            Tile::Man(9),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(4),
            Tile::Tong(6),
        ]);
        assert!(WinChecker::new().decompose(&hand).is_none());
    }

    #[test]
    fn test_idempotent_and_cached() {
        let hand = hand_of(&[
            Tile::Man(1),
            Tile::Man(1),
            Tile::Man(2),
            Tile::Man(3),
            Tile::Man(4),
            Tile::Man(5),
            Tile::Man(6),
            Tile::Man(7),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(5),
            Tile::Tong(6),
            Tile::Tong(7),
        ]);

        let mut checker = WinChecker::new();
        let first = checker.decompose(&hand);
        assert_eq!(checker.cache_size(), 1);
        let second = checker.decompose(&hand);
        assert_eq!(first, second);
    }

    #[test]
    fn test_kong_synthesized_as_triple() {
        // 杠在牌型判定里按 3 张计：合成后的 14 张正常分解
        let hand = hand_of(&[
            Tile::Man(5),
            Tile::Man(5),
            Tile::Man(5),
            Tile::Tong(1),
            Tile::Tong(2),
            Tile::Tong(3),
            Tile::Tong(4),
            Tile::Tong(5),
            Tile::Tong(6),
            Tile::Tong(7),
            Tile::Tong(8),
            Tile::Tong(9),
            Tile::Dragon(Dragon::White),
            Tile::Dragon(Dragon::White),
        ]);
        let result = WinChecker::new().decompose(&hand).unwrap();
        assert_eq!(result.head, Tile::Dragon(Dragon::White));
    }
}
