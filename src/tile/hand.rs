use super::tile::Tile;
use std::collections::HashMap;
use smallvec::SmallVec;

/// 手牌（Hand）
///
/// 使用 HashMap 存储每种牌的数量，支持 O(1) 的添加、移除和查询操作。
/// 序列化走排序后的牌列表，快照形式稳定且与存储顺序无关。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    /// 牌的数量映射：Tile -> 数量（1-4）
    tiles: HashMap<Tile, u8>,
    /// 总牌数（用于快速查询）
    total_count: usize,
}

impl Hand {
    /// 创建空手牌
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
            total_count: 0,
        }
    }

    /// 从牌列表创建手牌
    ///
    /// 某种牌超过 4 张时多余的牌被丢弃（理论上不应该发生）。
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let mut hand = Hand::new();
        for tile in tiles {
            hand.add_tile(*tile);
        }
        hand
    }

    /// 添加一张牌
    ///
    /// # Returns
    ///
    /// - `true`：成功添加
    /// - `false`：该牌已有 4 张
    pub fn add_tile(&mut self, tile: Tile) -> bool {
        let count = self.tiles.entry(tile).or_insert(0);
        if *count >= Tile::COPIES {
            return false;
        }
        *count += 1;
        self.total_count += 1;
        true
    }

    /// 移除一张牌
    ///
    /// # Returns
    ///
    /// - `true`：成功移除
    /// - `false`：手牌中没有该牌
    pub fn remove_tile(&mut self, tile: Tile) -> bool {
        match self.tiles.get_mut(&tile) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.total_count -= 1;
                if *count == 0 {
                    self.tiles.remove(&tile);
                }
                true
            }
            _ => false,
        }
    }

    /// 检查是否有某张牌
    pub fn has_tile(&self, tile: Tile) -> bool {
        self.tile_count(tile) > 0
    }

    /// 查询某种牌的数量
    pub fn tile_count(&self, tile: Tile) -> u8 {
        self.tiles.get(&tile).copied().unwrap_or(0)
    }

    /// 获取总牌数
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// 检查手牌是否为空
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// 清空手牌
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.total_count = 0;
    }

    /// 转换为排序后的牌向量（用于显示和调试）
    pub fn to_sorted_vec(&self) -> Vec<Tile> {
        let mut result = Vec::with_capacity(self.total_count);
        for (tile, &count) in &self.tiles {
            for _ in 0..count {
                result.push(*tile);
            }
        }
        super::tile::sort_tiles(&mut result);
        result
    }

    /// 获取所有不同的牌类型
    ///
    /// 手牌通常只有 10 种左右不同的牌，使用 SmallVec 栈分配
    pub fn distinct_tiles(&self) -> SmallVec<[Tile; 14]> {
        let mut result = SmallVec::with_capacity(self.tiles.len());
        for tile in self.tiles.keys() {
            result.push(*tile);
        }
        result
    }

    /// 获取所有牌的数量映射
    pub fn tiles_map(&self) -> &HashMap<Tile, u8> {
        &self.tiles
    }

    /// 计算手牌的哈希值（用于牌型判定缓存）
    ///
    /// 相同的牌组合（不考虑顺序）产生相同的哈希值
    pub fn multiset_hash(&self) -> u64 {
        let mut entries: SmallVec<[(u8, u8); 14]> = self
            .tiles
            .iter()
            .map(|(tile, &count)| (tile.to_index(), count))
            .collect();
        entries.sort_unstable();

        let mut hash = 0u64;
        for (index, count) in entries {
            hash = hash
                .wrapping_mul(131)
                .wrapping_add((index as u64) * 8 + count as u64);
        }
        hash
    }
}

impl serde::Serialize for Hand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sorted_vec().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Hand {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tiles = Vec::<Tile>::deserialize(deserializer)?;
        Ok(Hand::from_tiles(&tiles))
    }
}
