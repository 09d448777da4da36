//! 規劃結果記憶緩存

use serde::{Deserialize, Serialize};

use crate::Fingerprint;

/// 緩存命中統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// 單槽記憶緩存：保留最近一次輸入指紋與結果，輸入一變即重算
#[derive(Debug, Clone)]
pub struct PlanCache<T> {
    entry: Option<(Fingerprint, T)>,
    stats: CacheStats,
}

impl<T: Clone> PlanCache<T> {
    /// 創建空緩存
    pub fn new() -> Self {
        Self {
            entry: None,
            stats: CacheStats::default(),
        }
    }

    /// 查詢指紋對應的結果
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|(cached, _)| cached == fingerprint)
            .map(|(_, value)| value)
    }

    /// 命中則返回緩存結果，否則計算並取代舊結果
    ///
    /// 計算失敗時保留原有緩存。
    pub fn get_or_try_compute<E, F>(&mut self, fingerprint: Fingerprint, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get(&fingerprint) {
            let value = value.clone();
            self.stats.hits += 1;
            tracing::debug!("緩存命中: {}", fingerprint);
            return Ok(value);
        }

        self.stats.misses += 1;
        tracing::debug!("緩存未命中，重新計算: {}", fingerprint);
        let value = compute()?;
        self.entry = Some((fingerprint, value.clone()));
        Ok(value)
    }

    /// 清除緩存
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// 是否持有結果
    pub fn is_warm(&self) -> bool {
        self.entry.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<T: Clone> Default for PlanCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
