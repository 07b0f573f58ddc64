use crate::models::Sample;

/// 默认保留的采样条数
pub const MAX_SAMPLES: usize = 1000;

/// 有界采样历史：按插入顺序保存，超出容量时丢弃最旧的记录
#[derive(Debug, Clone)]
pub struct History {
    samples: Vec<Sample>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SAMPLES)
    }

    /// 容量至少为 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity.min(MAX_SAMPLES)),
            capacity,
        }
    }

    /// 追加一条记录，然后截断到最近的 `capacity` 条
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
        if self.samples.len() > self.capacity {
            let excess = self.samples.len() - self.capacity;
            self.samples.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
