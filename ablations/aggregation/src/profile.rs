//! 特征提取运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时.
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 累计时间 (微秒).
    #[inline]
    fn total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 某一种聚合约定下的运行统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 完成的提取次数.
    runs: u64,

    /// 提取花费的总时间.
    extract_time: AccTimer,

    /// 整个任务花费的总时间 (包括体模生成).
    real_time: AccTimer,

    /// 最耗时的一次提取.
    most: Option<Duration>,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            runs: 0,
            extract_time: AccTimer::new(),
            real_time: AccTimer::new(),
            most: None,
        }
    }

    /// 开始一次提取计时.
    #[inline]
    pub fn extract_start(&mut self) {
        self.extract_time.start();
    }

    /// 结束一次提取计时.
    #[inline]
    pub fn extract_elapsed(&mut self) {
        let d = self.extract_time.elapsed();
        self.runs += 1;
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 完成的提取次数.
    #[inline]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// 提取总时间 (微秒).
    #[inline]
    pub fn extract_time_us(&self) -> u64 {
        self.extract_time.total_us()
    }

    /// 任务总时间 (微秒).
    #[inline]
    pub fn real_time_us(&self) -> u64 {
        self.real_time.total_us()
    }

    /// 单次提取平均时间 (微秒). 没有任何提取时返回 `None`.
    #[inline]
    pub fn avg_extract_time_us(&self) -> Option<f64> {
        match self.runs {
            0 => None,
            n => Some(self.extract_time_us() as f64 / n as f64),
        }
    }

    /// 最耗时的一次提取.
    #[inline]
    pub fn most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
