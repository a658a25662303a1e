//! 合并 (merge) 与平均 (average) 两种方向聚合约定的对比实验.
//!
//! 在若干确定性体模上分别以两种约定计算 GLCM 与 GLRLM 特征,
//! 报告耗时以及两者的特征差异. 体模边长由 `$CT_TEXTURE_ABLATION_SIZE` 控制.

mod profile;
mod result;
mod runner;

use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> std::io::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("Logger initialization error");
    runner::run().analyze()
}
